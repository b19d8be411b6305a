//! Response shapes of the addon protocol.

use serde::Serialize;

use crate::types::ContentKind;

/// One playable option returned from `/stream`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamDescriptor {
    pub url: String,
    /// `"<server-name>"` or `"<server-name>\n<quality-label>"`.
    pub title: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subtitles: Vec<SubtitleTrack>,
    pub behavior_hints: BehaviorHints,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorHints {
    /// The URL is a server stream, not a raw file the client can hand off.
    pub not_web_ready: bool,
    /// Groups alternate sources of the same movie or series.
    pub binge_group: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubtitleTrack {
    pub id: String,
    pub url: String,
    pub lang: String,
    pub label: String,
}

/// Catalog-facing projection of an item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_info: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
}

/// Full metadata for `/meta`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetaDetail {
    #[serde(flatten)]
    pub entry: CatalogEntry,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub videos: Vec<MetaVideo>,
}

/// One episode of a series meta.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetaVideo {
    /// `<series-external-id>:<season>:<episode>`, accepted back by `/stream`.
    pub id: String,
    pub title: String,
    pub season: u32,
    pub episode: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub released: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct StreamsResponse {
    pub streams: Vec<StreamDescriptor>,
}

#[derive(Debug, Default, Serialize)]
pub struct MetasResponse {
    pub metas: Vec<CatalogEntry>,
}

#[derive(Debug, Serialize)]
pub struct MetaResponse {
    pub meta: MetaDetail,
}
