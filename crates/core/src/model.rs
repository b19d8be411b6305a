//! Upstream item model.
//!
//! Mirrors the subset of Jellyfin's `BaseItemDto` the addon needs. Jellyfin
//! omits fields that were not requested and sends `null` for empty
//! collections, so everything except `Id` is optional or defaults to empty.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{ItemKind, StreamKind};

/// One movie, series, season or episode in the upstream catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MediaItem {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub production_year: Option<i32>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub premiere_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<String>,
    #[serde(default, deserialize_with = "provider_id_map")]
    pub provider_ids: BTreeMap<String, String>,
    #[serde(rename = "Type", default)]
    pub kind: ItemKind,
    #[serde(default)]
    pub series_id: Option<String>,
    /// Season number, for episodes.
    #[serde(default)]
    pub parent_index_number: Option<u32>,
    /// Episode number within the season, for episodes.
    #[serde(default)]
    pub index_number: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub media_sources: Vec<MediaSource>,
}

impl MediaItem {
    /// Case-insensitive lookup of a provider id by key (`Imdb`, `imdb`, `IMDB`).
    pub fn provider_id(&self, key: &str) -> Option<&str> {
        self.provider_ids
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Whether any provider id recorded under `key` (compared
    /// case-insensitively) equals `value`, ignoring case.
    pub fn matches_provider_id(&self, key: &str, value: &str) -> bool {
        self.provider_ids
            .iter()
            .any(|(k, v)| k.eq_ignore_ascii_case(key) && v.eq_ignore_ascii_case(value))
    }

    /// Id that groups this item with its siblings: the series for episodes,
    /// the item itself otherwise.
    pub fn group_id(&self) -> &str {
        match self.series_id.as_deref() {
            Some(series) if !series.is_empty() => series,
            _ => &self.id,
        }
    }
}

/// One encoded variant of an item's content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MediaSource {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub media_streams: Vec<MediaStream>,
}

impl MediaSource {
    /// Playback handle: the source id, or the owning item's id when absent.
    pub fn handle<'a>(&'a self, item: &'a MediaItem) -> &'a str {
        match self.id.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => &item.id,
        }
    }

    /// First video stream, if any.
    pub fn video_stream(&self) -> Option<&MediaStream> {
        self.media_streams
            .iter()
            .find(|s| s.kind == StreamKind::Video)
    }

    /// Subtitle streams that can be served as standalone files.
    ///
    /// A stream is excluded only when its external flag is explicitly false.
    pub fn extractable_subtitles(&self) -> impl Iterator<Item = &MediaStream> {
        self.media_streams
            .iter()
            .filter(|s| s.kind == StreamKind::Subtitle && s.is_external != Some(false))
    }
}

/// One elementary track inside a media source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MediaStream {
    #[serde(rename = "Type", default)]
    pub kind: StreamKind,
    #[serde(default)]
    pub index: Option<u32>,
    #[serde(default)]
    pub codec: Option<String>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub display_title: Option<String>,
    #[serde(default)]
    pub is_external: Option<bool>,
}

/// Jellyfin list envelope (`/Items`, `/Shows/{id}/Episodes`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<MediaItem>,
    #[serde(default)]
    pub total_record_count: u64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// Jellyfin may record a provider key with a null or empty value.
fn provider_id_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Option<String>>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(k, v)| v.filter(|v| !v.is_empty()).map(|v| (k, v)))
        .collect())
}

fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|d| d.with_timezone(&Utc))
    }))
}
