//! Item builders shared by the unit tests.

use stremfin_core::model::{MediaItem, MediaSource, MediaStream};
use stremfin_core::types::{ItemKind, StreamKind};
use stremfin_jellyfin::Endpoints;

use crate::streams::StreamAssembler;

pub const SERVER: &str = "Jellyfin";

pub fn endpoints() -> Endpoints {
    Endpoints::new("http://jf.local:8096", "secret").unwrap()
}

pub fn assembler() -> StreamAssembler {
    StreamAssembler::new(endpoints(), SERVER)
}

pub fn movie(id: &str, name: &str) -> MediaItem {
    MediaItem {
        id: id.into(),
        name: name.into(),
        kind: ItemKind::Movie,
        ..Default::default()
    }
}

pub fn series(id: &str, name: &str) -> MediaItem {
    MediaItem {
        id: id.into(),
        name: name.into(),
        kind: ItemKind::Series,
        ..Default::default()
    }
}

pub fn episode(id: &str, series_id: &str, season: u32, number: u32) -> MediaItem {
    MediaItem {
        id: id.into(),
        name: format!("Episode {number}"),
        kind: ItemKind::Episode,
        series_id: Some(series_id.into()),
        parent_index_number: Some(season),
        index_number: Some(number),
        ..Default::default()
    }
}

pub fn with_provider(mut item: MediaItem, key: &str, value: &str) -> MediaItem {
    item.provider_ids.insert(key.into(), value.into());
    item
}

pub fn with_sources(mut item: MediaItem, sources: Vec<MediaSource>) -> MediaItem {
    item.media_sources = sources;
    item
}

pub fn video_source(id: &str, height: u32) -> MediaSource {
    MediaSource {
        id: Some(id.into()),
        name: None,
        media_streams: vec![
            MediaStream {
                kind: StreamKind::Video,
                index: Some(0),
                height: Some(height),
                ..Default::default()
            },
            MediaStream {
                kind: StreamKind::Audio,
                index: Some(1),
                language: Some("eng".into()),
                ..Default::default()
            },
        ],
    }
}

pub fn subtitle(index: u32, language: Option<&str>, title: Option<&str>) -> MediaStream {
    MediaStream {
        kind: StreamKind::Subtitle,
        index: Some(index),
        language: language.map(Into::into),
        display_title: title.map(Into::into),
        is_external: Some(true),
        ..Default::default()
    }
}
