//! Stream descriptor assembly.
//!
//! One descriptor per media source, in source order. Titles are
//! `"<server>\n<quality>"`; the quality comes from the first video stream's
//! height plus the source's own label when it differs from the item name.

use stremfin_core::addon::{BehaviorHints, StreamDescriptor, SubtitleTrack};
use stremfin_core::model::{MediaItem, MediaSource};
use stremfin_jellyfin::Endpoints;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_GROUP_PREFIX: &str = "stremfin";

const UNKNOWN_LANGUAGE: &str = "und";
const UNKNOWN_SUBTITLE_LABEL: &str = "Unknown";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssembleError {
    #[error("no playback handle for item {item_id:?}")]
    MissingHandle { item_id: String },
}

#[derive(Debug, Clone)]
pub struct StreamAssembler {
    endpoints: Endpoints,
    server_name: String,
    group_prefix: String,
}

impl StreamAssembler {
    pub fn new(endpoints: Endpoints, server_name: impl Into<String>) -> Self {
        Self {
            endpoints,
            server_name: server_name.into(),
            group_prefix: DEFAULT_GROUP_PREFIX.to_string(),
        }
    }

    pub fn with_group_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.group_prefix = prefix.into();
        self
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Descriptors for `item` played through `sources`.
    ///
    /// With no sources, a single unlabeled descriptor is built from the item
    /// id. A source that fails to assemble is logged and skipped.
    pub fn assemble(&self, item: &MediaItem, sources: &[MediaSource]) -> Vec<StreamDescriptor> {
        let group = self.group_key(item);

        let Some(first) = sources.first() else {
            return match self.descriptor(item, &item.id, None, Vec::new(), &group) {
                Ok(d) => vec![d],
                Err(e) => {
                    warn!(error = %e, "cannot assemble fallback stream");
                    Vec::new()
                }
            };
        };

        let subtitles = self.subtitles(item, first);

        sources
            .iter()
            .enumerate()
            .filter_map(|(position, source)| {
                let handle = source.handle(item);
                let quality = quality_label(item, source);
                match self.descriptor(item, handle, quality, subtitles.clone(), &group) {
                    Ok(d) => Some(d),
                    Err(e) => {
                        warn!(item_id = %item.id, position, error = %e, "skipping media source");
                        None
                    }
                }
            })
            .collect()
    }

    /// `<prefix>-<series id or item id>`.
    pub fn group_key(&self, item: &MediaItem) -> String {
        format!("{}-{}", self.group_prefix, item.group_id())
    }

    fn descriptor(
        &self,
        item: &MediaItem,
        handle: &str,
        quality: Option<String>,
        subtitles: Vec<SubtitleTrack>,
        group: &str,
    ) -> Result<StreamDescriptor, AssembleError> {
        if handle.is_empty() {
            return Err(AssembleError::MissingHandle {
                item_id: item.id.clone(),
            });
        }

        let title = match quality {
            Some(q) => format!("{}\n{q}", self.server_name),
            None => self.server_name.clone(),
        };

        Ok(StreamDescriptor {
            url: self.endpoints.playback_url(handle),
            title,
            subtitles,
            behavior_hints: BehaviorHints {
                not_web_ready: true,
                binge_group: group.to_string(),
            },
        })
    }

    /// Standalone-servable subtitle tracks of `source`.
    fn subtitles(&self, item: &MediaItem, source: &MediaSource) -> Vec<SubtitleTrack> {
        let handle = source.handle(item);
        if handle.is_empty() {
            return Vec::new();
        }

        source
            .extractable_subtitles()
            .filter_map(|stream| {
                let Some(index) = stream.index else {
                    debug!(
                        item_id = %item.id,
                        handle,
                        "subtitle stream without index, not served"
                    );
                    return None;
                };
                let lang = stream
                    .language
                    .clone()
                    .filter(|l| !l.is_empty())
                    .unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string());
                let label = stream
                    .display_title
                    .clone()
                    .filter(|t| !t.is_empty())
                    .or_else(|| stream.language.clone().filter(|l| !l.is_empty()))
                    .unwrap_or_else(|| UNKNOWN_SUBTITLE_LABEL.to_string());
                Some(SubtitleTrack {
                    id: format!("{handle}-{index}"),
                    url: self.endpoints.subtitle_url(handle, index),
                    lang,
                    label,
                })
            })
            .collect()
    }
}

/// Resolution bucket for a video height. Zero means unknown.
pub fn resolution_label(height: u32) -> Option<String> {
    match height {
        0 => None,
        h if h >= 2160 => Some("4K".to_string()),
        h if h >= 1080 => Some("1080p".to_string()),
        h if h >= 720 => Some("720p".to_string()),
        h => Some(format!("{h}p")),
    }
}

/// Resolution and source label, joined with an en dash when both exist.
pub fn quality_label(item: &MediaItem, source: &MediaSource) -> Option<String> {
    let resolution = source
        .video_stream()
        .and_then(|v| v.height)
        .and_then(resolution_label);

    let source_label = source
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty() && *n != item.name);

    match (resolution, source_label) {
        (Some(r), Some(l)) => Some(format!("{r} – {l}")),
        (Some(r), None) => Some(r),
        (None, Some(l)) => Some(l.to_string()),
        (None, None) => None,
    }
}
