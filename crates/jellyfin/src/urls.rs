//! URL builders for Jellyfin resources handed to addon clients.
//!
//! Every URL is a pure function of its inputs plus the configured base URL
//! and API key. Clients fetch these directly, so the key travels in the query
//! string rather than a header.

use stremfin_core::types::ImageKind;
use url::Url;

use crate::JellyfinError;

#[derive(Debug, Clone)]
pub struct Endpoints {
    base: Url,
    api_key: String,
}

impl Endpoints {
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self, JellyfinError> {
        let base = Url::parse(base_url)
            .map_err(|e| JellyfinError::InvalidConfig(format!("base url {base_url:?}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(JellyfinError::InvalidConfig(format!(
                "base url {base_url:?} cannot carry a path"
            )));
        }
        Ok(Self {
            base,
            api_key: api_key.into(),
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// `<base>/<segments...>`, each segment percent-encoded.
    pub fn api_url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        // Cannot fail: `new` rejects cannot-be-a-base URLs.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Direct (static) stream of one media source.
    pub fn playback_url(&self, handle: &str) -> String {
        let mut url = self.api_url(&["Videos", handle, "stream"]);
        url.query_pairs_mut()
            .append_pair("static", "true")
            .append_pair("MediaSourceId", handle)
            .append_pair("api_key", &self.api_key);
        url.to_string()
    }

    /// One subtitle track of a media source, converted to SubRip.
    pub fn subtitle_url(&self, handle: &str, index: u32) -> String {
        let index = index.to_string();
        let mut url = self.api_url(&[
            "Videos",
            handle,
            handle,
            "Subtitles",
            index.as_str(),
            "0",
            "Stream.srt",
        ]);
        url.query_pairs_mut().append_pair("api_key", &self.api_key);
        url.to_string()
    }

    pub fn image_url(&self, item_id: &str, kind: ImageKind) -> String {
        self.api_url(&["Items", item_id, "Images", kind.as_str()])
            .to_string()
    }
}
