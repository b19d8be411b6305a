use stremfin_core::model::MediaItem;
use stremfin_core::types::{ItemKind, Scheme};

use crate::JellyfinError;

/// Read access to the upstream media library.
///
/// Implementations are best-effort: `search_by_provider_id` may return
/// items that do not actually carry the requested id, and callers re-verify.
#[async_trait::async_trait]
pub trait Catalog: Send + Sync {
    /// Items whose provider ids contain `{scheme: value}`, optionally limited
    /// to one item kind. Upstream order is preserved.
    async fn search_by_provider_id(
        &self,
        scheme: Scheme,
        value: &str,
        kind: Option<ItemKind>,
    ) -> Result<Vec<MediaItem>, JellyfinError>;

    /// Direct lookup by Jellyfin item id.
    async fn get_item(&self, id: &str) -> Result<Option<MediaItem>, JellyfinError>;

    /// Episodes of a series, filtered server-side by season when given.
    async fn get_episodes(
        &self,
        series_id: &str,
        season: Option<u32>,
    ) -> Result<Vec<MediaItem>, JellyfinError>;

    /// One page of top-level items of `kind`, sorted by name.
    async fn list_items(
        &self,
        kind: ItemKind,
        query: &ItemQuery,
    ) -> Result<Vec<MediaItem>, JellyfinError>;
}

/// Catalog browsing parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemQuery {
    pub search: Option<String>,
    pub genre: Option<String>,
    pub skip: u32,
    pub limit: u32,
}
