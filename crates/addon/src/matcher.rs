//! Provider-id matching.
//!
//! Upstream search by provider id is loose (substring matches, any key
//! casing), so every candidate is re-checked here before it is trusted.

use stremfin_core::model::MediaItem;
use stremfin_core::types::{ItemKind, Scheme};
use stremfin_jellyfin::{Catalog, JellyfinError};
use thiserror::Error;
use tracing::debug;

/// A classified base identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderRef<'a> {
    pub scheme: Scheme,
    /// Scheme-specific value: the full `tt…` string for IMDb, the part after
    /// the prefix otherwise.
    pub value: &'a str,
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("unrecognized identifier scheme: {0}")]
    Unrecognized(String),
    #[error(transparent)]
    Upstream(#[from] JellyfinError),
}

/// Classify a base identifier (season/episode already stripped).
pub fn classify(base: &str) -> Option<ProviderRef<'_>> {
    if base.starts_with(Scheme::Imdb.id_prefix()) {
        return Some(ProviderRef {
            scheme: Scheme::Imdb,
            value: base,
        });
    }

    [Scheme::Tmdb, Scheme::Tvdb, Scheme::AniDb, Scheme::Native]
        .into_iter()
        .find_map(|scheme| {
            base.strip_prefix(scheme.id_prefix())
                .map(|value| ProviderRef { scheme, value })
        })
}

/// Catalog items carrying `base`, in upstream order.
///
/// Native ids are a direct item lookup, dropped when the item is of another
/// kind than requested. Every other scheme goes through the
/// provider-id search, optionally limited to `kind`, followed by local
/// verification. An empty list means nothing matched.
pub async fn find_candidates(
    catalog: &dyn Catalog,
    base: &str,
    kind: Option<ItemKind>,
) -> Result<Vec<MediaItem>, LookupError> {
    let provider = classify(base).ok_or_else(|| LookupError::Unrecognized(base.to_string()))?;

    if provider.scheme == Scheme::Native {
        let item = catalog.get_item(provider.value).await?;
        return Ok(item
            .filter(|item| kind.is_none_or(|k| accepts_kind(k, item.kind)))
            .into_iter()
            .collect());
    }

    let candidates = catalog
        .search_by_provider_id(provider.scheme, provider.value, kind)
        .await?;
    Ok(verify(candidates, provider))
}

/// Whether an item of kind `found` can answer a request for `wanted`.
///
/// Series requests also take episodes, which already name their episode.
fn accepts_kind(wanted: ItemKind, found: ItemKind) -> bool {
    found == wanted || (wanted == ItemKind::Series && found == ItemKind::Episode)
}

/// Keep only candidates whose provider ids really contain `provider`.
///
/// Key and value are both compared case-insensitively; substring or
/// cross-scheme matches from upstream are dropped.
pub fn verify(candidates: Vec<MediaItem>, provider: ProviderRef<'_>) -> Vec<MediaItem> {
    let Some(key) = provider.scheme.provider_key() else {
        return candidates;
    };

    let returned = candidates.len();
    let verified: Vec<MediaItem> = candidates
        .into_iter()
        .filter(|item| item.matches_provider_id(key, provider.value))
        .collect();

    if verified.len() != returned {
        debug!(
            key,
            value = provider.value,
            returned,
            kept = verified.len(),
            "discarded unverified provider-id candidates"
        );
    }
    verified
}
