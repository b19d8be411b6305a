//! Top-level resolution: external id → stream descriptors.

use std::sync::Arc;

use stremfin_core::addon::StreamDescriptor;
use stremfin_core::model::MediaItem;
use stremfin_core::types::{ContentKind, ItemKind};
use stremfin_jellyfin::Catalog;
use tracing::{debug, warn};

use crate::episodes;
use crate::ids::parse_external_id;
use crate::matcher::{self, LookupError};
use crate::streams::StreamAssembler;

/// Outcome of a stream request.
///
/// Every failure collapses to `Empty`; the reason exists for logs and tests,
/// addon clients only ever see an empty list.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Streams(Vec<StreamDescriptor>),
    Empty(EmptyReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyReason {
    /// The base id has no known scheme prefix; upstream was not asked.
    UnrecognizedId,
    NoMatchingItem,
    /// A series id without a parseable `:season:episode` suffix.
    MissingEpisodeCoordinates,
    EpisodeNotFound,
    Upstream(String),
    NoPlayableSource,
}

impl std::fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnrecognizedId => f.write_str("unrecognized identifier"),
            Self::NoMatchingItem => f.write_str("no matching item"),
            Self::MissingEpisodeCoordinates => f.write_str("series id without season/episode"),
            Self::EpisodeNotFound => f.write_str("episode not found"),
            Self::Upstream(e) => write!(f, "upstream failure: {e}"),
            Self::NoPlayableSource => f.write_str("no playable source"),
        }
    }
}

impl Resolution {
    pub fn streams(&self) -> &[StreamDescriptor] {
        match self {
            Self::Streams(s) => s,
            Self::Empty(_) => &[],
        }
    }

    pub fn empty_reason(&self) -> Option<&EmptyReason> {
        match self {
            Self::Streams(_) => None,
            Self::Empty(reason) => Some(reason),
        }
    }

    pub fn into_streams(self) -> Vec<StreamDescriptor> {
        match self {
            Self::Streams(s) => s,
            Self::Empty(_) => Vec::new(),
        }
    }
}

impl From<LookupError> for EmptyReason {
    fn from(e: LookupError) -> Self {
        match e {
            LookupError::Unrecognized(_) => Self::UnrecognizedId,
            LookupError::Upstream(e) => Self::Upstream(e.to_string()),
        }
    }
}

/// Pick the canonical item among verified candidates.
///
/// Upstream order decides: the first candidate wins. For series requests a
/// candidate that already is an episode is preferred over a series that would
/// still need the episode lookup.
pub fn select_canonical(candidates: Vec<MediaItem>, kind: ContentKind) -> Option<MediaItem> {
    let position = match kind {
        ContentKind::Series => candidates
            .iter()
            .position(|c| c.kind == ItemKind::Episode)
            .unwrap_or(0),
        ContentKind::Movie => 0,
    };
    candidates.into_iter().nth(position)
}

/// Stateless resolver shared by all requests.
pub struct Resolver {
    catalog: Arc<dyn Catalog>,
    assembler: StreamAssembler,
}

impl Resolver {
    pub fn new(catalog: Arc<dyn Catalog>, assembler: StreamAssembler) -> Self {
        Self { catalog, assembler }
    }

    pub fn catalog(&self) -> &dyn Catalog {
        self.catalog.as_ref()
    }

    pub fn assembler(&self) -> &StreamAssembler {
        &self.assembler
    }

    /// Verified candidates for a base id (no season/episode suffix).
    pub async fn candidates(
        &self,
        kind: ContentKind,
        base: &str,
    ) -> Result<Vec<MediaItem>, LookupError> {
        matcher::find_candidates(self.catalog(), base, Some(kind.item_kind())).await
    }

    /// The movie or series itself behind a base id: the first candidate of
    /// exactly `kind`. Episodes never stand in for their series here.
    pub async fn lookup(
        &self,
        kind: ContentKind,
        base: &str,
    ) -> Result<Option<MediaItem>, LookupError> {
        let wanted = kind.item_kind();
        let candidates = self.candidates(kind, base).await?;
        Ok(candidates.into_iter().find(|c| c.kind == wanted))
    }

    /// Streams for `external_id` requested as `kind`.
    pub async fn resolve(&self, kind: ContentKind, external_id: &str) -> Resolution {
        let request = parse_external_id(kind, external_id);

        let candidate = match self.candidates(kind, &request.base).await {
            Ok(candidates) => match select_canonical(candidates, kind) {
                Some(item) => item,
                None => return Resolution::Empty(EmptyReason::NoMatchingItem),
            },
            Err(e) => {
                if let LookupError::Upstream(ref err) = e {
                    warn!(external_id, error = %err, "provider-id lookup failed");
                }
                return Resolution::Empty(e.into());
            }
        };

        let playable = match kind {
            ContentKind::Movie => candidate,
            ContentKind::Series => {
                let Some(coords) = request.episode else {
                    return Resolution::Empty(EmptyReason::MissingEpisodeCoordinates);
                };
                if candidate.kind == ItemKind::Episode {
                    candidate
                } else {
                    match episodes::locate(self.catalog(), &candidate.id, coords).await {
                        Ok(Some(found)) => {
                            debug!(
                                external_id,
                                episode_id = %found.item.id,
                                phase = ?found.phase,
                                "located episode"
                            );
                            found.item
                        }
                        Ok(None) => return Resolution::Empty(EmptyReason::EpisodeNotFound),
                        Err(e) => {
                            warn!(external_id, error = %e, "episode lookup failed");
                            return Resolution::Empty(EmptyReason::Upstream(e.to_string()));
                        }
                    }
                }
            }
        };

        let streams = self.assembler.assemble(&playable, &playable.media_sources);
        if streams.is_empty() {
            return Resolution::Empty(EmptyReason::NoPlayableSource);
        }
        Resolution::Streams(streams)
    }
}

#[cfg(test)]
mod tests {
    use stremfin_jellyfin::memory::{InMemoryCatalog, Operation};

    use super::*;
    use crate::fixtures::{
        assembler, episode, movie, series, video_source, with_provider, with_sources,
    };

    fn resolver(catalog: InMemoryCatalog) -> (Arc<InMemoryCatalog>, Resolver) {
        let catalog = Arc::new(catalog);
        let resolver = Resolver::new(catalog.clone(), assembler());
        (catalog, resolver)
    }

    fn breaking_bad() -> Vec<MediaItem> {
        vec![
            with_provider(series("bb", "Breaking Bad"), "Imdb", "tt0903747"),
            with_sources(
                episode("bb-s1e1", "bb", 1, 1),
                vec![video_source("bb-s1e1-4k", 2160), video_source("bb-s1e1-hd", 1080)],
            ),
            with_sources(
                episode("bb-s1e2", "bb", 1, 2),
                vec![video_source("bb-s1e2", 1080)],
            ),
        ]
    }

    #[tokio::test]
    async fn series_episode_end_to_end() {
        let (_, resolver) = resolver(InMemoryCatalog::new(breaking_bad()));
        let resolution = resolver.resolve(ContentKind::Series, "tt0903747:1:1").await;
        let streams = resolution.streams();
        assert_eq!(streams.len(), 2);
        assert_eq!(streams[0].title, "Jellyfin\n4K");
        assert_eq!(streams[1].title, "Jellyfin\n1080p");
        assert_eq!(
            streams[0].behavior_hints.binge_group,
            streams[1].behavior_hints.binge_group
        );
        assert_eq!(streams[0].behavior_hints.binge_group, "stremfin-bb");
    }

    #[tokio::test]
    async fn resolution_is_repeatable() {
        let (_, resolver) = resolver(InMemoryCatalog::new(breaking_bad()));
        let first = resolver.resolve(ContentKind::Series, "tt0903747:1:1").await;
        let second = resolver.resolve(ContentKind::Series, "tt0903747:1:1").await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn movie_by_tmdb_id() {
        let heat = with_sources(
            with_provider(movie("heat", "Heat"), "Tmdb", "949"),
            vec![video_source("heat", 1080)],
        );
        let (_, resolver) = resolver(InMemoryCatalog::new(vec![heat]));
        let streams = resolver.resolve(ContentKind::Movie, "tmdb:949").await.into_streams();
        assert_eq!(streams.len(), 1);
        assert!(streams[0].url.contains("/Videos/heat/stream"));
    }

    #[tokio::test]
    async fn series_without_coordinates_is_empty() {
        let (_, resolver) = resolver(InMemoryCatalog::new(breaking_bad()));
        let resolution = resolver.resolve(ContentKind::Series, "tt0903747").await;
        assert_eq!(
            resolution.empty_reason(),
            Some(&EmptyReason::MissingEpisodeCoordinates)
        );
    }

    #[tokio::test]
    async fn unparseable_suffix_finds_nothing() {
        let (catalog, resolver) = resolver(InMemoryCatalog::new(breaking_bad()));
        let resolution = resolver.resolve(ContentKind::Series, "tt0903747:1:x").await;
        assert!(resolution.streams().is_empty());
        assert_eq!(resolution.empty_reason(), Some(&EmptyReason::NoMatchingItem));
        assert_eq!(catalog.calls(Operation::SeasonEpisodes), 0);
    }

    #[tokio::test]
    async fn unknown_episode_is_empty() {
        let (_, resolver) = resolver(InMemoryCatalog::new(breaking_bad()));
        let resolution = resolver.resolve(ContentKind::Series, "tt0903747:9:9").await;
        assert_eq!(resolution.empty_reason(), Some(&EmptyReason::EpisodeNotFound));
    }

    #[tokio::test]
    async fn unrecognized_scheme_skips_upstream() {
        let (catalog, resolver) = resolver(InMemoryCatalog::new(breaking_bad()));
        let resolution = resolver.resolve(ContentKind::Movie, "kitsu:1").await;
        assert_eq!(resolution.empty_reason(), Some(&EmptyReason::UnrecognizedId));
        assert_eq!(catalog.calls(Operation::Search), 0);
    }

    #[tokio::test]
    async fn upstream_outage_degrades_to_empty() {
        let catalog = InMemoryCatalog::new(breaking_bad());
        catalog.fail(Operation::Search);
        let (catalog, resolver) = resolver(catalog);
        let resolution = resolver.resolve(ContentKind::Series, "tt0903747:1:1").await;
        assert!(matches!(
            resolution.empty_reason(),
            Some(EmptyReason::Upstream(_))
        ));
        assert_eq!(catalog.calls(Operation::Search), 1);
    }

    #[tokio::test]
    async fn no_match_is_distinct_from_outage() {
        let (catalog, resolver) = resolver(InMemoryCatalog::new(breaking_bad()));
        let resolution = resolver.resolve(ContentKind::Movie, "tt0000001").await;
        assert_eq!(resolution.empty_reason(), Some(&EmptyReason::NoMatchingItem));
        assert_eq!(catalog.calls(Operation::Search), 1);
    }

    #[tokio::test]
    async fn episode_candidate_is_used_directly() {
        let direct = with_sources(
            with_provider(episode("pilot", "bb", 1, 1), "Imdb", "tt0959621"),
            vec![video_source("pilot", 720)],
        );
        let wrapper = with_provider(series("bb", "Breaking Bad"), "Imdb", "tt0959621");
        let catalog = InMemoryCatalog::new(vec![]).with_search_results(vec![wrapper, direct]);
        let (catalog, resolver) = resolver(catalog);

        let streams = resolver
            .resolve(ContentKind::Series, "tt0959621:1:1")
            .await
            .into_streams();
        assert_eq!(streams.len(), 1);
        assert_eq!(streams[0].title, "Jellyfin\n720p");
        assert_eq!(catalog.calls(Operation::SeasonEpisodes), 0);
        assert_eq!(catalog.calls(Operation::AllEpisodes), 0);
    }

    #[tokio::test]
    async fn native_series_id_with_episode() {
        let (_, resolver) = resolver(InMemoryCatalog::new(breaking_bad()));
        let streams = resolver
            .resolve(ContentKind::Series, "native:bb:1:2")
            .await
            .into_streams();
        assert_eq!(streams.len(), 1);
        assert!(streams[0].url.contains("/Videos/bb-s1e2/stream"));
    }

    #[tokio::test]
    async fn broken_season_filter_still_resolves() {
        let catalog = InMemoryCatalog::new(breaking_bad()).with_broken_season_filter();
        let (_, resolver) = resolver(catalog);
        let streams = resolver
            .resolve(ContentKind::Series, "tt0903747:1:2")
            .await
            .into_streams();
        assert_eq!(streams.len(), 1);
    }

    #[tokio::test]
    async fn native_id_of_other_kind_is_empty() {
        let (catalog, resolver) = resolver(InMemoryCatalog::new(breaking_bad()));
        let resolution = resolver.resolve(ContentKind::Movie, "native:bb").await;
        assert!(resolution.streams().is_empty());
        assert_eq!(resolution.empty_reason(), Some(&EmptyReason::NoMatchingItem));
        assert_eq!(catalog.calls(Operation::GetItem), 1);
    }

    #[tokio::test]
    async fn lookup_skips_episode_candidates() {
        let wrapper = with_provider(series("bb", "Breaking Bad"), "Imdb", "tt0903747");
        let stray = with_provider(episode("bb-s1e1", "bb", 1, 1), "Imdb", "tt0903747");
        let catalog = InMemoryCatalog::new(vec![]).with_search_results(vec![stray, wrapper]);
        let (_, resolver) = resolver(catalog);

        let found = resolver
            .lookup(ContentKind::Series, "tt0903747")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, "bb");
    }

    #[test]
    fn canonical_is_first_for_movies() {
        let picked = select_canonical(
            vec![movie("a", "A"), episode("e", "s", 1, 1)],
            ContentKind::Movie,
        );
        assert_eq!(picked.unwrap().id, "a");
        assert!(select_canonical(vec![], ContentKind::Series).is_none());
    }
}
