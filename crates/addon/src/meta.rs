//! Catalog and meta projections of upstream items.

use chrono::{Datelike, SecondsFormat};
use stremfin_core::addon::{CatalogEntry, MetaDetail, MetaVideo};
use stremfin_core::model::MediaItem;
use stremfin_core::types::{ContentKind, ImageKind, Scheme};
use stremfin_jellyfin::{Endpoints, ItemQuery, JellyfinError};

use crate::ids::parse_external_id;
use crate::matcher::LookupError;
use crate::resolve::Resolver;

/// External id under which an item is published.
///
/// Preference: IMDb, TMDb, TVDb, AniDb, then the Jellyfin id itself.
pub fn external_id(item: &MediaItem) -> String {
    Scheme::PROVIDERS
        .into_iter()
        .find_map(|scheme| {
            let key = scheme.provider_key()?;
            item.provider_id(key).map(|value| scheme.external_id(value))
        })
        .unwrap_or_else(|| Scheme::Native.external_id(&item.id))
}

pub fn catalog_entry(item: &MediaItem, kind: ContentKind, endpoints: &Endpoints) -> CatalogEntry {
    let release_info = item
        .production_year
        .or_else(|| item.premiere_date.map(|d| d.year()))
        .map(|y| y.to_string());

    CatalogEntry {
        id: external_id(item),
        kind,
        name: item.name.clone(),
        poster: Some(endpoints.image_url(&item.id, ImageKind::Primary)),
        background: Some(endpoints.image_url(&item.id, ImageKind::Backdrop)),
        description: item.overview.clone().filter(|o| !o.is_empty()),
        release_info,
        genres: item.genres.clone(),
    }
}

/// Episode list of a series meta, ordered by season then episode.
///
/// Episodes without both numbers cannot be addressed by id and are left out.
pub fn series_videos(
    series_id: &str,
    episodes: &[MediaItem],
    endpoints: &Endpoints,
) -> Vec<MetaVideo> {
    let mut videos: Vec<MetaVideo> = episodes
        .iter()
        .filter_map(|ep| {
            let season = ep.parent_index_number?;
            let number = ep.index_number?;
            let title = if ep.name.is_empty() {
                format!("Episode {number}")
            } else {
                ep.name.clone()
            };
            Some(MetaVideo {
                id: format!("{series_id}:{season}:{number}"),
                title,
                season,
                episode: number,
                released: ep
                    .premiere_date
                    .map(|d| d.to_rfc3339_opts(SecondsFormat::Millis, true)),
                thumbnail: Some(endpoints.image_url(&ep.id, ImageKind::Primary)),
                overview: ep.overview.clone().filter(|o| !o.is_empty()),
            })
        })
        .collect();
    videos.sort_by_key(|v| (v.season, v.episode));
    videos
}

/// One catalog page of `kind`.
pub async fn browse(
    resolver: &Resolver,
    kind: ContentKind,
    query: &ItemQuery,
) -> Result<Vec<CatalogEntry>, JellyfinError> {
    let items = resolver
        .catalog()
        .list_items(kind.item_kind(), query)
        .await?;
    let endpoints = resolver.assembler().endpoints();
    Ok(items
        .iter()
        .map(|item| catalog_entry(item, kind, endpoints))
        .collect())
}

/// Full meta for `raw_id`, or `None` when nothing matches.
///
/// A `:season:episode` suffix on series ids is ignored. The meta keeps the
/// requested id so episode ids derived from it resolve back to this series.
pub async fn meta(
    resolver: &Resolver,
    kind: ContentKind,
    raw_id: &str,
) -> Result<Option<MetaDetail>, LookupError> {
    let request = parse_external_id(kind, raw_id);
    let Some(item) = resolver.lookup(kind, &request.base).await? else {
        return Ok(None);
    };

    let endpoints = resolver.assembler().endpoints();
    let mut entry = catalog_entry(&item, kind, endpoints);
    entry.id = request.base.clone();

    let videos = match kind {
        ContentKind::Series => {
            let episodes = resolver.catalog().get_episodes(&item.id, None).await?;
            series_videos(&request.base, &episodes, endpoints)
        }
        ContentKind::Movie => Vec::new(),
    };

    Ok(Some(MetaDetail { entry, videos }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use stremfin_jellyfin::memory::{InMemoryCatalog, Operation};

    use super::*;
    use crate::fixtures::{assembler, endpoints, episode, movie, series, with_provider};

    #[test]
    fn external_id_preference() {
        let both = with_provider(
            with_provider(movie("m", "M"), "Tmdb", "603"),
            "Imdb",
            "tt0133093",
        );
        assert_eq!(external_id(&both), "tt0133093");

        let tvdb = with_provider(series("s", "S"), "tvdb", "81189");
        assert_eq!(external_id(&tvdb), "tvdb:81189");

        let anidb = with_provider(series("a", "A"), "AniDB", "69");
        assert_eq!(external_id(&anidb), "anidb:69");

        assert_eq!(external_id(&movie("abc", "Home video")), "native:abc");
    }

    #[test]
    fn entry_projection() {
        let mut item = with_provider(movie("m1", "Heat"), "Imdb", "tt0113277");
        item.production_year = Some(1995);
        item.genres = vec!["Crime".into()];
        item.overview = Some(String::new());

        let entry = catalog_entry(&item, ContentKind::Movie, &endpoints());
        assert_eq!(entry.id, "tt0113277");
        assert_eq!(entry.release_info.as_deref(), Some("1995"));
        assert_eq!(
            entry.poster.as_deref(),
            Some("http://jf.local:8096/Items/m1/Images/Primary")
        );
        assert_eq!(entry.description, None);
        assert_eq!(entry.genres, vec!["Crime".to_string()]);
    }

    #[test]
    fn videos_sorted_and_addressable() {
        let mut unnumbered = episode("x", "bb", 1, 1);
        unnumbered.index_number = None;
        let episodes = vec![
            episode("e3", "bb", 2, 1),
            episode("e2", "bb", 1, 2),
            unnumbered,
            episode("e1", "bb", 1, 1),
        ];
        let videos = series_videos("tt0903747", &episodes, &endpoints());
        let ids: Vec<_> = videos.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["tt0903747:1:1", "tt0903747:1:2", "tt0903747:2:1"]);
        assert_eq!(videos[0].title, "Episode 1");
    }

    #[tokio::test]
    async fn series_meta_lists_episodes() {
        let catalog = Arc::new(InMemoryCatalog::new(vec![
            with_provider(series("bb", "Breaking Bad"), "Imdb", "tt0903747"),
            episode("e1", "bb", 1, 1),
            episode("e2", "bb", 1, 2),
        ]));
        let resolver = Resolver::new(catalog.clone(), assembler());

        let detail = meta(&resolver, ContentKind::Series, "tt0903747:1:1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(detail.entry.id, "tt0903747");
        assert_eq!(detail.entry.name, "Breaking Bad");
        assert_eq!(detail.videos.len(), 2);
        assert_eq!(catalog.calls(Operation::AllEpisodes), 1);
    }

    #[tokio::test]
    async fn series_meta_ignores_over_returned_episode() {
        let show = with_provider(series("bb", "Breaking Bad"), "Imdb", "tt0903747");
        let stray = with_provider(episode("e1", "bb", 1, 1), "Imdb", "tt0903747");
        let catalog = InMemoryCatalog::new(vec![
            show.clone(),
            episode("e1", "bb", 1, 1),
            episode("e2", "bb", 1, 2),
        ])
        .with_search_results(vec![show, stray]);
        let resolver = Resolver::new(Arc::new(catalog), assembler());

        let detail = meta(&resolver, ContentKind::Series, "tt0903747")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(detail.entry.name, "Breaking Bad");
        assert_eq!(detail.videos.len(), 2);
    }

    #[tokio::test]
    async fn unknown_meta_is_none() {
        let resolver = Resolver::new(Arc::new(InMemoryCatalog::new(vec![])), assembler());
        assert!(meta(&resolver, ContentKind::Movie, "tt0000001")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn browse_projects_page() {
        let catalog = InMemoryCatalog::new(vec![
            with_provider(movie("m1", "Heat"), "Imdb", "tt0113277"),
            movie("m2", "Home Movie"),
            series("s1", "Not a movie"),
        ]);
        let resolver = Resolver::new(Arc::new(catalog), assembler());
        let query = ItemQuery {
            limit: 10,
            ..Default::default()
        };
        let page = browse(&resolver, ContentKind::Movie, &query).await.unwrap();
        let ids: Vec<_> = page.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["tt0113277", "native:m2"]);
    }
}
