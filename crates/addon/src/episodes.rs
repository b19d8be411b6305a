//! Episode lookup within a series.
//!
//! Jellyfin's season filter is not reliable everywhere (specials, mixed
//! numbering, older servers), so a miss in the season-filtered query falls
//! back to scanning every episode of the series.

use stremfin_core::model::MediaItem;
use stremfin_jellyfin::{Catalog, JellyfinError};
use tracing::{debug, warn};

use crate::ids::EpisodeCoords;

/// Which query produced the episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocatePhase {
    SeasonFiltered,
    FullScan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocatedEpisode {
    pub item: MediaItem,
    pub phase: LocatePhase,
}

/// Find episode `coords` of `series_id`.
///
/// The first phase asks upstream for the season and matches the episode
/// number. Any miss there, including an upstream error, runs the full scan,
/// which matches season and episode locally. Only a failure of the full scan
/// is returned as an error.
pub async fn locate(
    catalog: &dyn Catalog,
    series_id: &str,
    coords: EpisodeCoords,
) -> Result<Option<LocatedEpisode>, JellyfinError> {
    match season_filtered(catalog, series_id, coords).await {
        Ok(Some(item)) => {
            return Ok(Some(LocatedEpisode {
                item,
                phase: LocatePhase::SeasonFiltered,
            }));
        }
        Ok(None) => {
            debug!(
                series_id,
                season = coords.season,
                episode = coords.episode,
                "season query missed, scanning all episodes"
            );
        }
        Err(e) => {
            warn!(series_id, error = %e, "season query failed, scanning all episodes");
        }
    }

    let found = full_scan(catalog, series_id, coords).await?;
    Ok(found.map(|item| LocatedEpisode {
        item,
        phase: LocatePhase::FullScan,
    }))
}

async fn season_filtered(
    catalog: &dyn Catalog,
    series_id: &str,
    coords: EpisodeCoords,
) -> Result<Option<MediaItem>, JellyfinError> {
    let episodes = catalog.get_episodes(series_id, Some(coords.season)).await?;
    Ok(episodes
        .into_iter()
        .find(|e| e.index_number == Some(coords.episode)))
}

async fn full_scan(
    catalog: &dyn Catalog,
    series_id: &str,
    coords: EpisodeCoords,
) -> Result<Option<MediaItem>, JellyfinError> {
    let episodes = catalog.get_episodes(series_id, None).await?;
    Ok(episodes.into_iter().find(|e| {
        e.parent_index_number == Some(coords.season) && e.index_number == Some(coords.episode)
    }))
}
