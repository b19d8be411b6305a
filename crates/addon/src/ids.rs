use stremfin_core::types::ContentKind;

/// Season and episode numbers carried by a series id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeCoords {
    pub season: u32,
    pub episode: u32,
}

/// An external id split into its base identifier and optional episode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRequest {
    pub base: String,
    pub episode: Option<EpisodeCoords>,
}

/// Split a requested id for `kind`.
///
/// Series ids may end in `:<season>:<episode>`; the base keeps any colons of
/// its own (`tmdb:1396:1:2` → `tmdb:1396`). If either trailing segment is not
/// a plain non-negative integer the whole string is the base. Movie ids are
/// never split.
pub fn parse_external_id(kind: ContentKind, raw: &str) -> ContentRequest {
    if kind == ContentKind::Series {
        if let Some((base, coords)) = split_episode_suffix(raw) {
            return ContentRequest {
                base: base.to_string(),
                episode: Some(coords),
            };
        }
    }
    ContentRequest {
        base: raw.to_string(),
        episode: None,
    }
}

fn split_episode_suffix(raw: &str) -> Option<(&str, EpisodeCoords)> {
    let mut parts = raw.rsplitn(3, ':');
    let episode = parse_index(parts.next()?)?;
    let season = parse_index(parts.next()?)?;
    let base = parts.next()?;
    Some((base, EpisodeCoords { season, episode }))
}

fn parse_index(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
