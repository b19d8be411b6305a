use serde::{Deserialize, Serialize};

/// Jellyfin item type, as found in the `Type` field of an item record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Movie,
    Series,
    Season,
    Episode,
    #[default]
    #[serde(other)]
    Other,
}

impl ItemKind {
    /// Name used by Jellyfin in `Type` and `IncludeItemTypes`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "Movie",
            Self::Series => "Series",
            Self::Season => "Season",
            Self::Episode => "Episode",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content type in the addon protocol (`/stream/{type}/...`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Movie,
    Series,
}

impl ContentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
        }
    }

    /// The top-level catalog item kind this content type browses.
    pub fn item_kind(self) -> ItemKind {
        match self {
            Self::Movie => ItemKind::Movie,
            Self::Series => ItemKind::Series,
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(Self::Movie),
            "series" => Ok(Self::Series),
            other => Err(format!("unsupported content type: {other}")),
        }
    }
}

/// Elementary stream type inside a media source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamKind {
    Video,
    Audio,
    Subtitle,
    #[default]
    #[serde(other)]
    Other,
}

/// Jellyfin image slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Primary,
    Backdrop,
    Thumb,
}

impl ImageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "Primary",
            Self::Backdrop => "Backdrop",
            Self::Thumb => "Thumb",
        }
    }
}

/// External identifier naming scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Imdb,
    Tmdb,
    Tvdb,
    AniDb,
    /// A Jellyfin item id, looked up directly.
    Native,
}

impl Scheme {
    /// Schemes in the order an external id is computed for an item.
    pub const PROVIDERS: [Scheme; 4] = [Self::Imdb, Self::Tmdb, Self::Tvdb, Self::AniDb];

    /// Key under which Jellyfin records this scheme in `ProviderIds`.
    pub fn provider_key(self) -> Option<&'static str> {
        match self {
            Self::Imdb => Some("Imdb"),
            Self::Tmdb => Some("Tmdb"),
            Self::Tvdb => Some("Tvdb"),
            Self::AniDb => Some("AniDB"),
            Self::Native => None,
        }
    }

    /// Prefix of the external identifier in the addon protocol.
    ///
    /// IMDb ids keep their `tt` as part of the value.
    pub fn id_prefix(self) -> &'static str {
        match self {
            Self::Imdb => "tt",
            Self::Tmdb => "tmdb:",
            Self::Tvdb => "tvdb:",
            Self::AniDb => "anidb:",
            Self::Native => "native:",
        }
    }

    /// Render `value` as an external identifier of this scheme.
    pub fn external_id(self, value: &str) -> String {
        match self {
            Self::Imdb => value.to_string(),
            _ => format!("{}{value}", self.id_prefix()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_kind_parses_jellyfin_types() {
        let kinds: Vec<ItemKind> =
            serde_json::from_str(r#"["Movie", "Series", "Episode", "BoxSet"]"#).unwrap();
        assert_eq!(
            kinds,
            vec![
                ItemKind::Movie,
                ItemKind::Series,
                ItemKind::Episode,
                ItemKind::Other
            ]
        );
    }

    #[test]
    fn content_kind_from_path_segment() {
        assert_eq!("movie".parse::<ContentKind>(), Ok(ContentKind::Movie));
        assert_eq!("series".parse::<ContentKind>(), Ok(ContentKind::Series));
        assert!("tv".parse::<ContentKind>().is_err());
    }

    #[test]
    fn external_id_rendering() {
        assert_eq!(Scheme::Imdb.external_id("tt0903747"), "tt0903747");
        assert_eq!(Scheme::Tmdb.external_id("1396"), "tmdb:1396");
        assert_eq!(Scheme::Native.external_id("abc"), "native:abc");
    }
}
