//! Addon manifest served at `/manifest.json`.

use serde::Serialize;
use stremfin_core::types::{ContentKind, Scheme};

pub const ADDON_ID: &str = "org.stremfin.jellyfin";
pub const MOVIES_CATALOG: &str = "stremfin-movies";
pub const SERIES_CATALOG: &str = "stremfin-series";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub id: String,
    pub version: String,
    pub name: String,
    pub description: String,
    pub resources: Vec<String>,
    pub types: Vec<ContentKind>,
    pub catalogs: Vec<CatalogDescriptor>,
    pub id_prefixes: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogDescriptor {
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub id: String,
    pub name: String,
    pub extra: Vec<CatalogExtra>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogExtra {
    pub name: String,
    pub is_required: bool,
}

impl Manifest {
    pub fn new(server_name: &str) -> Self {
        let prefixes = Scheme::PROVIDERS
            .into_iter()
            .chain([Scheme::Native])
            .map(|s| s.id_prefix().to_string())
            .collect();

        Self {
            id: ADDON_ID.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            name: format!("{server_name} (stremfin)"),
            description: format!("Streams and catalogs from the {server_name} media server"),
            resources: ["catalog", "meta", "stream"].map(String::from).to_vec(),
            types: vec![ContentKind::Movie, ContentKind::Series],
            catalogs: vec![
                catalog(ContentKind::Movie, MOVIES_CATALOG, format!("{server_name} Movies")),
                catalog(ContentKind::Series, SERIES_CATALOG, format!("{server_name} Series")),
            ],
            id_prefixes: prefixes,
        }
    }

    /// Whether a catalog `id` of type `kind` is declared.
    pub fn serves_catalog(&self, kind: ContentKind, id: &str) -> bool {
        self.catalogs.iter().any(|c| c.id == id && c.kind == kind)
    }
}

fn catalog(kind: ContentKind, id: &str, name: String) -> CatalogDescriptor {
    let extra = ["search", "skip", "genre"]
        .into_iter()
        .map(|name| CatalogExtra {
            name: name.to_string(),
            is_required: false,
        })
        .collect();
    CatalogDescriptor {
        kind,
        id: id.to_string(),
        name,
        extra,
    }
}
