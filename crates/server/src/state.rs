use std::sync::Arc;

use stremfin_addon::resolve::Resolver;
use stremfin_addon::streams::StreamAssembler;
use stremfin_jellyfin::{Catalog, Endpoints};

use crate::manifest::Manifest;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<Resolver>,
    pub manifest: Arc<Manifest>,
    pub catalog_page_size: u32,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        endpoints: Endpoints,
        server_name: &str,
        catalog_page_size: u32,
    ) -> Self {
        let assembler = StreamAssembler::new(endpoints, server_name);
        Self {
            resolver: Arc::new(Resolver::new(catalog, assembler)),
            manifest: Arc::new(Manifest::new(server_name)),
            catalog_page_size,
        }
    }
}
