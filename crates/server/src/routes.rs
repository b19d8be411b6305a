use axum::extract::{Path, State};
use axum::http::Uri;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use stremfin_addon::meta;
use stremfin_addon::resolve::Resolution;
use stremfin_core::addon::{MetaResponse, MetasResponse, StreamsResponse};
use stremfin_core::error::ApiError;
use stremfin_core::types::ContentKind;
use stremfin_jellyfin::ItemQuery;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::manifest::Manifest;
use crate::state::AppState;

const JSON_SUFFIX: &str = ".json";

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/manifest.json", get(manifest))
        .route("/catalog/{kind}/{id}", get(catalog))
        .route("/catalog/{kind}/{id}/{extra}", get(catalog_with_extra))
        .route("/meta/{kind}/{id}", get(meta_detail))
        .route("/stream/{kind}/{id}", get(streams))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Resource ids arrive as `<id>.json`; anything else is not an addon route.
fn strip_json(segment: &str) -> Option<&str> {
    segment
        .strip_suffix(JSON_SUFFIX)
        .filter(|id| !id.is_empty())
}

// ---------------------------------------------------------------------------
// Health / manifest
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

async fn manifest(State(state): State<AppState>) -> Json<Manifest> {
    Json(state.manifest.as_ref().clone())
}

// ---------------------------------------------------------------------------
// Streams
// ---------------------------------------------------------------------------

async fn streams(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
) -> Json<StreamsResponse> {
    let (Ok(kind), Some(id)) = (kind.parse::<ContentKind>(), strip_json(&id)) else {
        debug!(%kind, %id, "stream request for unsupported type or id");
        return Json(StreamsResponse::default());
    };

    let streams = match state.resolver.resolve(kind, id).await {
        Resolution::Streams(streams) => streams,
        Resolution::Empty(reason) => {
            debug!(kind = kind.as_str(), id, %reason, "no streams");
            Vec::new()
        }
    };
    Json(StreamsResponse { streams })
}

// ---------------------------------------------------------------------------
// Catalogs
// ---------------------------------------------------------------------------

async fn catalog(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
) -> Json<MetasResponse> {
    let Some(id) = strip_json(&id) else {
        return Json(MetasResponse::default());
    };
    let query = ItemQuery {
        limit: state.catalog_page_size,
        ..Default::default()
    };
    browse_page(&state, &kind, id, query).await
}

async fn catalog_with_extra(
    State(state): State<AppState>,
    Path((kind, id, _)): Path<(String, String, String)>,
    uri: Uri,
) -> Json<MetasResponse> {
    // Extra values are form-encoded; take the raw segment so they are decoded once.
    let raw_extra = uri.path().rsplit('/').next().unwrap_or_default();
    let Some(extra) = strip_json(raw_extra) else {
        return Json(MetasResponse::default());
    };
    let query = parse_extra(extra, state.catalog_page_size);
    browse_page(&state, &kind, &id, query).await
}

async fn browse_page(
    state: &AppState,
    kind: &str,
    id: &str,
    query: ItemQuery,
) -> Json<MetasResponse> {
    let Ok(kind) = kind.parse::<ContentKind>() else {
        return Json(MetasResponse::default());
    };
    if !state.manifest.serves_catalog(kind, id) {
        debug!(kind = kind.as_str(), id, "unknown catalog");
        return Json(MetasResponse::default());
    }

    match meta::browse(&state.resolver, kind, &query).await {
        Ok(metas) => Json(MetasResponse { metas }),
        Err(e) => {
            warn!(catalog = id, error = %e, "catalog listing failed");
            Json(MetasResponse::default())
        }
    }
}

/// `search=..&skip=..&genre=..`. Unknown keys and unparseable skips are ignored.
pub fn parse_extra(extra: &str, page_size: u32) -> ItemQuery {
    let mut query = ItemQuery {
        limit: page_size,
        ..Default::default()
    };
    for (key, value) in url::form_urlencoded::parse(extra.as_bytes()) {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        match key.as_ref() {
            "search" => query.search = Some(value.to_string()),
            "genre" => query.genre = Some(value.to_string()),
            "skip" => query.skip = value.parse().unwrap_or(0),
            _ => {}
        }
    }
    query
}

// ---------------------------------------------------------------------------
// Meta
// ---------------------------------------------------------------------------

async fn meta_detail(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Json<MetaResponse>, AppError> {
    let kind = kind
        .parse::<ContentKind>()
        .map_err(ApiError::NotFound)?;
    let id = strip_json(&id).ok_or_else(|| ApiError::NotFound(format!("no meta for {id:?}")))?;

    match meta::meta(&state.resolver, kind, id).await? {
        Some(detail) => Ok(Json(MetaResponse { meta: detail })),
        None => Err(ApiError::NotFound(format!("no {} for {id:?}", kind.as_str())).into()),
    }
}
