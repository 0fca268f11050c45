//! HTTP API for the bhajan catalog
//!
//! REST surface consumed by the public site and the admin dashboard. The
//! router is assembled from modular endpoint modules merged into one
//! [`axum::Router`]:
//! - `bhajan_endpoints`: catalog CRUD, featured picks, flat catalog reorder
//! - `part_endpoints`: part CRUD, resolved listings, drag-and-drop moves
//!
//! # Security
//!
//! No authentication; deploy behind a reverse proxy that handles it. CORS is
//! open by default and can be pinned with `CORS_ALLOW_ORIGIN`.

use std::sync::Arc;

use axum::{
    http::{header, Method},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use bhajanmala_core::{BhajanService, PartService, ReorderEngine};

mod bhajan_endpoints;
mod http_error;
mod part_endpoints;

pub use http_error::HttpError;

/// Application state shared across all endpoints
#[derive(Clone)]
pub struct AppState {
    pub bhajans: Arc<BhajanService>,
    pub parts: Arc<PartService>,
    pub reorder: Arc<ReorderEngine>,
    /// Featured picks for the home page, resolved lazily per request
    pub featured_ids: Arc<Vec<String>>,
}

/// Create the main application router with all endpoint modules
pub fn create_router(state: AppState, cors_origin: Option<&str>) -> Router {
    Router::new()
        .merge(bhajan_endpoints::routes(state.clone()))
        .merge(part_endpoints::routes(state))
        .layer(cors_layer(cors_origin))
        .layer(TraceLayer::new_for_http())
}

/// CORS layer; open unless an origin is pinned via configuration
fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers(Any);

    match origin.and_then(|raw| {
        raw.parse::<header::HeaderValue>()
            .map_err(|_| tracing::warn!("Ignoring unparseable CORS origin: {}", raw))
            .ok()
    }) {
        Some(origin) => layer.allow_origin(origin),
        None => layer.allow_origin(Any),
    }
}

/// Start the HTTP server and serve until shutdown
pub async fn start_server(
    state: AppState,
    port: u16,
    cors_origin: Option<&str>,
) -> anyhow::Result<()> {
    let app = create_router(state, cors_origin);

    let addr = format!("127.0.0.1:{}", port);
    tracing::info!("🚀 Bhajanmala API server starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
