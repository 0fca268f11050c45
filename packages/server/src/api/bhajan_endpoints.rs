//! Bhajan Catalog Endpoints
//!
//! # Endpoints
//!
//! - `GET /api/health` - Health check
//! - `GET /api/bhajans` - Full catalog, category then order ascending
//! - `POST /api/bhajans` - Create a bhajan
//! - `PATCH /api/bhajans/:id` - Sparse update
//! - `DELETE /api/bhajans/:id` - Delete a bhajan
//! - `GET /api/bhajans/featured` - Configured featured picks
//! - `POST /api/bhajans/reorder` - Flat catalog reorder (admin screen)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use crate::api::{AppState, HttpError};
use bhajanmala_core::{Bhajan, BhajanUpdate, CreateBhajanParams, OrderAssignment};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

/// Request body for creating a bhajan
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBhajanRequest {
    pub title: String,
    pub category: String,
    pub lyrics: String,
    pub description: Option<String>,
    pub language: Option<String>,
}

/// Request body for the flat catalog reorder
#[derive(Debug, Deserialize)]
pub struct ReorderCatalogRequest {
    pub order: Vec<OrderAssignment>,
}

/// Generic acknowledgement body for mutations with nothing else to return
#[derive(Debug, Serialize, Deserialize)]
pub struct Ack {
    pub success: bool,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/bhajans", get(list_bhajans).post(create_bhajan))
        .route(
            "/api/bhajans/:id",
            axum::routing::patch(update_bhajan).delete(delete_bhajan),
        )
        .route("/api/bhajans/featured", get(featured_bhajans))
        .route("/api/bhajans/reorder", post(reorder_catalog))
        .with_state(state)
}

async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Full catalog listing
async fn list_bhajans(State(state): State<AppState>) -> Result<Json<Vec<Bhajan>>, HttpError> {
    Ok(Json(state.bhajans.list_bhajans().await?))
}

/// Create a bhajan; its catalog order is assigned at the end of its category
async fn create_bhajan(
    State(state): State<AppState>,
    Json(request): Json<CreateBhajanRequest>,
) -> Result<(StatusCode, Json<Bhajan>), HttpError> {
    let created = state
        .bhajans
        .create_bhajan(CreateBhajanParams {
            title: request.title,
            category: request.category,
            lyrics: request.lyrics,
            description: request.description,
            language: request.language,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Sparse update; absent fields keep their stored values
async fn update_bhajan(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<BhajanUpdate>,
) -> Result<Json<Bhajan>, HttpError> {
    Ok(Json(state.bhajans.update_bhajan(&id, update).await?))
}

async fn delete_bhajan(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Ack>, HttpError> {
    state.bhajans.delete_bhajan(&id).await?;
    Ok(Json(Ack { success: true }))
}

/// Featured picks for the home page, configured order preserved
async fn featured_bhajans(State(state): State<AppState>) -> Result<Json<Vec<Bhajan>>, HttpError> {
    Ok(Json(state.bhajans.featured(&state.featured_ids).await?))
}

/// Flat catalog reorder: bulk order assignments from the admin screen
async fn reorder_catalog(
    State(state): State<AppState>,
    Json(request): Json<ReorderCatalogRequest>,
) -> Result<Json<Ack>, HttpError> {
    state.bhajans.set_catalog_order(request.order).await?;
    Ok(Json(Ack { success: true }))
}
