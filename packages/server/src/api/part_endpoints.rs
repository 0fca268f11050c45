//! Part Board Endpoints
//!
//! # Endpoints
//!
//! - `GET /api/parts` - All parts with memberships resolved to summaries
//! - `POST /api/parts` - Create an empty part
//! - `PATCH /api/parts/reorder` - Apply a drag-and-drop move
//! - `PATCH /api/parts/:id` - Rename a part
//! - `DELETE /api/parts/:id` - Delete a part

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, patch},
    Router,
};
use serde::Deserialize;

use crate::api::bhajan_endpoints::Ack;
use crate::api::{AppState, HttpError};
use bhajanmala_core::{MoveInstruction, Part, PartView};

/// Request body for creating or renaming a part
#[derive(Debug, Deserialize)]
pub struct PartTitleRequest {
    pub title: String,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/parts", get(list_parts).post(create_part))
        .route("/api/parts/reorder", patch(reorder_parts))
        .route("/api/parts/:id", patch(rename_part).delete(delete_part))
        .with_state(state)
}

/// All parts with their bhajans resolved, part order then membership order
async fn list_parts(State(state): State<AppState>) -> Result<Json<Vec<PartView>>, HttpError> {
    Ok(Json(state.parts.list_parts_with_bhajans().await?))
}

/// Create an empty part appended after the current last one
async fn create_part(
    State(state): State<AppState>,
    Json(request): Json<PartTitleRequest>,
) -> Result<(StatusCode, Json<Part>), HttpError> {
    let created = state.parts.create_part(&request.title).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Apply a drag-and-drop move instruction
async fn reorder_parts(
    State(state): State<AppState>,
    Json(instruction): Json<MoveInstruction>,
) -> Result<Json<Ack>, HttpError> {
    state.reorder.apply_move(instruction).await?;
    Ok(Json(Ack { success: true }))
}

async fn rename_part(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<PartTitleRequest>,
) -> Result<Json<Part>, HttpError> {
    Ok(Json(state.parts.rename_part(&id, &request.title).await?))
}

async fn delete_part(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Ack>, HttpError> {
    state.parts.delete_part(&id).await?;
    Ok(Json(Ack { success: true }))
}
