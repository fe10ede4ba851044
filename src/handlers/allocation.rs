// src/handlers/allocation.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    models::profiles::Engineer,
    services::allocation_service::AssignOutcome,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignJobPayload {
    pub job_id: Uuid,
    // Null desatribui; ids 'mock-*' são fixtures de demo e não persistem.
    pub engineer_id: Option<String>,
}

// GET /api/allocation
pub async fn get_board(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let board = app_state.allocation_service.board().await?;
    Ok((StatusCode::OK, Json(board)))
}

// POST /api/allocation/assign
pub async fn assign_job(
    State(app_state): State<AppState>,
    Json(payload): Json<AssignJobPayload>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = app_state
        .allocation_service
        .assign(payload.job_id, payload.engineer_id)
        .await?;

    let status = match outcome {
        AssignOutcome::Persisted => "assigned",
        AssignOutcome::DemoSkipped => "demo",
    };

    Ok((StatusCode::OK, Json(json!({ "status": status }))))
}

// GET /api/engineers
#[utoipa::path(
    get,
    path = "/api/engineers",
    tag = "Allocation",
    responses(
        (status = 200, description = "Perfis com papel engineer ou admin", body = Vec<Engineer>)
    )
)]
pub async fn list_engineers(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let rows = app_state.profiles.list_engineers().await?;
    let engineers: Vec<Engineer> = rows.into_iter().map(Engineer::from_row).collect();
    Ok((StatusCode::OK, Json(engineers)))
}
