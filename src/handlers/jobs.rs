// src/handlers/jobs.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{required_field, AppError},
    config::AppState,
    models::jobs::{Job, JobStatus},
    models::money::ItemKind,
    services::job_service::JobDraftItem,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobItemPayload {
    #[schema(example = "Vacuum Pump Oil (5L)")]
    pub description: String,

    #[schema(example = "2.0")]
    pub quantity: Decimal,

    #[schema(example = "45.00")]
    pub unit_price: Decimal,

    #[serde(rename = "type")]
    pub kind: ItemKind,

    pub product_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobPayload {
    pub customer_id: Option<Uuid>,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Annual Milking Machine Service")]
    pub description: String,

    pub status: Option<JobStatus>,

    #[schema(value_type = String, format = Date, example = "2024-02-15")]
    pub scheduled_date: NaiveDate,

    #[serde(default)]
    pub items: Vec<JobItemPayload>,

    #[schema(example = "60.00")]
    pub labor_rate: Option<Decimal>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobStatusPayload {
    pub status: JobStatus,
}

// GET /api/jobs
#[utoipa::path(
    get,
    path = "/api/jobs",
    tag = "Jobs",
    responses(
        (status = 200, description = "Lista de jobs (itens omitidos, totais derivados)", body = Vec<Job>)
    )
)]
pub async fn list_jobs(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let jobs = app_state.job_service.list_jobs().await?;
    Ok((StatusCode::OK, Json(jobs)))
}

// GET /api/jobs/{id}
#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    tag = "Jobs",
    params(("id" = Uuid, Path, description = "ID do job")),
    responses(
        (status = 200, description = "Job com os line items", body = Job),
        (status = 404, description = "Job não encontrado")
    )
)]
pub async fn get_job(
    State(app_state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let job = app_state.job_service.get_job(job_id).await?;
    Ok((StatusCode::OK, Json(job)))
}

// POST /api/jobs
#[utoipa::path(
    post,
    path = "/api/jobs",
    tag = "Jobs",
    request_body = CreateJobPayload,
    responses(
        (status = 201, description = "Job criado", body = Job),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn create_job(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateJobPayload>,
) -> Result<impl IntoResponse, AppError> {
    // Validação antes de qualquer tentativa de persistência.
    payload.validate()?;
    let Some(customer_id) = payload.customer_id else {
        return Err(required_field("customerId"));
    };

    let items = payload
        .items
        .into_iter()
        .map(|i| JobDraftItem {
            description: i.description,
            quantity: i.quantity,
            unit_price: i.unit_price,
            kind: i.kind,
            product_id: i.product_id,
        })
        .collect();

    let job = app_state
        .job_service
        .create_job(
            customer_id,
            payload.description,
            payload.status.unwrap_or(JobStatus::Scheduled),
            payload.scheduled_date,
            items,
            payload.labor_rate,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(job)))
}

// PATCH /api/jobs/{id}/status
#[utoipa::path(
    patch,
    path = "/api/jobs/{id}/status",
    tag = "Jobs",
    params(("id" = Uuid, Path, description = "ID do job")),
    request_body = UpdateJobStatusPayload,
    responses(
        (status = 200, description = "Status atualizado", body = Job),
        (status = 404, description = "Job não encontrado")
    )
)]
pub async fn update_job_status(
    State(app_state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(payload): Json<UpdateJobStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let job = app_state
        .job_service
        .update_status(job_id, payload.status)
        .await?;

    Ok((StatusCode::OK, Json(job)))
}
