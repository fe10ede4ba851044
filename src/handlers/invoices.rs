// src/handlers/invoices.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{required_field, AppError},
    config::AppState,
    models::invoices::Invoice,
    services::document_service::statement_vat_rate,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateInvoicePayload {
    pub job_id: Option<Uuid>,

    // A linha única que substitui o breakdown na fatura do contador.
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Milking Machine Service & Maintenance")]
    pub custom_description: String,

    // 13.5, 23 e 0 são as opções da UI, mas qualquer valor numérico vale.
    #[schema(example = "13.5")]
    pub vat_rate: Option<Decimal>,
}

// GET /api/invoices
#[utoipa::path(
    get,
    path = "/api/invoices",
    tag = "Invoices",
    responses(
        (status = 200, description = "Lista de faturas", body = Vec<Invoice>)
    )
)]
pub async fn list_invoices(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let invoices = app_state.invoice_service.list_invoices().await?;
    Ok((StatusCode::OK, Json(invoices)))
}

// POST /api/invoices
#[utoipa::path(
    post,
    path = "/api/invoices",
    tag = "Invoices",
    request_body = GenerateInvoicePayload,
    responses(
        (status = 201, description = "Fatura gerada a partir do job", body = Invoice),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Job não encontrado")
    )
)]
pub async fn generate_invoice(
    State(app_state): State<AppState>,
    Json(payload): Json<GenerateInvoicePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let Some(job_id) = payload.job_id else {
        return Err(required_field("jobId"));
    };

    let invoice = app_state
        .invoice_service
        .generate_for_job(
            job_id,
            payload.custom_description,
            payload.vat_rate.unwrap_or_else(statement_vat_rate),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(invoice)))
}
