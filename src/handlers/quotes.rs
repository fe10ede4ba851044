// src/handlers/quotes.rs

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
    models::jobs::Job,
    models::money::ItemKind,
    models::quotes::{Quote, QuoteItemRaw, QuoteStatus},
    services::job_service::default_labor_rate,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteItemPayload {
    #[schema(example = "Milking Liner (Set of 4)")]
    pub description: String,

    #[schema(example = "1.0")]
    pub quantity: Decimal,

    #[schema(example = "85.00")]
    pub unit_price: Decimal,

    #[serde(rename = "type")]
    pub kind: ItemKind,

    pub product_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuotePayload {
    pub customer_id: Option<Uuid>,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Parlour upgrade estimate")]
    pub description: String,

    #[schema(value_type = Option<String>, format = Date)]
    pub valid_until: Option<NaiveDate>,

    #[serde(default)]
    pub items: Vec<QuoteItemPayload>,

    #[serde(default)]
    #[schema(example = "3.0")]
    pub labor_hours: Decimal,

    #[schema(example = "60.00")]
    pub labor_rate: Option<Decimal>,

    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuoteStatusPayload {
    pub status: QuoteStatus,
}

// GET /api/quotes
#[utoipa::path(
    get,
    path = "/api/quotes",
    tag = "Quotes",
    responses(
        (status = 200, description = "Lista de orçamentos", body = Vec<Quote>)
    )
)]
pub async fn list_quotes(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let quotes = app_state.quote_service.list_quotes().await?;
    Ok((StatusCode::OK, Json(quotes)))
}

// GET /api/quotes/{id}
#[utoipa::path(
    get,
    path = "/api/quotes/{id}",
    tag = "Quotes",
    params(("id" = Uuid, Path, description = "ID do orçamento")),
    responses(
        (status = 200, description = "Orçamento", body = Quote),
        (status = 404, description = "Orçamento não encontrado")
    )
)]
pub async fn get_quote(
    State(app_state): State<AppState>,
    Path(quote_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let quote = app_state.quote_service.get_quote(quote_id).await?;
    Ok((StatusCode::OK, Json(quote)))
}

// POST /api/quotes
#[utoipa::path(
    post,
    path = "/api/quotes",
    tag = "Quotes",
    request_body = CreateQuotePayload,
    responses(
        (status = 201, description = "Orçamento criado em draft", body = Quote),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn create_quote(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateQuotePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let Some(customer_id) = payload.customer_id else {
        return Err(required_field("customerId"));
    };

    let items: Vec<QuoteItemRaw> = payload
        .items
        .into_iter()
        .map(|i| QuoteItemRaw {
            description: Some(i.description),
            quantity: i.quantity,
            unit_price: i.unit_price,
            kind: Some(i.kind),
            product_id: i.product_id,
        })
        .collect();

    let quote = app_state
        .quote_service
        .create_quote(
            customer_id,
            payload.description,
            payload.valid_until,
            items,
            payload.labor_hours,
            payload.labor_rate.unwrap_or_else(default_labor_rate),
            payload.notes,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(quote)))
}

// PATCH /api/quotes/{id}/status
#[utoipa::path(
    patch,
    path = "/api/quotes/{id}/status",
    tag = "Quotes",
    params(("id" = Uuid, Path, description = "ID do orçamento")),
    request_body = UpdateQuoteStatusPayload,
    responses(
        (status = 200, description = "Status atualizado", body = Quote),
        (status = 409, description = "Transição inválida ou orçamento finalizado")
    )
)]
pub async fn update_quote_status(
    State(app_state): State<AppState>,
    Path(quote_id): Path<Uuid>,
    Json(payload): Json<UpdateQuoteStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let quote = app_state
        .quote_service
        .update_status(quote_id, payload.status)
        .await?;

    Ok((StatusCode::OK, Json(quote)))
}

// POST /api/quotes/{id}/convert
#[utoipa::path(
    post,
    path = "/api/quotes/{id}/convert",
    tag = "Quotes",
    params(("id" = Uuid, Path, description = "ID do orçamento")),
    responses(
        (status = 201, description = "Job criado a partir do orçamento", body = Job),
        (status = 409, description = "Orçamento já finalizado")
    )
)]
pub async fn convert_quote(
    State(app_state): State<AppState>,
    Path(quote_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let job = app_state.quote_service.convert_to_job(quote_id).await?;
    Ok((StatusCode::CREATED, Json(job)))
}
