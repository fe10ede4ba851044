// src/handlers/inventory.rs

use axum::{
    extract::{Path, State},
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
    common::error::AppError,
    config::AppState,
    models::inventory::Product,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Vacuum Pump Oil (5L)")]
    pub name: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "OIL-VAC-5L")]
    pub sku: String,

    #[serde(default)]
    #[schema(example = "45.00")]
    pub sell_price: Decimal,

    #[serde(default)]
    #[schema(example = "28.00")]
    pub cost_price: Decimal,

    #[serde(default)]
    #[schema(example = "24")]
    pub stock_level: Decimal,

    #[schema(example = "Consumables")]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdjustStockPayload {
    // Positivo entra, negativo sai.
    #[schema(example = "-2")]
    pub delta: Decimal,
}

// GET /api/products
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Inventory",
    responses(
        (status = 200, description = "Lista de produtos", body = Vec<Product>)
    )
)]
pub async fn list_products(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let rows = app_state.products.list().await?;
    let products: Vec<Product> = rows.into_iter().map(Product::from_row).collect();
    Ok((StatusCode::OK, Json(products)))
}

// POST /api/products
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Inventory",
    request_body = CreateProductPayload,
    responses(
        (status = 201, description = "Produto criado", body = Product),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let row = app_state
        .products
        .insert(
            &payload.name,
            &payload.sku,
            payload.sell_price,
            payload.cost_price,
            payload.stock_level,
            payload.category.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(Product::from_row(row))))
}

// POST /api/products/{id}/stock
#[utoipa::path(
    post,
    path = "/api/products/{id}/stock",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "ID do produto")),
    request_body = AdjustStockPayload,
    responses(
        (status = 200, description = "Estoque ajustado", body = Product),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn adjust_stock(
    State(app_state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(payload): Json<AdjustStockPayload>,
) -> Result<impl IntoResponse, AppError> {
    let row = app_state.products.adjust_stock(product_id, payload.delta).await?;
    Ok((StatusCode::OK, Json(Product::from_row(row))))
}
