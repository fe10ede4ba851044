// src/handlers/crm.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::crm::Customer,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Murphy Farm Ltd")]
    pub name: String,

    #[validate(email(message = "invalid_email"))]
    #[schema(example = "john@murphyfarm.ie")]
    pub email: Option<String>,

    #[schema(example = "+353 87 123 4567")]
    pub phone: Option<String>,

    pub address: Option<String>,

    #[schema(example = "Ballyporeen")]
    pub town: Option<String>,

    #[schema(example = "0.00")]
    pub balance: Option<Decimal>,
}

// GET /api/customers
#[utoipa::path(
    get,
    path = "/api/customers",
    tag = "CRM",
    responses(
        (status = 200, description = "Lista de clientes", body = Vec<Customer>)
    )
)]
pub async fn list_customers(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let rows = app_state.customers.list().await?;
    let customers: Vec<Customer> = rows.into_iter().map(Customer::from_row).collect();
    Ok((StatusCode::OK, Json(customers)))
}

// POST /api/customers
#[utoipa::path(
    post,
    path = "/api/customers",
    tag = "CRM",
    request_body = CreateCustomerPayload,
    responses(
        (status = 201, description = "Cliente criado", body = Customer),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn create_customer(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateCustomerPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let row = app_state
        .customers
        .insert(
            &payload.name,
            payload.email.as_deref(),
            payload.phone.as_deref(),
            payload.address.as_deref(),
            payload.town.as_deref(),
            payload.balance.unwrap_or_default(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(Customer::from_row(row))))
}
