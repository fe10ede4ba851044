// src/handlers/dashboard.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    models::dashboard::{DashboardSummary, ReportsSummary},
};

// GET /api/dashboard/summary
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Indicadores do painel", body = DashboardSummary)
    )
)]
pub async fn get_summary(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let summary = app_state.dashboard_service.summary().await?;
    Ok((StatusCode::OK, Json(summary)))
}

// GET /api/reports/summary
#[utoipa::path(
    get,
    path = "/api/reports/summary",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Receita por mês e jobs concluídos", body = ReportsSummary)
    )
)]
pub async fn get_reports(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let reports = app_state.dashboard_service.reports().await?;
    Ok((StatusCode::OK, Json(reports)))
}
