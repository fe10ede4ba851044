// src/handlers/documents.rs

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    models::money,
    services::document_service::{statement_vat_rate, DocumentKind, OutputMode},
};

#[derive(Debug, Deserialize)]
pub struct DocumentQuery {
    #[serde(default)]
    pub mode: OutputMode,
    // Configuração da fatura do contador; ignorada pelos outros documentos.
    pub description: Option<String>,
    pub vat_rate: Option<Decimal>,
    pub total: Option<Decimal>,
}

// GET /api/jobs/{id}/documents/{kind}?mode=raw|inline|download
//
// Os três modos devolvem os mesmos bytes; só o encapsulamento muda.
pub async fn job_document(
    State(app_state): State<AppState>,
    Path((job_id, kind)): Path<(Uuid, DocumentKind)>,
    Query(query): Query<DocumentQuery>,
) -> Result<Response, AppError> {
    let job = app_state.job_service.get_job(job_id).await?;

    let pdf_bytes = match kind {
        DocumentKind::Statement => app_state
            .document_service
            .render_statement(&job, &job.items)?,

        DocumentKind::Invoice => {
            let vat_rate = query.vat_rate.unwrap_or_else(statement_vat_rate);
            let description = query
                .description
                .clone()
                .unwrap_or_else(|| "Milking Machine Service & Maintenance".to_string());
            // Sem total explícito, deriva dos itens na taxa escolhida
            // (é o que a tela de geração faz antes de deixar editar).
            let total = query
                .total
                .unwrap_or_else(|| money::breakdown_from_items(&job.items, vat_rate).total);

            app_state
                .document_service
                .render_accountant_invoice(&job, &description, vat_rate, total)?
        }

        DocumentKind::Report => app_state
            .document_service
            .render_service_report(&job, &job.items)?,
    };

    let filename = kind.filename(&job);

    // Configura os headers para o navegador mostrar ou baixar o PDF.
    let response = match query.mode {
        OutputMode::Raw => (
            [(header::CONTENT_TYPE, "application/pdf".to_string())],
            pdf_bytes,
        )
            .into_response(),
        OutputMode::Inline => (
            [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("inline; filename=\"{}\"", filename),
                ),
            ],
            pdf_bytes,
        )
            .into_response(),
        OutputMode::Download => (
            [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", filename),
                ),
            ],
            pdf_bytes,
        )
            .into_response(),
    };

    Ok(response)
}
