use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Nenhuma operação faz retry automático: toda falha sobe até o handler
// que iniciou o fluxo.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Job não encontrado")]
    JobNotFound,

    #[error("Orçamento não encontrado")]
    QuoteNotFound,

    #[error("Cliente não encontrado")]
    CustomerNotFound,

    #[error("Produto não encontrado")]
    ProductNotFound,

    // Tentativa de agir sobre um orçamento em estado terminal
    // (converted ou rejected). É erro de política, não silêncio.
    #[error("Orçamento já finalizado ({0})")]
    QuoteFinalized(String),

    #[error("Transição de status inválida: {from} -> {to}")]
    InvalidQuoteTransition { from: String, to: String },

    // Só uma atribuição em voo por job.
    #[error("Já existe uma atribuição em andamento para este job")]
    AssignmentInFlight,

    #[error("Referência de engenheiro inválida: {0}")]
    InvalidEngineerRef(String),

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    #[error("Falha no upload para o storage: {0}")]
    StorageError(String),

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado.
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

// Erro de validação para um campo obrigatório ausente, no mesmo formato
// dos erros do derive do `validator`.
pub fn required_field(field: &'static str) -> AppError {
    let mut errors = validator::ValidationErrors::new();
    let mut error = validator::ValidationError::new("required");
    error.message = Some("required".into());
    errors.add(field.into(), error);
    AppError::ValidationError(errors)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            // Retorna todos os detalhes da validação.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors.iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::JobNotFound
            | AppError::QuoteNotFound
            | AppError::CustomerNotFound
            | AppError::ProductNotFound => (StatusCode::NOT_FOUND, self.to_string()),

            AppError::QuoteFinalized(_)
            | AppError::InvalidQuoteTransition { .. }
            | AppError::AssignmentInFlight => (StatusCode::CONFLICT, self.to_string()),

            AppError::InvalidEngineerRef(_) => (StatusCode::BAD_REQUEST, self.to_string()),

            // Todos os outros erros (DatabaseError, InternalServerError, ...)
            // viram 500. O `tracing` loga a mensagem detalhada.
            e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
