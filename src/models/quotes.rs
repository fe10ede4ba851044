// src/models/quotes.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::money::{ItemKind, LineItem};

// --- Enums ---

// Os códigos do banco já são os próprios tokens minúsculos; a exibição é
// só a capitalização da primeira letra. Máquina de estados forward-only:
//
//   draft -> sent -> {accepted, rejected}
//   {draft, sent, accepted} -> converted
//
// `converted` e `rejected` são terminais.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    Draft,
    Sent,
    Accepted,
    Rejected,
    Converted,
}

impl QuoteStatus {
    pub fn from_code(code: &str) -> Self {
        match code {
            "sent" => QuoteStatus::Sent,
            "accepted" => QuoteStatus::Accepted,
            "rejected" => QuoteStatus::Rejected,
            "converted" => QuoteStatus::Converted,
            _ => QuoteStatus::Draft,
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            QuoteStatus::Draft => "draft",
            QuoteStatus::Sent => "sent",
            QuoteStatus::Accepted => "accepted",
            QuoteStatus::Rejected => "rejected",
            QuoteStatus::Converted => "converted",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuoteStatus::Draft => "Draft",
            QuoteStatus::Sent => "Sent",
            QuoteStatus::Accepted => "Accepted",
            QuoteStatus::Rejected => "Rejected",
            QuoteStatus::Converted => "Converted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, QuoteStatus::Converted | QuoteStatus::Rejected)
    }

    // A conversão é permitida a partir de qualquer estado não terminal.
    pub fn can_convert(&self) -> bool {
        !self.is_terminal()
    }

    // Valida uma transição pedida pela API. Estado terminal rejeita tudo
    // com erro de política; os demais casos seguem as arestas acima.
    pub fn validate_transition(&self, to: QuoteStatus) -> Result<(), AppError> {
        if self.is_terminal() {
            return Err(AppError::QuoteFinalized(self.label().to_string()));
        }

        let allowed = matches!(
            (self, to),
            (QuoteStatus::Draft, QuoteStatus::Sent)
                | (QuoteStatus::Sent, QuoteStatus::Accepted)
                | (QuoteStatus::Sent, QuoteStatus::Rejected)
                | (QuoteStatus::Draft, QuoteStatus::Converted)
                | (QuoteStatus::Sent, QuoteStatus::Converted)
                | (QuoteStatus::Accepted, QuoteStatus::Converted)
        );

        if allowed {
            Ok(())
        } else {
            Err(AppError::InvalidQuoteTransition {
                from: self.label().to_string(),
                to: to.label().to_string(),
            })
        }
    }
}

impl std::fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// --- Linhas cruas do banco ---

// Entrada do array JSONB `items` de um orçamento. Tolerante a campos
// ausentes, como o parts_used do Job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteItemRaw {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub quantity: Decimal,
    #[serde(default)]
    pub unit_price: Decimal,
    #[serde(default, rename = "type")]
    pub kind: Option<ItemKind>,
    #[serde(default)]
    pub product_id: Option<Uuid>,
}

#[derive(Debug, FromRow)]
pub struct QuoteRow {
    pub id: Uuid,
    pub quote_number: i32,
    pub customer_id: Option<Uuid>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub valid_until: Option<NaiveDate>,
    pub items: Option<Json<Vec<QuoteItemRaw>>>,
    pub labor_hours: Option<Decimal>,
    pub labor_rate: Option<Decimal>,
    pub total_amount: Option<Decimal>,
    pub notes: Option<String>,
    pub converted_job_id: Option<Uuid>,
    pub created_at: Option<DateTime<Utc>>,
    pub customer_name: Option<String>,
}

// --- View model ---

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: Uuid,

    #[schema(example = "Q-0042")]
    pub quote_number: String,

    pub customer_id: Option<Uuid>,

    #[schema(example = "Kelly Cattle Co")]
    pub customer_name: String,

    pub description: String,

    pub status: QuoteStatus,

    #[schema(value_type = Option<String>, format = Date)]
    pub valid_until: Option<NaiveDate>,

    pub items: Vec<LineItem>,

    #[schema(example = "3.0")]
    pub labor_hours: Decimal,

    #[schema(example = "60.00")]
    pub labor_rate: Decimal,

    #[schema(example = "306.45")]
    pub total_amount: Decimal,

    pub notes: String,

    pub converted_job_id: Option<Uuid>,

    pub created_at: Option<DateTime<Utc>>,
}
