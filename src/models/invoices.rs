// src/models/invoices.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, FromRow)]
pub struct InvoiceRow {
    pub id: Uuid,
    pub invoice_number: String,
    pub total_amount: Decimal,
    pub status: Option<String>,
    pub issue_date: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub custom_description: Option<String>,
    pub statement_url: Option<String>,
    pub invoice_url: Option<String>,
    pub customer_name: Option<String>,
}

// A fatura só guarda totais derivados e o snapshot da configuração de
// renderização; ela não possui line items e é imutável depois de criada.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,

    #[schema(example = "INV-2024-20240001")]
    pub invoice_number: String,

    #[schema(example = "Murphy Farm Ltd")]
    pub customer_name: String,

    pub date: Option<DateTime<Utc>>,

    #[schema(example = "306.45")]
    pub amount: Decimal,

    #[schema(example = "Issued")]
    pub status: String,

    pub statement_url: Option<String>,
    pub invoice_url: Option<String>,
}

// Registro pronto para INSERT em `invoices`.
#[derive(Debug, Clone)]
pub struct NewInvoiceRecord {
    pub customer_id: Option<Uuid>,
    pub invoice_number: String,
    pub total_amount: Decimal,
    pub status: &'static str,
    pub issue_date: DateTime<Utc>,
    pub vat_rate: Decimal,
    pub custom_description: String,
    pub statement_url: Option<String>,
    pub invoice_url: Option<String>,
}

// 'issued' -> 'Issued', 'paid' -> 'Paid'. Só casing de exibição.
pub fn display_case(code: &str) -> String {
    let mut chars = code.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

impl Invoice {
    pub fn from_row(row: InvoiceRow) -> Self {
        Self {
            id: row.id,
            invoice_number: row.invoice_number,
            customer_name: row.customer_name.unwrap_or_else(|| "Unknown".to_string()),
            date: row.issue_date.or(row.created_at),
            amount: row.total_amount,
            status: display_case(row.status.as_deref().unwrap_or("issued")),
            statement_url: row.statement_url,
            invoice_url: row.invoice_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_case_capitaliza_primeira_letra() {
        assert_eq!(display_case("issued"), "Issued");
        assert_eq!(display_case("paid"), "Paid");
        assert_eq!(display_case(""), "");
    }
}
