// src/models/inventory.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, FromRow)]
pub struct ProductRow {
    pub id: Uuid,
    pub name: String,
    pub sku: String,
    pub sell_price: Option<Decimal>,
    pub stock_level: Option<Decimal>,
    pub category: Option<String>,
}

// `stock_level` é mutado pelos endpoints de inventário; o núcleo de
// jobs/orçamentos/faturas nunca toca nele.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,

    #[schema(example = "Vacuum Pump Oil (5L)")]
    pub name: String,

    #[schema(example = "OIL-VAC-5L")]
    pub sku: String,

    #[schema(example = "45.00")]
    pub price: Decimal,

    #[schema(example = "24")]
    pub stock: Decimal,

    #[schema(example = "General")]
    pub category: String,
}

impl Product {
    pub fn from_row(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            sku: row.sku,
            price: row.sell_price.unwrap_or_default(),
            stock: row.stock_level.unwrap_or_default(),
            category: row.category.unwrap_or_else(|| "General".to_string()),
        }
    }
}
