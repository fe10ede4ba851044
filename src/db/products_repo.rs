// src/db/products_repo.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::inventory::ProductRow};

const PRODUCT_COLUMNS: &str = "id, name, sku, sell_price, stock_level, category";

#[derive(Clone)]
pub struct ProductsRepository {
    pool: PgPool,
}

impl ProductsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<ProductRow>, AppError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name");

        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    pub async fn insert(
        &self,
        name: &str,
        sku: &str,
        sell_price: Decimal,
        cost_price: Decimal,
        stock_level: Decimal,
        category: Option<&str>,
    ) -> Result<ProductRow, AppError> {
        let sql = format!(
            r#"
            INSERT INTO products (name, sku, sell_price, cost_price, stock_level, category)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {PRODUCT_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(name)
            .bind(sku)
            .bind(sell_price)
            .bind(cost_price)
            .bind(stock_level)
            .bind(category)
            .fetch_one(&self.pool)
            .await?;

        Ok(row)
    }

    // Ajuste relativo de estoque (entrada positiva, saída negativa).
    pub async fn adjust_stock(&self, product_id: Uuid, delta: Decimal) -> Result<ProductRow, AppError> {
        let sql = format!(
            r#"
            UPDATE products
            SET stock_level = stock_level + $2
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, ProductRow>(&sql)
            .bind(product_id)
            .bind(delta)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::ProductNotFound)
    }
}
