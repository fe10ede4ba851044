// src/db/quotes_repo.rs

use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::quotes::{QuoteItemRaw, QuoteRow},
};

const QUOTE_COLUMNS: &str = r#"
    q.id, q.quote_number, q.customer_id, q.description, q.status,
    q.valid_until, q.items, q.labor_hours, q.labor_rate, q.total_amount,
    q.notes, q.converted_job_id, q.created_at,
    c.name AS customer_name
"#;

#[derive(Clone)]
pub struct QuotesRepository {
    pool: PgPool,
}

impl QuotesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<QuoteRow>, AppError> {
        let sql = format!(
            r#"
            SELECT {QUOTE_COLUMNS}
            FROM quotes q
            LEFT JOIN customers c ON c.id = q.customer_id
            ORDER BY q.created_at DESC
            "#
        );

        let rows = sqlx::query_as::<_, QuoteRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    pub async fn get(&self, quote_id: Uuid) -> Result<QuoteRow, AppError> {
        let sql = format!(
            r#"
            SELECT {QUOTE_COLUMNS}
            FROM quotes q
            LEFT JOIN customers c ON c.id = q.customer_id
            WHERE q.id = $1
            "#
        );

        sqlx::query_as::<_, QuoteRow>(&sql)
            .bind(quote_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::QuoteNotFound)
    }

    pub async fn insert(
        &self,
        customer_id: Uuid,
        description: &str,
        valid_until: Option<chrono::NaiveDate>,
        items: &[QuoteItemRaw],
        labor_hours: Decimal,
        labor_rate: Decimal,
        total_amount: Decimal,
        notes: Option<&str>,
    ) -> Result<QuoteRow, AppError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO quotes (
                customer_id, description, valid_until, items,
                labor_hours, labor_rate, total_amount, notes, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'draft')
            RETURNING id
            "#,
        )
        .bind(customer_id)
        .bind(description)
        .bind(valid_until)
        .bind(Json(items))
        .bind(labor_hours)
        .bind(labor_rate)
        .bind(total_amount)
        .bind(notes)
        .fetch_one(&self.pool)
        .await?;

        self.get(id).await
    }

    pub async fn update_status(&self, quote_id: Uuid, status_code: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE quotes SET status = $2 WHERE id = $1")
            .bind(quote_id)
            .bind(status_code)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::QuoteNotFound);
        }

        Ok(())
    }

    /// Passo final da conversão: marca o orçamento como consumido e grava o
    /// backlink para o job criado. Chamado DEPOIS do insert do job, sem
    /// transação envolvendo os dois (ver QuoteService::convert_to_job).
    pub async fn mark_converted(&self, quote_id: Uuid, job_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE quotes SET status = 'converted', converted_job_id = $2 WHERE id = $1",
        )
        .bind(quote_id)
        .bind(job_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::QuoteNotFound);
        }

        Ok(())
    }
}
