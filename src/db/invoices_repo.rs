// src/db/invoices_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::invoices::{InvoiceRow, NewInvoiceRecord},
};

#[derive(Clone)]
pub struct InvoicesRepository {
    pool: PgPool,
}

impl InvoicesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<InvoiceRow>, AppError> {
        let rows = sqlx::query_as::<_, InvoiceRow>(
            r#"
            SELECT
                i.id, i.invoice_number, i.total_amount, i.status,
                i.issue_date, i.created_at, i.custom_description, i.statement_url, i.invoice_url,
                c.name AS customer_name
            FROM invoices i
            LEFT JOIN customers c ON c.id = i.customer_id
            ORDER BY i.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn insert(&self, record: &NewInvoiceRecord) -> Result<InvoiceRow, AppError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO invoices (
                customer_id, invoice_number, total_amount, status,
                issue_date, vat_rate, custom_description,
                statement_url, invoice_url
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(record.customer_id)
        .bind(&record.invoice_number)
        .bind(record.total_amount)
        .bind(record.status)
        .bind(record.issue_date)
        .bind(record.vat_rate)
        .bind(&record.custom_description)
        .bind(record.statement_url.as_deref())
        .bind(record.invoice_url.as_deref())
        .fetch_one(&self.pool)
        .await?;

        let row = sqlx::query_as::<_, InvoiceRow>(
            r#"
            SELECT
                i.id, i.invoice_number, i.total_amount, i.status,
                i.issue_date, i.created_at, i.custom_description, i.statement_url, i.invoice_url,
                c.name AS customer_name
            FROM invoices i
            LEFT JOIN customers c ON c.id = i.customer_id
            WHERE i.id = $1
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }
}
