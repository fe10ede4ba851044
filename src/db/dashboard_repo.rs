// src/db/dashboard_repo.rs

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::dashboard::MonthRevenueRow,
    models::invoices::InvoiceRow,
};

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

// Números agregados crus do resumo; a montagem do view model fica no service.
#[derive(Debug)]
pub struct SummaryCounts {
    pub total_revenue: Decimal,
    pub active_jobs: i64,
    pub inventory_items: i64,
    pub active_customers: i64,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // 1. Resumo Geral
    pub async fn summary_counts(&self) -> Result<SummaryCounts, AppError> {
        // Transação somente-leitura: snapshot consistente dos contadores.
        let mut tx = self.pool.begin().await?;

        let active_jobs: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM jobs WHERE status IN ('scheduled', 'in_progress')",
        )
        .fetch_one(&mut *tx)
        .await?;

        let active_customers: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&mut *tx)
            .await?;

        let inventory_items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&mut *tx)
            .await?;

        // Receita = soma das faturas pagas.
        let total_revenue: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total_amount), 0) FROM invoices WHERE status = 'paid'",
        )
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(SummaryCounts {
            total_revenue,
            active_jobs,
            inventory_items,
            active_customers,
        })
    }

    // 2. Atividade recente (últimas 3 faturas)
    pub async fn recent_invoices(&self, limit: i64) -> Result<Vec<InvoiceRow>, AppError> {
        let rows = sqlx::query_as::<_, InvoiceRow>(
            r#"
            SELECT
                i.id, i.invoice_number, i.total_amount, i.status,
                i.issue_date, i.created_at, i.custom_description, i.statement_url, i.invoice_url,
                c.name AS customer_name
            FROM invoices i
            LEFT JOIN customers c ON c.id = i.customer_id
            ORDER BY i.created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn completed_jobs(&self) -> Result<i64, AppError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM jobs WHERE status = 'completed'")
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    // 3. Receita por mês do ano corrente (faturas pagas).
    pub async fn monthly_revenue(&self) -> Result<Vec<MonthRevenueRow>, AppError> {
        let rows = sqlx::query_as::<_, MonthRevenueRow>(
            r#"
            SELECT
                EXTRACT(MONTH FROM issue_date)::int AS month,
                SUM(total_amount) AS total
            FROM invoices
            WHERE status = 'paid'
              AND EXTRACT(YEAR FROM issue_date) = EXTRACT(YEAR FROM NOW())
            GROUP BY 1
            ORDER BY 1
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
