// src/db/jobs_repo.rs

use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::jobs::{JobAssignment, JobRow, NewJobRecord},
};

const JOB_COLUMNS: &str = r#"
    j.id, j.job_number, j.customer_id, j.description, j.status,
    j.scheduled_date, j.engineer_id, j.parts_used, j.labor_hours,
    j.labor_rate, j.created_at,
    c.name AS customer_name,
    p.full_name AS engineer_name
"#;

#[derive(Clone)]
pub struct JobsRepository {
    pool: PgPool,
}

impl JobsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<JobRow>, AppError> {
        let sql = format!(
            r#"
            SELECT {JOB_COLUMNS}
            FROM jobs j
            LEFT JOIN customers c ON c.id = j.customer_id
            LEFT JOIN profiles p ON p.id = j.engineer_id
            ORDER BY j.created_at DESC
            "#
        );

        let rows = sqlx::query_as::<_, JobRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    pub async fn get(&self, job_id: Uuid) -> Result<JobRow, AppError> {
        let sql = format!(
            r#"
            SELECT {JOB_COLUMNS}
            FROM jobs j
            LEFT JOIN customers c ON c.id = j.customer_id
            LEFT JOIN profiles p ON p.id = j.engineer_id
            WHERE j.id = $1
            "#
        );

        sqlx::query_as::<_, JobRow>(&sql)
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::JobNotFound)
    }

    pub async fn insert(&self, record: &NewJobRecord) -> Result<JobRow, AppError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO jobs (
                job_number, customer_id, description, status,
                scheduled_date, parts_used, labor_hours, labor_rate
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(record.job_number)
        .bind(record.customer_id)
        .bind(&record.description)
        .bind(record.status_code)
        .bind(record.scheduled_date)
        .bind(Json(&record.parts_used))
        .bind(record.labor_hours)
        .bind(record.labor_rate)
        .fetch_one(&self.pool)
        .await?;

        // Releitura com os joins para devolver a linha completa.
        self.get(id).await
    }

    /// Próximo número de job dentro do bloco do ano ({ano}0001, {ano}0002, ...)
    pub async fn next_job_number(&self, year: i32) -> Result<i32, AppError> {
        let current: Option<i32> = sqlx::query_scalar(
            "SELECT MAX(job_number) FROM jobs WHERE job_number / 10000 = $1",
        )
        .bind(year)
        .fetch_one(&self.pool)
        .await?;

        Ok(current.map(|n| n + 1).unwrap_or(year * 10_000 + 1))
    }

    pub async fn update_status(&self, job_id: Uuid, status_code: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE jobs SET status = $2 WHERE id = $1")
            .bind(job_id)
            .bind(status_code)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::JobNotFound);
        }

        Ok(())
    }

    pub async fn update_engineer(
        &self,
        job_id: Uuid,
        engineer_id: Option<Uuid>,
    ) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE jobs SET engineer_id = $2 WHERE id = $1")
            .bind(job_id)
            .bind(engineer_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::JobNotFound);
        }

        Ok(())
    }

    pub async fn list_assignments(&self) -> Result<Vec<JobAssignment>, AppError> {
        let rows = sqlx::query_as::<_, JobAssignment>(
            r#"
            SELECT j.id, p.full_name AS engineer_name
            FROM jobs j
            LEFT JOIN profiles p ON p.id = j.engineer_id
            ORDER BY j.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
