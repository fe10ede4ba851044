// src/db/customers_repo.rs

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{common::error::AppError, models::crm::CustomerRow};

const CUSTOMER_COLUMNS: &str = "id, name, email, phone, address, town, balance";

#[derive(Clone)]
pub struct CustomersRepository {
    pool: PgPool,
}

impl CustomersRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<CustomerRow>, AppError> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY name");

        let rows = sqlx::query_as::<_, CustomerRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    pub async fn insert(
        &self,
        name: &str,
        email: Option<&str>,
        phone: Option<&str>,
        address: Option<&str>,
        town: Option<&str>,
        balance: Decimal,
    ) -> Result<CustomerRow, AppError> {
        let sql = format!(
            r#"
            INSERT INTO customers (name, email, phone, address, town, balance)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {CUSTOMER_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, CustomerRow>(&sql)
            .bind(name)
            .bind(email)
            .bind(phone)
            .bind(address)
            .bind(town)
            .bind(balance)
            .fetch_one(&self.pool)
            .await?;

        Ok(row)
    }
}
