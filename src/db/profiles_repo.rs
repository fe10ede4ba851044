// src/db/profiles_repo.rs

use sqlx::PgPool;

use crate::{common::error::AppError, models::profiles::ProfileRow};

#[derive(Clone)]
pub struct ProfilesRepository {
    pool: PgPool,
}

impl ProfilesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Perfis que podem receber jobs no quadro de alocação.
    pub async fn list_engineers(&self) -> Result<Vec<ProfileRow>, AppError> {
        let rows = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, email, full_name, role
            FROM profiles
            WHERE role IN ('engineer', 'admin')
            ORDER BY full_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
