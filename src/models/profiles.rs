// src/models/profiles.rs

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<String>,
}

// Perfil exibível de engenheiro/admin. O id é String na borda da API
// porque o modo demo usa ids sintéticos ('mock-1', 'mock-2') que nunca
// chegam ao banco.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Engineer {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: String,

    pub email: String,

    #[schema(example = "John Condon")]
    pub full_name: String,

    #[schema(example = "engineer")]
    pub role: String,

    #[schema(example = "JO")]
    pub initials: String,
}

impl Engineer {
    pub fn from_row(row: ProfileRow) -> Self {
        let email = row.email.unwrap_or_default();

        // Nome ausente cai para a parte local do e-mail.
        let full_name = row
            .full_name
            .filter(|n| !n.is_empty())
            .or_else(|| email.split('@').next().map(str::to_string))
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Unknown".to_string());

        Self {
            id: row.id.to_string(),
            initials: {
                let base = if full_name == "Unknown" && !email.is_empty() {
                    &email
                } else {
                    &full_name
                };
                let two: String = base.chars().take(2).collect();
                two.to_uppercase()
            },
            email,
            role: row.role.unwrap_or_else(|| "engineer".to_string()),
            full_name,
        }
    }
}
