// src/models/jobs.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::money::LineItem;

// --- Enums ---

// Vocabulário externo do status de Job. O banco guarda o token interno
// ('scheduled', 'in_progress', ...); o mapeamento entre os dois vive aqui
// e é total: código desconhecido resolve para Scheduled (fail-open, escolha
// documentada), nunca levanta erro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum JobStatus {
    Scheduled,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Cancelled,
}

impl JobStatus {
    pub fn from_code(code: &str) -> Self {
        match code {
            "in_progress" => JobStatus::InProgress,
            "completed" => JobStatus::Completed,
            "cancelled" => JobStatus::Cancelled,
            _ => JobStatus::Scheduled,
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            JobStatus::Scheduled => "scheduled",
            JobStatus::InProgress => "in_progress",
            JobStatus::Completed => "completed",
            JobStatus::Cancelled => "cancelled",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            JobStatus::Scheduled => "Scheduled",
            JobStatus::InProgress => "In Progress",
            JobStatus::Completed => "Completed",
            JobStatus::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// --- Linhas cruas do banco ---

// Uma entrada do array JSONB `parts_used`. Todos os campos têm default
// para tolerar entradas antigas/parciais; os defaults de exibição são
// aplicados no formatter, não aqui.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartUsed {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub quantity: Decimal,
    #[serde(default)]
    pub price_at_time: Decimal,
    #[serde(default)]
    pub product_id: Option<Uuid>,
}

// Linha de `jobs` com os nomes já juntados (customer + engineer).
#[derive(Debug, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub job_number: i32,
    pub customer_id: Option<Uuid>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub scheduled_date: Option<NaiveDate>,
    pub engineer_id: Option<Uuid>,
    pub parts_used: Option<Json<Vec<PartUsed>>>,
    pub labor_hours: Option<Decimal>,
    pub labor_rate: Option<Decimal>,
    pub created_at: Option<DateTime<Utc>>,
    pub customer_name: Option<String>,
    pub engineer_name: Option<String>,
}

// --- View model ---

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,

    #[schema(example = "20240001")]
    pub job_number: String,

    pub customer_id: Option<Uuid>,

    #[schema(example = "Murphy Farm Ltd")]
    pub customer_name: String,

    #[schema(example = "Annual Milking Machine Service")]
    pub description: String,

    pub status: JobStatus,

    #[schema(value_type = String, format = Date, example = "2024-02-15")]
    pub date: NaiveDate,

    #[schema(example = "Unassigned")]
    pub engineer_name: String,

    #[schema(example = "306.45")]
    pub total_amount: Decimal,

    pub items: Vec<LineItem>,
}

// Projeção mínima usada pelo quadro de alocação: job + nome exibível do
// engenheiro (None = sem atribuição).
#[derive(Debug, Clone, FromRow)]
pub struct JobAssignment {
    pub id: Uuid,
    pub engineer_name: Option<String>,
}

// Registro pronto para INSERT em `jobs` (a criação direta e a conversão
// de orçamento passam os dois por aqui).
#[derive(Debug, Clone)]
pub struct NewJobRecord {
    pub job_number: i32,
    pub customer_id: Uuid,
    pub description: String,
    pub status_code: &'static str,
    pub scheduled_date: NaiveDate,
    pub parts_used: Vec<PartUsed>,
    pub labor_hours: Decimal,
    pub labor_rate: Decimal,
}
