// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// 1. Resumo Geral (os cards do topo)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_revenue: Decimal,   // Soma das faturas pagas
    pub active_jobs: i64,         // scheduled + in_progress
    pub inventory_items: i64,     // Total de produtos cadastrados
    pub active_customers: i64,
    pub recent_sales: Vec<RecentSale>,
}

// 2. Atividade recente (últimas faturas)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentSale {
    pub id: Uuid,
    pub customer: String,
    pub description: String,
    pub amount: Decimal,
    pub initials: String,
}

// 3. Relatórios (receita por mês do ano corrente)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRevenue {
    #[schema(example = "Feb")]
    pub name: String,
    pub total: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportsSummary {
    pub total_revenue: Decimal,
    pub completed_jobs: i64,
    pub monthly_revenue: Vec<MonthlyRevenue>,
}

// Linha crua da agregação mensal (o SQL devolve o mês como inteiro 1..12).
#[derive(Debug, FromRow)]
pub struct MonthRevenueRow {
    pub month: Option<i32>,
    pub total: Option<Decimal>,
}
