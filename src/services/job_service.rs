// src/services/job_service.rs

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::JobsRepository,
    models::jobs::{Job, JobRow, JobStatus, NewJobRecord, PartUsed},
    models::money::{self, ItemKind, LineItem},
};

// Valor/hora aplicado quando a linha não tem labor_rate.
pub fn default_labor_rate() -> Decimal {
    Decimal::from(60)
}

// Um item como chega do formulário de criação (ainda sem separar
// peças de mão de obra).
#[derive(Debug, Clone)]
pub struct JobDraftItem {
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub kind: ItemKind,
    pub product_id: Option<Uuid>,
}

#[derive(Clone)]
pub struct JobService {
    repo: JobsRepository,
}

impl JobService {
    pub fn new(repo: JobsRepository) -> Self {
        Self { repo }
    }

    // Lista para as telas de grade: totais derivados, itens omitidos.
    pub async fn list_jobs(&self) -> Result<Vec<Job>, AppError> {
        let rows = self.repo.list().await?;
        Ok(rows.into_iter().map(|r| format_job(r, false)).collect())
    }

    pub async fn get_job(&self, job_id: Uuid) -> Result<Job, AppError> {
        let row = self.repo.get(job_id).await?;
        Ok(format_job(row, true))
    }

    pub async fn create_job(
        &self,
        customer_id: Uuid,
        description: String,
        status: JobStatus,
        scheduled_date: NaiveDate,
        items: Vec<JobDraftItem>,
        labor_rate: Option<Decimal>,
    ) -> Result<Job, AppError> {
        let (parts_used, labor_hours) = split_draft_items(items);

        let job_number = self.repo.next_job_number(Utc::now().year()).await?;

        let record = NewJobRecord {
            job_number,
            customer_id,
            description,
            status_code: status.as_code(),
            scheduled_date,
            parts_used,
            labor_hours,
            labor_rate: labor_rate.unwrap_or_else(default_labor_rate),
        };

        let row = self.repo.insert(&record).await?;
        Ok(format_job(row, true))
    }

    pub async fn update_status(&self, job_id: Uuid, status: JobStatus) -> Result<Job, AppError> {
        self.repo.update_status(job_id, status.as_code()).await?;
        self.get_job(job_id).await
    }
}

// =========================================================================
//  FORMATTER: linha crua -> view model canônico
// =========================================================================

// Monta os line items de um job: cada entrada de parts_used vira um item
// `part` (na ordem do array), e labor_hours > 0 sintetiza exatamente um
// item `labor` no final. Essa ordem é contrato do gerador de documentos.
pub fn line_items_of(
    parts: &[PartUsed],
    labor_hours: Decimal,
    labor_rate: Option<Decimal>,
) -> Vec<LineItem> {
    let mut items: Vec<LineItem> = parts
        .iter()
        .enumerate()
        .map(|(i, p)| {
            LineItem::new(
                format!("part-{i}"),
                p.description.clone().unwrap_or_else(|| "Part".to_string()),
                p.quantity,
                p.price_at_time,
                ItemKind::Part,
                p.product_id,
            )
        })
        .collect();

    if labor_hours > Decimal::ZERO {
        items.push(LineItem::new(
            "labor-item",
            "Labor Hours",
            labor_hours,
            labor_rate.unwrap_or_else(default_labor_rate),
            ItemKind::Labor,
            None,
        ));
    }

    items
}

// Campos opcionais ausentes resolvem para defaults documentados, nunca
// para null no view model. "Unassigned" é sentinela de exibição E chave
// de agrupamento da alocação; um engenheiro real com esse nome colidiria
// com ela (ambiguidade herdada do sistema, documentada em DESIGN.md).
pub fn format_job(row: JobRow, with_items: bool) -> Job {
    let parts = row.parts_used.map(|json| json.0).unwrap_or_default();
    let labor_hours = row.labor_hours.unwrap_or_default();
    let items = line_items_of(&parts, labor_hours, row.labor_rate);
    let total_amount = money::subtotal(&items);

    Job {
        id: row.id,
        job_number: row.job_number.to_string(),
        customer_id: row.customer_id,
        customer_name: row.customer_name.unwrap_or_else(|| "Unknown".to_string()),
        description: row.description.unwrap_or_default(),
        status: JobStatus::from_code(row.status.as_deref().unwrap_or("")),
        date: row
            .scheduled_date
            .or_else(|| row.created_at.map(|c| c.date_naive()))
            .unwrap_or_else(|| Utc::now().date_naive()),
        engineer_name: row
            .engineer_name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Unassigned".to_string()),
        total_amount,
        items: if with_items { items } else { Vec::new() },
    }
}

// Separa o rascunho do formulário no formato persistido: peças vão para o
// JSONB, horas de mão de obra viram o escalar labor_hours.
pub fn split_draft_items(items: Vec<JobDraftItem>) -> (Vec<PartUsed>, Decimal) {
    let mut parts = Vec::new();
    let mut labor_hours = Decimal::ZERO;

    for item in items {
        match item.kind {
            ItemKind::Part => parts.push(PartUsed {
                description: Some(item.description),
                quantity: item.quantity,
                price_at_time: item.unit_price,
                product_id: item.product_id,
            }),
            ItemKind::Labor => labor_hours += item.quantity,
        }
    }

    (parts, labor_hours)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row_base() -> JobRow {
        JobRow {
            id: Uuid::new_v4(),
            job_number: 20240001,
            customer_id: None,
            description: None,
            status: None,
            scheduled_date: None,
            engineer_id: None,
            parts_used: None,
            labor_hours: None,
            labor_rate: None,
            created_at: None,
            customer_name: None,
            engineer_name: None,
        }
    }

    #[test]
    fn pecas_primeiro_depois_um_unico_item_de_mao_de_obra() {
        let parts = vec![
            PartUsed {
                description: Some("Liner".into()),
                quantity: dec!(4),
                price_at_time: dec!(85),
                product_id: None,
            },
            PartUsed {
                description: Some("Oil".into()),
                quantity: dec!(1),
                price_at_time: dec!(45),
                product_id: None,
            },
        ];

        let items = line_items_of(&parts, dec!(2), Some(dec!(60)));
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].kind, ItemKind::Part);
        assert_eq!(items[0].description, "Liner");
        assert_eq!(items[1].description, "Oil");
        assert_eq!(items[2].kind, ItemKind::Labor);
        assert_eq!(items[2].id, "labor-item");
        assert_eq!(items[2].total, dec!(120.00));
    }

    #[test]
    fn sem_horas_nao_sintetiza_mao_de_obra() {
        let items = line_items_of(&[], dec!(0), None);
        assert!(items.is_empty());
    }

    #[test]
    fn tarifa_ausente_usa_60() {
        let items = line_items_of(&[], dec!(3), None);
        assert_eq!(items[0].unit_price, dec!(60));
        assert_eq!(items[0].total, dec!(180.00));
    }

    #[test]
    fn descricao_de_peca_ausente_vira_part() {
        let parts = vec![PartUsed {
            description: None,
            quantity: dec!(1),
            price_at_time: dec!(10),
            product_id: None,
        }];
        let items = line_items_of(&parts, dec!(0), None);
        assert_eq!(items[0].description, "Part");
    }

    #[test]
    fn formatter_aplica_defaults_documentados() {
        let job = format_job(row_base(), true);
        assert_eq!(job.customer_name, "Unknown");
        assert_eq!(job.engineer_name, "Unassigned");
        assert_eq!(job.description, "");
        assert_eq!(job.status, JobStatus::Scheduled);
        assert_eq!(job.total_amount, dec!(0));
        assert!(job.items.is_empty());
    }

    #[test]
    fn status_desconhecido_resolve_para_scheduled() {
        // Fail-open documentado: o mapeamento é total e nunca levanta erro.
        let mut row = row_base();
        row.status = Some("archived".into());
        assert_eq!(format_job(row, false).status, JobStatus::Scheduled);

        for code in ["scheduled", "in_progress", "completed", "cancelled"] {
            assert_eq!(JobStatus::from_code(code).as_code(), code);
        }
    }

    #[test]
    fn total_do_cenario_de_referencia() {
        // 1 peça (qty 2 a 45.00) + 3h a 60 -> 270.00
        let mut row = row_base();
        row.parts_used = Some(sqlx::types::Json(vec![PartUsed {
            description: Some("Pump".into()),
            quantity: dec!(2),
            price_at_time: dec!(45.00),
            product_id: None,
        }]));
        row.labor_hours = Some(dec!(3));
        row.labor_rate = Some(dec!(60));

        let job = format_job(row, true);
        assert_eq!(job.total_amount, dec!(270.00));
        assert_eq!(job.items.len(), 2);
    }

    #[test]
    fn split_separa_pecas_e_acumula_horas() {
        let drafts = vec![
            JobDraftItem {
                description: "Pulsator Kit".into(),
                quantity: dec!(1),
                unit_price: dec!(25.50),
                kind: ItemKind::Part,
                product_id: None,
            },
            JobDraftItem {
                description: "Labor".into(),
                quantity: dec!(2),
                unit_price: dec!(60),
                kind: ItemKind::Labor,
                product_id: None,
            },
            JobDraftItem {
                description: "Labor extra".into(),
                quantity: dec!(1.5),
                unit_price: dec!(60),
                kind: ItemKind::Labor,
                product_id: None,
            },
        ];

        let (parts, hours) = split_draft_items(drafts);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].description.as_deref(), Some("Pulsator Kit"));
        assert_eq!(hours, dec!(3.5));
    }
}
