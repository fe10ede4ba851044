// src/services/quote_service.rs

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{JobsRepository, QuotesRepository},
    models::jobs::{Job, JobStatus, NewJobRecord, PartUsed},
    models::money::{self, ItemKind, LineItem},
    models::quotes::{Quote, QuoteItemRaw, QuoteRow, QuoteStatus},
    services::job_service::{default_labor_rate, format_job},
};

#[derive(Clone)]
pub struct QuoteService {
    quotes: QuotesRepository,
    jobs: JobsRepository,
}

impl QuoteService {
    pub fn new(quotes: QuotesRepository, jobs: JobsRepository) -> Self {
        Self { quotes, jobs }
    }

    pub async fn list_quotes(&self) -> Result<Vec<Quote>, AppError> {
        let rows = self.quotes.list().await?;
        Ok(rows.into_iter().map(format_quote).collect())
    }

    pub async fn get_quote(&self, quote_id: Uuid) -> Result<Quote, AppError> {
        let row = self.quotes.get(quote_id).await?;
        Ok(format_quote(row))
    }

    pub async fn create_quote(
        &self,
        customer_id: Uuid,
        description: String,
        valid_until: Option<NaiveDate>,
        items: Vec<QuoteItemRaw>,
        labor_hours: Decimal,
        labor_rate: Decimal,
        notes: Option<String>,
    ) -> Result<Quote, AppError> {
        // Total gravado = peças + mão de obra no momento da criação.
        let parts_total: Decimal = items
            .iter()
            .map(|i| i.quantity * i.unit_price)
            .sum();
        let total_amount = money::round2(parts_total + labor_hours * labor_rate);

        let row = self
            .quotes
            .insert(
                customer_id,
                &description,
                valid_until,
                &items,
                labor_hours,
                labor_rate,
                total_amount,
                notes.as_deref(),
            )
            .await?;

        Ok(format_quote(row))
    }

    // Transição pedida pela API, validada contra a máquina de estados.
    // Estado terminal devolve erro de política (409), nunca ignora.
    pub async fn update_status(
        &self,
        quote_id: Uuid,
        to: QuoteStatus,
    ) -> Result<Quote, AppError> {
        let current = format_quote(self.quotes.get(quote_id).await?);
        current.status.validate_transition(to)?;

        self.quotes.update_status(quote_id, to.as_code()).await?;
        self.get_quote(quote_id).await
    }

    // Conversão orçamento -> job, na ordem estrita:
    //   (a) filtra itens kind=part para parts_used;
    //   (b) insere o Job (scheduled, datado de hoje);
    //   (c) marca o orçamento como converted com o backlink.
    //
    // (b) e (c) são dois writes independentes SEM transação: se (c) falhar
    // fica um job órfão e um orçamento não convertido. A janela é
    // preservada de propósito (ver DESIGN.md); quem chama reconcilia
    // procurando jobs sem backlink de orçamento convertido.
    pub async fn convert_to_job(&self, quote_id: Uuid) -> Result<Job, AppError> {
        let quote = format_quote(self.quotes.get(quote_id).await?);

        if !quote.status.can_convert() {
            return Err(AppError::QuoteFinalized(quote.status.label().to_string()));
        }

        let job_number = self.jobs.next_job_number(Utc::now().year()).await?;
        let record = job_record_from_quote(&quote, job_number, Utc::now().date_naive())?;

        let job_row = self.jobs.insert(&record).await?;
        self.quotes.mark_converted(quote.id, job_row.id).await?;

        Ok(format_job(job_row, true))
    }
}

// =========================================================================
//  FORMATTER + CONVERSÃO (puros)
// =========================================================================

pub fn format_quote(row: QuoteRow) -> Quote {
    let raw_items = row.items.map(|json| json.0).unwrap_or_default();

    // Parsing tolerante por entrada: campos ausentes viram defaults.
    let items: Vec<LineItem> = raw_items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            LineItem::new(
                format!("item-{i}"),
                item.description.clone().unwrap_or_else(|| "Item".to_string()),
                item.quantity,
                item.unit_price,
                item.kind.unwrap_or(ItemKind::Part),
                item.product_id,
            )
        })
        .collect();

    let labor_hours = row.labor_hours.unwrap_or_default();
    let labor_rate = row.labor_rate.unwrap_or_else(default_labor_rate);

    // Coluna zerada/ausente cai para o total derivado dos itens + labor.
    let derived: Decimal = items.iter().map(|i| i.total).sum::<Decimal>()
        + labor_hours * labor_rate;
    let total_amount = row
        .total_amount
        .filter(|t| !t.is_zero())
        .unwrap_or_else(|| money::round2(derived));

    Quote {
        id: row.id,
        quote_number: format!("Q-{:04}", row.quote_number),
        customer_id: row.customer_id,
        customer_name: row.customer_name.unwrap_or_else(|| "Unknown".to_string()),
        description: row.description.unwrap_or_default(),
        status: QuoteStatus::from_code(row.status.as_deref().unwrap_or("")),
        valid_until: row.valid_until,
        items,
        labor_hours,
        labor_rate,
        total_amount,
        notes: row.notes.unwrap_or_default(),
        converted_job_id: row.converted_job_id,
        created_at: row.created_at,
    }
}

// Passo (a) + montagem do registro do job: só itens kind=part viram
// parts_used; a mão de obra atravessa como escalares; a descrição do
// orçamento vai verbatim.
pub fn job_record_from_quote(
    quote: &Quote,
    job_number: i32,
    today: NaiveDate,
) -> Result<NewJobRecord, AppError> {
    let customer_id = quote.customer_id.ok_or(AppError::CustomerNotFound)?;

    let parts_used: Vec<PartUsed> = quote
        .items
        .iter()
        .filter(|i| i.kind == ItemKind::Part)
        .map(|i| PartUsed {
            description: Some(i.description.clone()),
            quantity: i.quantity,
            price_at_time: i.unit_price,
            product_id: i.product_id,
        })
        .collect();

    Ok(NewJobRecord {
        job_number,
        customer_id,
        description: quote.description.clone(),
        status_code: JobStatus::Scheduled.as_code(),
        scheduled_date: today,
        parts_used,
        labor_hours: quote.labor_hours,
        labor_rate: quote.labor_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use sqlx::types::Json;

    fn quote_row(status: &str) -> QuoteRow {
        QuoteRow {
            id: Uuid::new_v4(),
            quote_number: 42,
            customer_id: Some(Uuid::new_v4()),
            description: Some("Bulk Tank Compressor Repair".into()),
            status: Some(status.into()),
            valid_until: None,
            items: Some(Json(vec![
                QuoteItemRaw {
                    description: Some("Compressor valve".into()),
                    quantity: dec!(2),
                    unit_price: dec!(45.00),
                    kind: Some(ItemKind::Part),
                    product_id: None,
                },
                QuoteItemRaw {
                    description: Some("Callout labor".into()),
                    quantity: dec!(1),
                    unit_price: dec!(80.00),
                    kind: Some(ItemKind::Labor),
                    product_id: None,
                },
            ])),
            labor_hours: Some(dec!(3)),
            labor_rate: Some(dec!(60)),
            total_amount: None,
            notes: None,
            converted_job_id: None,
            created_at: None,
            customer_name: None,
        }
    }

    #[test]
    fn numero_formatado_com_zeros() {
        let quote = format_quote(quote_row("draft"));
        assert_eq!(quote.quote_number, "Q-0042");
    }

    #[test]
    fn total_ausente_cai_para_derivado() {
        // pecas 90 + labor custom 80 + 3h * 60 = 350
        let quote = format_quote(quote_row("draft"));
        assert_eq!(quote.total_amount, dec!(350.00));
    }

    #[test]
    fn transicoes_permitidas() {
        use QuoteStatus::*;
        assert!(Draft.validate_transition(Sent).is_ok());
        assert!(Sent.validate_transition(Accepted).is_ok());
        assert!(Sent.validate_transition(Rejected).is_ok());
        assert!(Draft.validate_transition(Converted).is_ok());
        assert!(Sent.validate_transition(Converted).is_ok());
        assert!(Accepted.validate_transition(Converted).is_ok());
    }

    #[test]
    fn transicoes_proibidas() {
        use QuoteStatus::*;
        assert!(matches!(
            Draft.validate_transition(Accepted),
            Err(AppError::InvalidQuoteTransition { .. })
        ));
        assert!(matches!(
            Accepted.validate_transition(Sent),
            Err(AppError::InvalidQuoteTransition { .. })
        ));
    }

    #[test]
    fn estado_terminal_rejeita_qualquer_transicao() {
        use QuoteStatus::*;
        // Segunda conversão inclusa: é violação de estado terminal, não re-execução.
        for terminal in [Converted, Rejected] {
            assert!(terminal.is_terminal());
            assert!(!terminal.can_convert());
            for to in [Draft, Sent, Accepted, Rejected, Converted] {
                assert!(matches!(
                    terminal.validate_transition(to),
                    Err(AppError::QuoteFinalized(_))
                ));
            }
        }
    }

    #[test]
    fn conversao_filtra_somente_pecas() {
        let quote = format_quote(quote_row("sent"));
        let record = job_record_from_quote(&quote, 20240007, Utc::now().date_naive()).unwrap();

        assert_eq!(record.status_code, "scheduled");
        assert_eq!(record.parts_used.len(), 1);
        assert_eq!(
            record.parts_used[0].description.as_deref(),
            Some("Compressor valve")
        );
        assert_eq!(record.parts_used[0].price_at_time, dec!(45.00));
        assert_eq!(record.labor_hours, dec!(3));
        assert_eq!(record.labor_rate, dec!(60));
        assert_eq!(record.description, "Bulk Tank Compressor Repair");
    }

    #[test]
    fn conversao_sem_cliente_e_erro_de_validacao() {
        let mut quote = format_quote(quote_row("sent"));
        quote.customer_id = None;
        assert!(job_record_from_quote(&quote, 1, Utc::now().date_naive()).is_err());
    }

    #[test]
    fn status_desconhecido_resolve_para_draft() {
        let quote = format_quote(quote_row("archived"));
        assert_eq!(quote.status, QuoteStatus::Draft);
    }
}
