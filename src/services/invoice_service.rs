// src/services/invoice_service.rs

use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::InvoicesRepository,
    models::invoices::{Invoice, NewInvoiceRecord},
    models::money,
    services::document_service::DocumentService,
    services::job_service::JobService,
    services::storage::StorageClient,
};

#[derive(Clone)]
pub struct InvoiceService {
    invoices: InvoicesRepository,
    jobs: JobService,
    documents: DocumentService,
    storage: Option<StorageClient>,
}

impl InvoiceService {
    pub fn new(
        invoices: InvoicesRepository,
        jobs: JobService,
        documents: DocumentService,
        storage: Option<StorageClient>,
    ) -> Self {
        Self {
            invoices,
            jobs,
            documents,
            storage,
        }
    }

    pub async fn list_invoices(&self) -> Result<Vec<Invoice>, AppError> {
        let rows = self.invoices.list().await?;
        Ok(rows.into_iter().map(Invoice::from_row).collect())
    }

    // Geração de fatura a partir de um job, na ordem:
    //   1. renderiza statement + fatura do contador;
    //   2. tenta subir os dois PDFs para o storage (best-effort);
    //   3. grava o registro da fatura (URLs nulas se o upload falhou).
    //
    // Falha no passo 2 nunca bloqueia o passo 3: degrada, mantém o que
    // deu certo e loga a etapa que falhou.
    pub async fn generate_for_job(
        &self,
        job_id: Uuid,
        custom_description: String,
        vat_rate: Decimal,
    ) -> Result<Invoice, AppError> {
        let job = self.jobs.get_job(job_id).await?;

        // Total da fatura = subtotal dos itens + IVA na taxa escolhida.
        let totals = money::breakdown_from_items(&job.items, vat_rate);

        let statement_pdf = self.documents.render_statement(&job, &job.items)?;
        let invoice_pdf = self.documents.render_accountant_invoice(
            &job,
            &custom_description,
            vat_rate,
            totals.total,
        )?;

        let stamp = Utc::now().timestamp_millis();
        let statement_url = self
            .try_upload(format!("statements/{}_{}.pdf", job.job_number, stamp), statement_pdf)
            .await;
        let invoice_url = self
            .try_upload(format!("invoices/{}_{}.pdf", job.job_number, stamp), invoice_pdf)
            .await;

        let record = NewInvoiceRecord {
            customer_id: job.customer_id,
            invoice_number: format!("INV-{}-{}", Utc::now().year(), job.job_number),
            total_amount: totals.total,
            status: "issued",
            issue_date: Utc::now(),
            vat_rate,
            custom_description,
            statement_url,
            invoice_url,
        };

        let row = self.invoices.insert(&record).await?;
        Ok(Invoice::from_row(row))
    }

    async fn try_upload(&self, path: String, bytes: Vec<u8>) -> Option<String> {
        let storage = self.storage.as_ref()?;

        match storage.upload(&path, bytes).await {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!("Upload de documento falhou ({}): {}", path, e);
                None
            }
        }
    }
}
