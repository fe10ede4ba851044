// src/services/document_service.rs

use chrono::{Datelike, Utc};
use genpdf::{elements, style, Alignment, Element};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    common::error::AppError,
    config::CompanyProfile,
    models::jobs::Job,
    models::money::{self, LineItem},
};

// IVA fixo do statement detalhado (taxa de serviço).
pub fn statement_vat_rate() -> Decimal {
    Decimal::new(135, 1) // 13.5
}

// Estimativa de cursor do service report: a tabela de itens começa por
// volta dos 100mm e cada linha ocupa ~6mm. Se o fim estimado da tabela
// passa dos 230mm (margem inferior da página A4), o bloco de
// notas/assinaturas abre em página nova.
const REPORT_TABLE_TOP_MM: f32 = 100.0;
const REPORT_ROW_MM: f32 = 6.0;
const REPORT_BREAK_THRESHOLD_MM: f32 = 230.0;

pub fn report_needs_page_break(item_count: usize) -> bool {
    let rows = item_count as f32 + 1.0; // +1 do cabeçalho da tabela
    REPORT_TABLE_TOP_MM + rows * REPORT_ROW_MM > REPORT_BREAK_THRESHOLD_MM
}

// --- Tipos de documento e modos de saída ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    // Breakdown completo para o cliente, IVA fixo de 13.5%.
    Statement,
    // Linha única sintética para o contador, IVA e total do caller.
    Invoice,
    // Documento interno de campo, sem colunas monetárias.
    Report,
}

impl DocumentKind {
    // Nome de arquivo determinístico:
    //   Statement_{job}_{Cliente_Com_Underscores}.pdf
    //   Invoice_{job}_Accountant.pdf
    //   ServiceReport_{job}.pdf
    pub fn filename(&self, job: &Job) -> String {
        match self {
            DocumentKind::Statement => format!(
                "Statement_{}_{}.pdf",
                job.job_number,
                underscored(&job.customer_name)
            ),
            DocumentKind::Invoice => format!("Invoice_{}_Accountant.pdf", job.job_number),
            DocumentKind::Report => format!("ServiceReport_{}.pdf", job.job_number),
        }
    }
}

// Os três modos devolvem os MESMOS bytes; muda só o encapsulamento HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    // Blob cru, sem Content-Disposition.
    Raw,
    // Preview inline (iframe/viewer do navegador).
    Inline,
    // Download com o nome de arquivo determinístico.
    #[default]
    Download,
}

fn underscored(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("_")
}

fn eur(value: Decimal) -> String {
    format!("€{:.2}", value)
}

#[derive(Clone)]
pub struct DocumentService {
    company: CompanyProfile,
    fonts_dir: String,
}

impl DocumentService {
    pub fn new(company: CompanyProfile, fonts_dir: String) -> Self {
        Self { company, fonts_dir }
    }

    // Carrega a fonte e prepara o documento com as margens padrão.
    fn new_document(&self, title: String) -> Result<genpdf::Document, AppError> {
        let font_family = genpdf::fonts::from_files(&self.fonts_dir, "Roboto", None)
            .map_err(|_| {
                AppError::FontNotFound(format!("Fonte não encontrada em {}", self.fonts_dir))
            })?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(title);
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);
        Ok(doc)
    }

    fn push_company_header(&self, doc: &mut genpdf::Document) {
        doc.push(
            elements::Paragraph::new(self.company.name.clone())
                .styled(style::Style::new().bold().with_font_size(18)),
        );
        doc.push(
            elements::Paragraph::new(self.company.address.clone())
                .styled(style::Style::new().with_font_size(10)),
        );
        doc.push(
            elements::Paragraph::new(format!("Phone: {}", self.company.phone))
                .styled(style::Style::new().with_font_size(10)),
        );
    }

    // -- 1. CUSTOMER STATEMENT (detalhado) --
    // Totais SEMPRE derivados da lista de itens; nunca aceita total externo.
    // Lista vazia renderiza corpo vazio com totais zerados, nunca falha.
    pub fn render_statement(&self, job: &Job, items: &[LineItem]) -> Result<Vec<u8>, AppError> {
        let mut doc = self.new_document(format!("Statement {}", job.job_number))?;

        self.push_company_header(&mut doc);
        doc.push(elements::Break::new(1.5));

        doc.push(
            elements::Paragraph::new("SERVICE STATEMENT")
                .styled(style::Style::new().bold().with_font_size(16)),
        );
        // A data é estampada no momento da renderização: é o único campo
        // que muda entre duas gerações com os mesmos insumos.
        doc.push(elements::Paragraph::new(format!(
            "Date: {}",
            Utc::now().format("%d/%m/%Y")
        )));
        doc.push(elements::Paragraph::new(format!("Job No: {}", job.job_number)));
        doc.push(elements::Break::new(1.0));

        doc.push(elements::Paragraph::new("Bill To:"));
        doc.push(
            elements::Paragraph::new(job.customer_name.clone())
                .styled(style::Style::new().with_font_size(12)),
        );
        doc.push(elements::Break::new(1.0));

        doc.push(elements::Paragraph::new("Work Description:"));
        doc.push(
            elements::Paragraph::new(job.description.clone())
                .styled(style::Style::new().italic()),
        );
        doc.push(elements::Break::new(2.0));

        // Tabela de itens, na ordem em que o formatter entregou
        // (peças primeiro, depois a mão de obra).
        let mut table = elements::TableLayout::new(vec![4, 1, 2, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let bold = style::Style::new().bold();
        table
            .row()
            .element(elements::Paragraph::new("Description").styled(bold))
            .element(elements::Paragraph::new("Qty").styled(bold))
            .element(elements::Paragraph::new("Unit Price").styled(bold))
            .element(elements::Paragraph::new("Total").styled(bold))
            .push()
            .expect("Table error");

        for item in items {
            table
                .row()
                .element(elements::Paragraph::new(item.description.clone()))
                .element(elements::Paragraph::new(format!("{}", item.quantity)))
                .element(elements::Paragraph::new(eur(item.unit_price)))
                .element(elements::Paragraph::new(eur(item.total)))
                .push()
                .expect("Table row error");
        }

        let totals = money::breakdown_from_items(items, statement_vat_rate());
        for (label, value) in [
            ("Subtotal", totals.subtotal),
            ("VAT (13.5%)", totals.vat_amount),
            ("Grand Total", totals.total),
        ] {
            table
                .row()
                .element(elements::Paragraph::new(""))
                .element(elements::Paragraph::new(""))
                .element(elements::Paragraph::new(label).styled(bold))
                .element(elements::Paragraph::new(eur(value)).styled(bold))
                .push()
                .expect("Table row error");
        }

        doc.push(table);

        render_to_buffer(doc)
    }

    // -- 2. ACCOUNTANT INVOICE (simplificado) --
    // O total vem do caller (a UI deixa o usuário editar o valor exibido);
    // subtotal e IVA são derivados dele pelo caminho inverso. Qualquer
    // taxa numérica é aceita (13.5, 23 e 0 são as opções reconhecidas).
    pub fn render_accountant_invoice(
        &self,
        job: &Job,
        custom_description: &str,
        vat_rate: Decimal,
        total_amount: Decimal,
    ) -> Result<Vec<u8>, AppError> {
        let mut doc = self.new_document(format!("Invoice {}", job.job_number))?;

        self.push_company_header(&mut doc);
        doc.push(elements::Break::new(1.5));

        doc.push(
            elements::Paragraph::new("INVOICE")
                .styled(style::Style::new().bold().with_font_size(16)),
        );
        doc.push(elements::Paragraph::new(format!(
            "Date: {}",
            Utc::now().format("%d/%m/%Y")
        )));
        doc.push(elements::Paragraph::new(format!(
            "Inv No: INV-{}-{}",
            Utc::now().year(),
            job.job_number
        )));
        doc.push(elements::Break::new(1.0));

        doc.push(elements::Paragraph::new("Bill To:"));
        doc.push(
            elements::Paragraph::new(job.customer_name.clone())
                .styled(style::Style::new().with_font_size(12)),
        );
        doc.push(elements::Break::new(2.0));

        let totals = money::breakdown_from_total(total_amount, vat_rate);

        let mut table = elements::TableLayout::new(vec![5, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let bold = style::Style::new().bold();
        table
            .row()
            .element(elements::Paragraph::new("Description").styled(bold))
            .element(elements::Paragraph::new("Amount").styled(bold))
            .push()
            .expect("Table error");

        // A linha única sintética substitui o breakdown detalhado.
        table
            .row()
            .element(elements::Paragraph::new(custom_description.to_string()))
            .element(elements::Paragraph::new(eur(totals.subtotal)))
            .push()
            .expect("Table row error");

        for (label, value) in [
            ("Subtotal", eur(totals.subtotal)),
            ("Available VAT Rate", format!("{}%", vat_rate)),
            ("VAT Amount", eur(totals.vat_amount)),
            ("Total Due", eur(totals.total)),
        ] {
            table
                .row()
                .element(elements::Paragraph::new(label).styled(bold))
                .element(elements::Paragraph::new(value).styled(bold))
                .push()
                .expect("Table row error");
        }

        doc.push(table);

        render_to_buffer(doc)
    }

    // -- 3. SERVICE REPORT (interno/campo) --
    // Sem colunas monetárias: descrição, tipo e quantidade, mais os blocos
    // de notas e assinaturas em branco para preenchimento manual.
    pub fn render_service_report(&self, job: &Job, items: &[LineItem]) -> Result<Vec<u8>, AppError> {
        let mut doc = self.new_document(format!("Service Report {}", job.job_number))?;

        doc.push(
            elements::Paragraph::new(self.company.name.clone())
                .styled(style::Style::new().bold().with_font_size(20)),
        );
        doc.push(
            elements::Paragraph::new(self.company.tagline.clone())
                .styled(style::Style::new().with_font_size(10)),
        );
        doc.push(
            elements::Paragraph::new(format!("{} | {}", self.company.address, self.company.phone))
                .styled(style::Style::new().with_font_size(10)),
        );
        doc.push(elements::Break::new(1.0));

        doc.push(
            elements::Paragraph::new("SERVICE REPORT")
                .styled(style::Style::new().bold().with_font_size(18)),
        );
        doc.push(elements::Break::new(1.5));

        // Detalhes em duas colunas: job à esquerda, cliente à direita.
        let mut details = elements::TableLayout::new(vec![1, 1]);

        let bold = style::Style::new().bold().with_font_size(11);
        details
            .row()
            .element(elements::Paragraph::new("Job Details:").styled(bold))
            .element(elements::Paragraph::new("Customer:").styled(bold))
            .push()
            .expect("Table error");
        details
            .row()
            .element(elements::Paragraph::new(format!("Job Number: {}", job.job_number)))
            .element(elements::Paragraph::new(job.customer_name.clone()))
            .push()
            .expect("Table row error");
        details
            .row()
            .element(elements::Paragraph::new(format!(
                "Date: {}",
                job.date.format("%d/%m/%Y")
            )))
            .element(elements::Paragraph::new(""))
            .push()
            .expect("Table row error");
        details
            .row()
            .element(elements::Paragraph::new(format!("Engineer: {}", job.engineer_name)))
            .element(elements::Paragraph::new(""))
            .push()
            .expect("Table row error");
        details
            .row()
            .element(elements::Paragraph::new(format!("Status: {}", job.status)))
            .element(elements::Paragraph::new(""))
            .push()
            .expect("Table row error");

        doc.push(details);
        doc.push(elements::Break::new(1.5));

        doc.push(
            elements::Paragraph::new("Description of Work Required / Fault:")
                .styled(style::Style::new().bold().with_font_size(11)),
        );
        let description = if job.description.is_empty() {
            "N/A".to_string()
        } else {
            job.description.clone()
        };
        doc.push(elements::Paragraph::new(description));
        doc.push(elements::Break::new(1.5));

        let mut table = elements::TableLayout::new(vec![4, 2, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let head = style::Style::new().bold();
        table
            .row()
            .element(elements::Paragraph::new("Item / Part Description").styled(head))
            .element(elements::Paragraph::new("Type").styled(head))
            .element(elements::Paragraph::new("Quantity").styled(head))
            .push()
            .expect("Table error");

        for item in items {
            table
                .row()
                .element(elements::Paragraph::new(item.description.clone()))
                .element(elements::Paragraph::new(item.kind.label().to_uppercase()))
                .element(elements::Paragraph::new(format!("{}", item.quantity)))
                .push()
                .expect("Table row error");
        }

        doc.push(table);

        // Quebra explícita: notas + assinaturas abrem em página nova se a
        // tabela estourar a margem inferior estimada.
        if report_needs_page_break(items.len()) {
            doc.push(elements::PageBreak::new());
        }

        doc.push(elements::Break::new(1.0));
        doc.push(
            elements::Paragraph::new("Engineer Notes / Recommendations:")
                .styled(style::Style::new().bold()),
        );

        let mut notes_box = elements::LinearLayout::vertical();
        notes_box.push(elements::Break::new(4.0));
        doc.push(elements::FramedElement::new(notes_box));

        doc.push(elements::Break::new(2.0));
        doc.push(elements::Paragraph::new(
            "I confirm the work has been carried out to my satisfaction.",
        ));
        doc.push(elements::Break::new(2.0));

        let mut signatures = elements::TableLayout::new(vec![1, 1]);
        signatures
            .row()
            .element(elements::Paragraph::new("Engineer Signature:"))
            .element(elements::Paragraph::new("Customer Signature:"))
            .push()
            .expect("Table error");
        signatures
            .row()
            .element(elements::Paragraph::new("_________________________"))
            .element(elements::Paragraph::new("_________________________"))
            .push()
            .expect("Table row error");
        doc.push(signatures);

        doc.push(elements::Break::new(2.0));
        let mut footer = elements::Paragraph::new(format!(
            "{} - Registered Number: {}",
            self.company.name, self.company.registration
        ));
        footer.set_alignment(Alignment::Left);
        doc.push(footer.styled(style::Style::new().with_font_size(8)));

        render_to_buffer(doc)
    }
}

fn render_to_buffer(doc: genpdf::Document) -> Result<Vec<u8>, AppError> {
    let mut buffer = Vec::new();
    doc.render(&mut buffer)
        .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn job_named(customer: &str) -> Job {
        Job {
            id: Uuid::new_v4(),
            job_number: "20240001".into(),
            customer_id: None,
            customer_name: customer.into(),
            description: "Annual service".into(),
            status: crate::models::jobs::JobStatus::Scheduled,
            date: NaiveDate::from_ymd_opt(2024, 2, 15).unwrap(),
            engineer_name: "Unassigned".into(),
            total_amount: dec!(0),
            items: vec![],
        }
    }

    #[test]
    fn nomes_de_arquivo_deterministicos() {
        let job = job_named("Murphy Farm Ltd");
        assert_eq!(
            DocumentKind::Statement.filename(&job),
            "Statement_20240001_Murphy_Farm_Ltd.pdf"
        );
        assert_eq!(
            DocumentKind::Invoice.filename(&job),
            "Invoice_20240001_Accountant.pdf"
        );
        assert_eq!(
            DocumentKind::Report.filename(&job),
            "ServiceReport_20240001.pdf"
        );
    }

    #[test]
    fn espacos_multiplos_no_nome_viram_underscores_simples() {
        let job = job_named("  Kelly   Cattle Co ");
        assert_eq!(
            DocumentKind::Statement.filename(&job),
            "Statement_20240001_Kelly_Cattle_Co.pdf"
        );
    }

    #[test]
    fn limiar_de_quebra_de_pagina_do_report() {
        // 100mm + (n+1)*6mm: 20 itens ficam em 226mm (cabe),
        // 21 itens passam para 232mm (quebra).
        assert!(!report_needs_page_break(0));
        assert!(!report_needs_page_break(20));
        assert!(report_needs_page_break(21));
        assert!(report_needs_page_break(50));
    }

    #[test]
    fn taxa_fixa_do_statement() {
        assert_eq!(statement_vat_rate(), dec!(13.5));
    }
}
