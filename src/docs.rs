// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Jobs ---
        handlers::jobs::list_jobs,
        handlers::jobs::get_job,
        handlers::jobs::create_job,
        handlers::jobs::update_job_status,

        // --- Quotes ---
        handlers::quotes::list_quotes,
        handlers::quotes::get_quote,
        handlers::quotes::create_quote,
        handlers::quotes::update_quote_status,
        handlers::quotes::convert_quote,

        // --- Invoices ---
        handlers::invoices::list_invoices,
        handlers::invoices::generate_invoice,

        // --- CRM ---
        handlers::crm::list_customers,
        handlers::crm::create_customer,

        // --- Inventory ---
        handlers::inventory::list_products,
        handlers::inventory::create_product,
        handlers::inventory::adjust_stock,

        // --- Allocation ---
        handlers::allocation::list_engineers,

        // --- Dashboard ---
        handlers::dashboard::get_summary,
        handlers::dashboard::get_reports,
    ),
    components(
        schemas(
            // --- Core ---
            models::money::ItemKind,
            models::money::LineItem,
            models::jobs::JobStatus,
            models::jobs::Job,
            models::quotes::QuoteStatus,
            models::quotes::Quote,
            models::invoices::Invoice,
            models::crm::Customer,
            models::inventory::Product,
            models::profiles::Engineer,

            // --- Dashboard ---
            models::dashboard::DashboardSummary,
            models::dashboard::RecentSale,
            models::dashboard::MonthlyRevenue,
            models::dashboard::ReportsSummary,

            // --- Payloads ---
            handlers::jobs::JobItemPayload,
            handlers::jobs::CreateJobPayload,
            handlers::jobs::UpdateJobStatusPayload,
            handlers::quotes::QuoteItemPayload,
            handlers::quotes::CreateQuotePayload,
            handlers::quotes::UpdateQuoteStatusPayload,
            handlers::invoices::GenerateInvoicePayload,
            handlers::crm::CreateCustomerPayload,
            handlers::inventory::CreateProductPayload,
            handlers::inventory::AdjustStockPayload,
            handlers::allocation::AssignJobPayload,
        )
    ),
    tags(
        (name = "Jobs", description = "Visitas de serviço, peças e mão de obra"),
        (name = "Quotes", description = "Orçamentos e conversão em jobs"),
        (name = "Invoices", description = "Faturas e geração de documentos"),
        (name = "CRM", description = "Gestão de clientes"),
        (name = "Inventory", description = "Produtos e estoque"),
        (name = "Allocation", description = "Atribuição de jobs aos engenheiros"),
        (name = "Dashboard", description = "Indicadores e relatórios")
    )
)]
pub struct ApiDoc;
