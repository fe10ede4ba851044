// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, sync::Arc, time::Duration};

use crate::db::{
    CustomersRepository, DashboardRepository, InvoicesRepository, JobsRepository,
    ProductsRepository, ProfilesRepository, QuotesRepository,
};
use crate::services::{
    allocation_service::{AllocationService, PgAllocationStore},
    dashboard_service::DashboardService,
    document_service::DocumentService,
    invoice_service::InvoiceService,
    job_service::JobService,
    quote_service::QuoteService,
    storage::StorageClient,
};

// Identidade da empresa impressa nos três documentos. Vem do ambiente com
// os defaults do negócio; single-tenant, então não há tabela de settings.
#[derive(Clone)]
pub struct CompanyProfile {
    pub name: String,
    pub tagline: String,
    pub address: String,
    pub phone: String,
    pub registration: String,
}

impl CompanyProfile {
    fn from_env() -> Self {
        Self {
            name: env::var("COMPANY_NAME")
                .unwrap_or_else(|_| "Condon Dairy Services".to_string()),
            tagline: env::var("COMPANY_TAGLINE")
                .unwrap_or_else(|_| "Agri-Tech & Milking Machine Specialists".to_string()),
            address: env::var("COMPANY_ADDRESS")
                .unwrap_or_else(|_| "Ballyporeen, Co. Tipperary".to_string()),
            phone: env::var("COMPANY_PHONE").unwrap_or_else(|_| "+353 87 123 4567".to_string()),
            registration: env::var("COMPANY_REG_NUMBER").unwrap_or_else(|_| "123456".to_string()),
        }
    }
}

// O estado compartilhado que será acessível em toda a aplicação.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub job_service: JobService,
    pub quote_service: QuoteService,
    pub invoice_service: InvoiceService,
    pub document_service: DocumentService,
    pub allocation_service: Arc<AllocationService>,
    pub dashboard_service: DashboardService,
    pub customers: CustomersRepository,
    pub products: ProductsRepository,
    pub profiles: ProfilesRepository,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let jobs_repo = JobsRepository::new(db_pool.clone());
        let quotes_repo = QuotesRepository::new(db_pool.clone());
        let invoices_repo = InvoicesRepository::new(db_pool.clone());
        let customers = CustomersRepository::new(db_pool.clone());
        let products = ProductsRepository::new(db_pool.clone());
        let profiles = ProfilesRepository::new(db_pool.clone());

        let company = CompanyProfile::from_env();
        let fonts_dir = env::var("FONTS_DIR").unwrap_or_else(|_| "./fonts".to_string());
        let document_service = DocumentService::new(company, fonts_dir);

        // Storage é opcional: sem configuração, as faturas são gravadas
        // com as URLs de documento nulas.
        let storage = StorageClient::from_env();
        if storage.is_none() {
            tracing::warn!("Storage não configurado; uploads de PDF desabilitados.");
        }

        let job_service = JobService::new(jobs_repo.clone());
        let quote_service = QuoteService::new(quotes_repo, jobs_repo.clone());
        let invoice_service = InvoiceService::new(
            invoices_repo,
            job_service.clone(),
            document_service.clone(),
            storage,
        );
        let allocation_service = Arc::new(AllocationService::new(Arc::new(
            PgAllocationStore::new(jobs_repo, profiles.clone()),
        )));
        let dashboard_service = DashboardService::new(DashboardRepository::new(db_pool.clone()));

        Ok(Self {
            db_pool,
            job_service,
            quote_service,
            invoice_service,
            document_service,
            allocation_service,
            dashboard_service,
            customers,
            products,
            profiles,
        })
    }
}
