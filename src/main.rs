//src/main.rs

use axum::{
    routing::{get, patch, post},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod models;
mod services;

use crate::config::AppState;

#[tokio::main]
async fn main() {
    // Inicializa o logger.
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização.
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let job_routes = Router::new()
        .route("/"
               , get(handlers::jobs::list_jobs)
               .post(handlers::jobs::create_job)
        )
        .route("/{id}", get(handlers::jobs::get_job))
        .route("/{id}/status", patch(handlers::jobs::update_job_status))
        // Os três documentos saem da mesma rota; ?mode= escolhe o encapsulamento.
        .route("/{id}/documents/{kind}", get(handlers::documents::job_document));

    let quote_routes = Router::new()
        .route("/"
               , get(handlers::quotes::list_quotes)
               .post(handlers::quotes::create_quote)
        )
        .route("/{id}", get(handlers::quotes::get_quote))
        .route("/{id}/status", patch(handlers::quotes::update_quote_status))
        .route("/{id}/convert", post(handlers::quotes::convert_quote));

    let invoice_routes = Router::new()
        .route("/"
               , get(handlers::invoices::list_invoices)
               .post(handlers::invoices::generate_invoice)
        );

    let customer_routes = Router::new()
        .route("/"
               , get(handlers::crm::list_customers)
               .post(handlers::crm::create_customer)
        );

    let product_routes = Router::new()
        .route("/"
               , get(handlers::inventory::list_products)
               .post(handlers::inventory::create_product)
        )
        .route("/{id}/stock", post(handlers::inventory::adjust_stock));

    let allocation_routes = Router::new()
        .route("/", get(handlers::allocation::get_board))
        .route("/assign", post(handlers::allocation::assign_job));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/engineers", get(handlers::allocation::list_engineers))
        .route("/api/dashboard/summary", get(handlers::dashboard::get_summary))
        .route("/api/reports/summary", get(handlers::dashboard::get_reports))
        .nest("/api/jobs", job_routes)
        .nest("/api/quotes", quote_routes)
        .nest("/api/invoices", invoice_routes)
        .nest("/api/customers", customer_routes)
        .nest("/api/products", product_routes)
        .nest("/api/allocation", allocation_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
