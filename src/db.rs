pub mod jobs_repo;
pub use jobs_repo::JobsRepository;
pub mod quotes_repo;
pub use quotes_repo::QuotesRepository;
pub mod invoices_repo;
pub use invoices_repo::InvoicesRepository;
pub mod customers_repo;
pub use customers_repo::CustomersRepository;
pub mod products_repo;
pub use products_repo::ProductsRepository;
pub mod profiles_repo;
pub use profiles_repo::ProfilesRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
