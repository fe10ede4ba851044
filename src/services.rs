pub mod allocation_service;
pub mod dashboard_service;
pub mod document_service;
pub mod invoice_service;
pub mod job_service;
pub mod quote_service;
pub mod storage;
