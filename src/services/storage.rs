// src/services/storage.rs

use crate::common::error::AppError;

// Cliente do bucket de documentos (formato HTTP do Supabase Storage).
// É opcional e best-effort: sem as variáveis de ambiente o cliente nem é
// construído, e falha de upload nunca bloqueia a criação da fatura (o
// registro é gravado com as URLs nulas).
#[derive(Clone)]
pub struct StorageClient {
    http: reqwest::Client,
    base_url: String,
    bucket: String,
    api_key: String,
}

impl StorageClient {
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("STORAGE_URL").ok()?;
        let api_key = std::env::var("STORAGE_API_KEY").ok()?;
        let bucket = std::env::var("STORAGE_BUCKET").unwrap_or_else(|_| "invoices".to_string());

        Some(Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            bucket,
            api_key,
        })
    }

    // upload(path, blob) -> URL pública.
    pub async fn upload(&self, path: &str, bytes: Vec<u8>) -> Result<String, AppError> {
        let endpoint = format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, path);

        let response = self
            .http
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/pdf")
            .body(bytes)
            .send()
            .await
            .map_err(|e| AppError::StorageError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::StorageError(format!(
                "status {} em {}",
                response.status(),
                path
            )));
        }

        Ok(format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, path
        ))
    }
}
