use loadburst_common::{ErrorResponse, LoadburstError, Result};
use serde::{Deserialize, Serialize};

/// Record-store client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the target service, without a trailing slash,
    /// e.g. `http://127.0.0.1:8080`.
    pub base_url: String,
}

/// Body sent by the write operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPayload {
    pub name: String,
    pub data: Vec<u8>,
}

/// Response to a successful write: the identifier the store assigned.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedRecord {
    pub id: String,
}

/// Response to a successful read.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoredRecord {
    pub id: String,
    pub name: String,
    pub size: u64,
}

/// HTTP client for the target record store. The store exposes exactly the
/// two operations the load engine needs: create a record from a payload and
/// fetch a record by identifier.
pub struct Client {
    pub config: ClientConfig,
    http_client: reqwest::Client,
}

impl Client {
    /// Create a new client with the given configuration
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    /// URL of the record collection (write target).
    pub fn build_records_url(&self) -> String {
        format!("{}/records", self.config.base_url)
    }

    /// URL of a single record (read target).
    pub fn build_record_url(&self, id: &str) -> String {
        format!("{}/records/{}", self.config.base_url, id)
    }

    /// Write operation: store `payload` and return the assigned identifier.
    pub async fn create(&self, payload: &RecordPayload) -> Result<CreatedRecord> {
        let response = self
            .http_client
            .post(self.build_records_url())
            .json(payload)
            .send()
            .await
            .map_err(|e| LoadburstError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(parse_error_response(status, response).await);
        }

        response
            .json::<CreatedRecord>()
            .await
            .map_err(|e| LoadburstError::NetworkError(e.to_string()))
    }

    /// Read operation: fetch the record stored under `id`.
    pub async fn fetch(&self, id: &str) -> Result<StoredRecord> {
        let response = self
            .http_client
            .get(self.build_record_url(id))
            .send()
            .await
            .map_err(|e| LoadburstError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(parse_error_response(status, response).await);
        }

        response
            .json::<StoredRecord>()
            .await
            .map_err(|e| LoadburstError::NetworkError(e.to_string()))
    }
}

async fn parse_error_response(
    status: reqwest::StatusCode,
    response: reqwest::Response,
) -> LoadburstError {
    let message = response
        .json::<ErrorResponse>()
        .await
        .map(|r| r.error)
        .unwrap_or_else(|_| format!("Server returned status: {}", status));

    LoadburstError::ServiceError { status: status.as_u16(), message }
}
