//! Finance API transport
//!
//! `FinanceApi` is the seam the hook talks through; `HttpFinanceApi` speaks
//! the `/farm-finance` JSON contract over HTTP.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::api::routes::{DeleteFinanceResponse, FetchFinanceResponse, UpsertFinanceResponse};
use crate::api::FINANCE_PATH;
use crate::domain::{FinanceData, FinanceRecord};
use crate::error::ErrorResponse;

/// Client-side failures
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Server answered with an error body; `message` is its `error` text
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Operations the finance hook needs from the server
#[async_trait]
pub trait FinanceApi: Send + Sync {
    /// `Ok(None)` when the user has no record yet
    async fn fetch(&self, access_token: &str) -> Result<Option<FinanceRecord>, ClientError>;

    async fn save(
        &self,
        access_token: &str,
        data: &FinanceData,
    ) -> Result<FinanceRecord, ClientError>;

    async fn clear(&self, access_token: &str) -> Result<(), ClientError>;
}

/// HTTP transport built on `reqwest`
#[derive(Debug, Clone)]
pub struct HttpFinanceApi {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpFinanceApi {
    /// `base_url` is the server root, e.g. `https://api.example.com`
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), FINANCE_PATH),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => format!("Request failed with status {}", status),
        };

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl FinanceApi for HttpFinanceApi {
    async fn fetch(&self, access_token: &str) -> Result<Option<FinanceRecord>, ClientError> {
        let response = self
            .http
            .get(&self.endpoint)
            .bearer_auth(access_token)
            .send()
            .await?;

        let body: FetchFinanceResponse = Self::decode(response).await?;
        Ok(body.data)
    }

    async fn save(
        &self,
        access_token: &str,
        data: &FinanceData,
    ) -> Result<FinanceRecord, ClientError> {
        let response = self
            .http
            .put(&self.endpoint)
            .bearer_auth(access_token)
            .json(data)
            .send()
            .await?;

        let body: UpsertFinanceResponse = Self::decode(response).await?;
        tracing::debug!("{}", body.message);
        Ok(body.data)
    }

    async fn clear(&self, access_token: &str) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(&self.endpoint)
            .bearer_auth(access_token)
            .send()
            .await?;

        let _: DeleteFinanceResponse = Self::decode(response).await?;
        Ok(())
    }
}
