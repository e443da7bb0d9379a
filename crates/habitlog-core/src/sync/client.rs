//! HTTP client for the habitlog backend.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::{HabitSummary, HealthStatus, MutationOutcome};
use crate::error::ApiError;
use crate::history::HistoryEntry;

/// Default backend location.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

/// Operations the backend exposes.
#[async_trait]
pub trait RemoteHabitApi: Send + Sync {
    async fn health(&self) -> Result<HealthStatus, ApiError>;

    async fn get_habit(&self) -> Result<HabitSummary, ApiError>;

    async fn complete_habit(&self) -> Result<MutationOutcome, ApiError>;

    async fn reset_habit(&self) -> Result<MutationOutcome, ApiError>;

    async fn history(&self) -> Result<Vec<HistoryEntry>, ApiError>;

    /// Liveness probe. Any failure counts as unavailable.
    async fn is_available(&self) -> bool {
        match self.health().await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(error = %e, "backend health check failed");
                false
            }
        }
    }
}

/// reqwest-backed [`RemoteHabitApi`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// `base_url` points at the `/api` prefix, e.g. `http://localhost:5000/api`.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let parsed = Url::parse(base_url)?;
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
    ) -> Result<T, ApiError> {
        let response = self
            .http
            .request(method, self.url(endpoint))
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }

        Ok(response.json().await?)
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

#[async_trait]
impl RemoteHabitApi for ApiClient {
    async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.request(Method::GET, "/health").await
    }

    async fn get_habit(&self) -> Result<HabitSummary, ApiError> {
        self.request(Method::GET, "/habit").await
    }

    async fn complete_habit(&self) -> Result<MutationOutcome, ApiError> {
        self.request(Method::POST, "/habit/complete").await
    }

    async fn reset_habit(&self) -> Result<MutationOutcome, ApiError> {
        self.request(Method::POST, "/habit/reset").await
    }

    async fn history(&self) -> Result<Vec<HistoryEntry>, ApiError> {
        self.request(Method::GET, "/habit/history").await
    }
}
