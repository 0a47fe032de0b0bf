//! Signal persistence and entity suggestion endpoints.

use std::time::Duration;

use async_trait::async_trait;
use signal_core::config::ApiConfig;
use signal_core::EntityRef;
use signal_query::schema::{PersistedSignal, SignalCreated, SignalPayload};
use tracing::debug;

use crate::suggest::SuggestionService;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("invalid API base URL: {0}")]
    InvalidUrl(String),
}

/// Persistence contract for signals.
#[async_trait]
pub trait SignalApi: Send + Sync {
    /// `POST signal`; returns the new id.
    async fn create(&self, payload: &SignalPayload) -> Result<String, ApiError>;

    /// `PUT signal/{id}` with the same body shape.
    async fn update(&self, id: &str, payload: &SignalPayload) -> Result<(), ApiError>;

    /// `GET signal/{id}`.
    async fn fetch(&self, id: &str) -> Result<PersistedSignal, ApiError>;
}

/// reqwest client for the signal API. Also serves entity suggestions,
/// which live on the same service.
#[derive(Debug, Clone)]
pub struct HttpSignalApi {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
    timeout: Duration,
}

impl HttpSignalApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: None,
            timeout,
        }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        let mut api = Self::new(
            config.base_url.clone(),
            Duration::from_secs(config.timeout_secs),
        );
        api.auth_token = config.auth_token.clone();
        api
    }

    /// Base URL plus `segments`, each percent-encoded as a single path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<reqwest::Url, ApiError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(
        &self,
        method: reqwest::Method,
        segments: &[&str],
    ) -> Result<reqwest::RequestBuilder, ApiError> {
        let url = self.endpoint(segments)?;
        debug!(%method, %url, "signal API request");
        let builder = self.client.request(method, url).timeout(self.timeout);
        Ok(match &self.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status { status, body })
}

async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait]
impl SignalApi for HttpSignalApi {
    async fn create(&self, payload: &SignalPayload) -> Result<String, ApiError> {
        let response = self
            .request(reqwest::Method::POST, &["signal"])?
            .json(payload)
            .send()
            .await?;
        let created: SignalCreated = decode(check_status(response).await?).await?;
        Ok(created.id)
    }

    async fn update(&self, id: &str, payload: &SignalPayload) -> Result<(), ApiError> {
        let response = self
            .request(reqwest::Method::PUT, &["signal", id])?
            .json(payload)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn fetch(&self, id: &str) -> Result<PersistedSignal, ApiError> {
        let response = self
            .request(reqwest::Method::GET, &["signal", id])?
            .send()
            .await?;
        decode(check_status(response).await?).await
    }
}

#[async_trait]
impl SuggestionService for HttpSignalApi {
    async fn suggest(&self, query: &str, title: &str) -> Result<Vec<EntityRef>, ApiError> {
        let response = self
            .request(reqwest::Method::GET, &["suggest"])?
            .query(&[("query", query), ("title", title)])
            .send()
            .await?;
        decode(check_status(response).await?).await
    }
}
