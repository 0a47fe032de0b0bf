use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use signal_core::Config;
use signal_query::schema::{StructuredQuery, MAX_QUERY_DEPTH};

use crate::enhancer::LlmQueryEnhancer;
use crate::provider::LlmError;
use crate::providers::create_provider;

/// Converts a free-text monitoring request into a [`StructuredQuery`].
#[async_trait]
pub trait EnhancementService: Send + Sync {
    async fn enhance(&self, text: &str) -> Result<StructuredQuery, EnhanceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum EnhanceError {
    #[error("enhancement request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("enhancement service returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error("enhancement returned an unusable query: {reason}")]
    InvalidQuery { reason: String, raw_response: String },
}

/// Reject trees the rest of the workflow would refuse to interpret.
pub(crate) fn check_depth(query: &StructuredQuery, raw: &str) -> Result<(), EnhanceError> {
    if query.exceeds_depth(MAX_QUERY_DEPTH) {
        return Err(EnhanceError::InvalidQuery {
            reason: format!(
                "nesting depth {} exceeds maximum of {}",
                query.depth(),
                MAX_QUERY_DEPTH
            ),
            raw_response: raw.to_string(),
        });
    }
    Ok(())
}

// ── HTTP NLP endpoint ─────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnhanceResponse {
    structured_query: StructuredQuery,
}

/// Client for a dedicated conversion endpoint: `POST {base}/enhance`.
pub struct HttpEnhancementService {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpEnhancementService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }
}

#[async_trait]
impl EnhancementService for HttpEnhancementService {
    async fn enhance(&self, text: &str) -> Result<StructuredQuery, EnhanceError> {
        let url = format!("{}/enhance", self.base_url);
        debug!(chars = text.len(), "POST {}", url);

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&json!({ "text": text }))
            .send()
            .await?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EnhanceError::Api { status, body });
        }

        let body = response.text().await?;
        let parsed: EnhanceResponse =
            serde_json::from_str(&body).map_err(|e| EnhanceError::InvalidQuery {
                reason: e.to_string(),
                raw_response: body.clone(),
            })?;
        check_depth(&parsed.structured_query, &body)?;
        Ok(parsed.structured_query)
    }
}

/// Pick the enhancement backend: the dedicated endpoint when `ENHANCE_URL`
/// is set, otherwise the configured LLM provider.
pub fn create_enhancer(config: &Config) -> Result<Arc<dyn EnhancementService>, EnhanceError> {
    if let Some(url) = &config.enhance.url {
        info!(url = %url, "using HTTP enhancement service");
        return Ok(Arc::new(HttpEnhancementService::new(
            url.clone(),
            Duration::from_secs(config.api.timeout_secs),
        )));
    }

    let provider = create_provider(&config.llm)?;
    info!(
        provider = %config.llm.provider,
        model = %config.llm.openai_model,
        "using LLM query enhancer"
    );
    Ok(Arc::new(
        LlmQueryEnhancer::new(Arc::from(provider))
            .with_sampling(config.llm.temperature, config.llm.max_tokens),
    ))
}
