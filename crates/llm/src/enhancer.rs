//! Prompt-based query enhancement through an [`LlmProvider`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use signal_query::schema::{StructuredQuery, MAX_QUERY_DEPTH};

use crate::provider::{LlmProvider, Message};
use crate::service::{check_depth, EnhanceError, EnhancementService};

const SYSTEM_PROMPT: &str = include_str!("../prompts/enhance-system.md");

/// Fields the filter step can display; listed in the prompt so the model
/// prefers them over inventing new ones.
const PREFERRED_FIELDS: &[&str] = &["text", "source", "label", "location", "published_at"];

pub struct LlmQueryEnhancer {
    provider: Arc<dyn LlmProvider>,
    system_prompt: String,
    temperature: f32,
    max_tokens: u32,
}

impl LlmQueryEnhancer {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        let system_prompt = SYSTEM_PROMPT
            .replace("<<<max_depth>>>", &MAX_QUERY_DEPTH.to_string())
            .replace("<<<fields>>>", &PREFERRED_FIELDS.join(", "));
        Self {
            provider,
            system_prompt,
            temperature: 0.0,
            max_tokens: 1024,
        }
    }

    pub fn with_sampling(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }
}

#[async_trait]
impl EnhancementService for LlmQueryEnhancer {
    async fn enhance(&self, text: &str) -> Result<StructuredQuery, EnhanceError> {
        let messages = vec![
            Message::system(self.system_prompt.clone()),
            Message::user(text),
        ];

        let response = self
            .provider
            .complete(messages, self.temperature, self.max_tokens)
            .await?;
        debug!(chars = response.len(), "enhancer response received");

        let json_str = extract_json(&response);
        let query: StructuredQuery = serde_json::from_str(json_str).map_err(|e| {
            warn!(error = %e, "enhancer returned malformed query JSON");
            EnhanceError::InvalidQuery {
                reason: e.to_string(),
                raw_response: response.clone(),
            }
        })?;
        check_depth(&query, &response)?;
        Ok(query)
    }
}

/// Extract JSON from an LLM response that may wrap it in a markdown code fence
/// or surround it with prose.
fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();

    if let Some(start) = trimmed.find("```json") {
        let json_start = start + 7;
        if let Some(end) = trimmed[json_start..].find("```") {
            return trimmed[json_start..json_start + end].trim();
        }
    }

    if let Some(start) = trimmed.find("```") {
        let after_tick = &trimmed[start + 3..];
        let content_start = after_tick.find('\n').map_or(0, |n| n + 1);
        if let Some(end) = after_tick[content_start..].find("```") {
            return after_tick[content_start..content_start + end].trim();
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            return &trimmed[start..=end];
        }
    }

    trimmed
}
