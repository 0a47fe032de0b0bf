//! Free text to enhanced query.
//!
//! `prepare` validates the text and takes a request token, `send` talks to
//! the [`EnhancementService`] without touching the draft, and `apply` writes
//! the result back only if no newer request was prepared in between.

use std::sync::Arc;

use signal_core::ErrorKind;
use signal_llm::{EnhanceError, EnhancementService};
use signal_query::schema::StructuredQuery;
use tracing::{debug, info, warn};

use crate::error::WizardError;
use crate::generation::{Generation, RequestGenerations};
use crate::steps::WizardStep;
use crate::store::SignalDraftStore;

pub struct QueryEnhancementPipeline {
    service: Arc<dyn EnhancementService>,
    generations: RequestGenerations,
    max_depth: usize,
}

/// An enhancement ready to be sent. Owns everything it needs, so the draft
/// stays free for other edits while it is in flight.
pub struct EnhancementRequest {
    token: Generation,
    text: String,
    service: Arc<dyn EnhancementService>,
}

impl EnhancementRequest {
    pub fn token(&self) -> Generation {
        self.token
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub async fn send(self) -> EnhancementOutcome {
        let result = self.service.enhance(&self.text).await;
        EnhancementOutcome {
            token: self.token,
            text: self.text,
            result,
        }
    }
}

/// A finished enhancement, not yet applied to the draft.
#[derive(Debug)]
pub struct EnhancementOutcome {
    pub token: Generation,
    /// The text that was sent.
    pub text: String,
    pub result: Result<StructuredQuery, EnhanceError>,
}

impl QueryEnhancementPipeline {
    pub fn new(service: Arc<dyn EnhancementService>, max_depth: usize) -> Self {
        Self {
            service,
            generations: RequestGenerations::new(),
            max_depth,
        }
    }

    /// Check the draft's query text and take a token, superseding any request
    /// still in flight. Empty text is rejected before any network call.
    pub(crate) fn prepare(
        &self,
        store: &mut SignalDraftStore,
    ) -> Result<EnhancementRequest, WizardError> {
        let text = store.get().raw_query.trim().to_string();
        if text.is_empty() {
            store.flag(WizardStep::Query, ErrorKind::EmptyQuery);
            return Err(WizardError::Rejected(ErrorKind::EmptyQuery));
        }

        let token = self.generations.issue();
        debug!(%token, chars = text.len(), "enhancement prepared");
        Ok(EnhancementRequest {
            token,
            text,
            service: self.service.clone(),
        })
    }

    /// Write a finished enhancement into the draft.
    ///
    /// A superseded outcome is dropped with [`WizardError::Stale`] and the
    /// draft is not touched. A failure flags `EnhancementFailed` and leaves
    /// the draft's enhancement as it was; an enhancement of older text is
    /// never promoted to the current text.
    pub(crate) fn apply(
        &self,
        store: &mut SignalDraftStore,
        outcome: EnhancementOutcome,
    ) -> Result<StructuredQuery, WizardError> {
        if !self.generations.is_current(outcome.token) {
            debug!(token = %outcome.token, "discarding stale enhancement");
            return Err(WizardError::Stale);
        }

        let result = outcome.result.and_then(|query| {
            if query.exceeds_depth(self.max_depth) {
                Err(EnhanceError::InvalidQuery {
                    reason: format!("nesting depth {} over limit {}", query.depth(), self.max_depth),
                    raw_response: query.to_string(),
                })
            } else {
                Ok(query)
            }
        });

        match result {
            Ok(query) => {
                let applied = query.clone();
                let source = outcome.text;
                store.patch(|d| {
                    d.enhanced_query = Some(applied);
                    d.enhanced_from = Some(source);
                });
                store.clear(WizardStep::Query, ErrorKind::EnhancementFailed);
                info!(token = %outcome.token, depth = query.depth(), "enhanced query applied");
                Ok(query)
            }
            Err(e) => {
                warn!(token = %outcome.token, error = %e, "query enhancement failed");
                store.flag(WizardStep::Query, ErrorKind::EnhancementFailed);
                Err(WizardError::Enhancement(e))
            }
        }
    }

    /// Make every in-flight request stale.
    pub fn invalidate(&self) {
        self.generations.invalidate();
    }
}
