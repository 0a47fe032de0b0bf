//! Debounced entity suggestions.
//!
//! Keystrokes restart a timer; only when the input has been quiet for the
//! configured delay is a request dispatched. Dispatched requests are never
//! cancelled. Each one carries a [`Generation`] and its result is delivered
//! on a channel; the receiver applies it only if no newer request has been
//! issued since.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use signal_core::EntityRef;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::client::ApiError;
use crate::generation::{Generation, RequestGenerations};

/// `GET suggest?query&title`.
#[async_trait]
pub trait SuggestionService: Send + Sync {
    async fn suggest(&self, query: &str, title: &str) -> Result<Vec<EntityRef>, ApiError>;
}

/// Result of one dispatched suggestion request.
#[derive(Debug)]
pub struct SuggestionBatch {
    pub token: Generation,
    pub query: String,
    pub result: Result<Vec<EntityRef>, ApiError>,
}

pub struct SuggestionDebouncer {
    service: Arc<dyn SuggestionService>,
    delay: Duration,
    generations: RequestGenerations,
    pending: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<SuggestionBatch>,
}

impl SuggestionDebouncer {
    pub fn new(
        service: Arc<dyn SuggestionService>,
        delay: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<SuggestionBatch>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let debouncer = Self {
            service,
            delay,
            generations: RequestGenerations::new(),
            pending: None,
            tx,
        };
        (debouncer, rx)
    }

    /// Record a keystroke. Must be called inside a tokio runtime. Empty input
    /// sends nothing and makes every dispatched request stale.
    pub fn input(&mut self, query: impl Into<String>, title: impl Into<String>) {
        self.abort_pending();

        let query = query.into();
        let title = title.into();
        if query.trim().is_empty() {
            // Results for what was typed before the box was cleared are stale.
            self.generations.invalidate();
            return;
        }

        let service = self.service.clone();
        let generations = self.generations.clone();
        let tx = self.tx.clone();
        let delay = self.delay;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let token = generations.issue();
            debug!(%token, query = %query, "dispatching suggestion request");
            // The request runs in its own task so that aborting this timer
            // never cancels a dispatched request.
            tokio::spawn(async move {
                let result = service.suggest(&query, &title).await;
                if let Err(e) = &result {
                    warn!(%token, error = %e, "suggestion request failed");
                }
                // The receiver is gone once the wizard is dropped.
                let _ = tx.send(SuggestionBatch {
                    token,
                    query,
                    result,
                });
            });
        }));
    }

    /// Whether `token` belongs to the most recently dispatched request.
    pub fn is_current(&self, token: Generation) -> bool {
        self.generations.is_current(token)
    }

    /// Drop the pending timer and make every dispatched request stale.
    pub fn cancel(&mut self) {
        self.abort_pending();
        self.generations.invalidate();
    }

    fn abort_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for SuggestionDebouncer {
    fn drop(&mut self) {
        self.abort_pending();
    }
}
