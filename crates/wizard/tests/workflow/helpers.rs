use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tokio::time::Instant;

use signal_core::config::WizardConfig;
use signal_core::{EntityKind, EntityRef};
use signal_llm::{EnhanceError, EnhancementService};
use signal_query::schema::{
    ClauseOperator, PersistedSignal, QueryNode, SignalPayload, StructuredQuery,
};
use signal_wizard::{ApiError, SignalApi, SuggestionService, Wizard};

// ── Enhancement ───────────────────────────────────────────────

/// Answers every request with a query for the text, or fails while
/// `failing` is set.
#[derive(Default)]
pub struct MockEnhancer {
    pub calls: AtomicUsize,
    pub failing: std::sync::atomic::AtomicBool,
}

impl MockEnhancer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub fn text_query(text: &str) -> StructuredQuery {
    StructuredQuery::and(vec![QueryNode::clause(
        "text",
        ClauseOperator::Eq,
        json!(text),
    )])
}

#[async_trait]
impl EnhancementService for MockEnhancer {
    async fn enhance(&self, text: &str) -> Result<StructuredQuery, EnhanceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(EnhanceError::Api {
                status: 503,
                body: "unavailable".into(),
            });
        }
        Ok(text_query(text))
    }
}

/// Always returns the same tree.
pub struct FixedEnhancer(pub StructuredQuery);

#[async_trait]
impl EnhancementService for FixedEnhancer {
    async fn enhance(&self, _text: &str) -> Result<StructuredQuery, EnhanceError> {
        Ok(self.0.clone())
    }
}

// ── Suggestions ───────────────────────────────────────────────

/// Records when each request arrives. Queries listed in `slow` take that
/// long to answer.
#[derive(Default)]
pub struct MockSuggester {
    pub requests: Mutex<Vec<(String, Instant)>>,
    pub slow: HashMap<String, Duration>,
}

impl MockSuggester {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_slow(query: &str, delay: Duration) -> Arc<Self> {
        let mut slow = HashMap::new();
        slow.insert(query.to_string(), delay);
        Arc::new(Self {
            slow,
            ..Self::default()
        })
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl SuggestionService for MockSuggester {
    async fn suggest(&self, query: &str, _title: &str) -> Result<Vec<EntityRef>, ApiError> {
        self.requests
            .lock()
            .unwrap()
            .push((query.to_string(), Instant::now()));
        if let Some(delay) = self.slow.get(query) {
            tokio::time::sleep(*delay).await;
        }
        Ok(vec![EntityRef::new(
            format!("id-{query}"),
            EntityKind::Company,
            query.to_uppercase(),
        )])
    }
}

// ── Signal API ────────────────────────────────────────────────

/// In-memory signal store.
#[derive(Default)]
pub struct MockSignalApi {
    pub signals: Mutex<HashMap<String, PersistedSignal>>,
    pub creates: AtomicUsize,
    pub updates: AtomicUsize,
}

impl MockSignalApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, signal: PersistedSignal) {
        self.signals
            .lock()
            .unwrap()
            .insert(signal.id.clone(), signal);
    }

    /// Store a payload the way the service would: through its JSON body.
    fn store_payload(&self, id: &str, payload: &SignalPayload) {
        let mut body = serde_json::to_value(payload).unwrap();
        body["id"] = json!(id);
        self.insert(PersistedSignal::from_json(&body.to_string()).unwrap());
    }

    pub fn get(&self, id: &str) -> Option<PersistedSignal> {
        self.signals.lock().unwrap().get(id).cloned()
    }
}

#[async_trait]
impl SignalApi for MockSignalApi {
    async fn create(&self, payload: &SignalPayload) -> Result<String, ApiError> {
        let n = self.creates.fetch_add(1, Ordering::SeqCst) + 1;
        let id = format!("sig-{n}");
        self.store_payload(&id, payload);
        Ok(id)
    }

    async fn update(&self, id: &str, payload: &SignalPayload) -> Result<(), ApiError> {
        if self.get(id).is_none() {
            return Err(ApiError::Status {
                status: 404,
                body: format!("no signal {id}"),
            });
        }
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.store_payload(id, payload);
        Ok(())
    }

    async fn fetch(&self, id: &str) -> Result<PersistedSignal, ApiError> {
        self.get(id).ok_or_else(|| ApiError::Status {
            status: 404,
            body: format!("no signal {id}"),
        })
    }
}

// ── Builders ──────────────────────────────────────────────────

pub fn wizard_with(enhancer: Arc<dyn EnhancementService>) -> Wizard {
    signal_core::logging::init_test_tracing();
    Wizard::new(&WizardConfig::default(), enhancer, MockSuggester::new())
}

pub fn wizard() -> Wizard {
    wizard_with(MockEnhancer::new())
}

pub fn persisted(body: serde_json::Value) -> PersistedSignal {
    serde_json::from_value(body).expect("valid persisted signal")
}
