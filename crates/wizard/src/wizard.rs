//! The wizard facade: the single writer of the draft.

use std::sync::Arc;

use signal_core::config::{Config, WizardConfig};
use signal_llm::{create_enhancer, EnhancementService};
use signal_query::schema::{PersistedSignal, StructuredQuery, MAX_QUERY_DEPTH};
use signal_query::validation::validate_payload;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::client::{HttpSignalApi, SignalApi};
use crate::controllers::{
    AlertMethodsStep, AnomalyStep, CommitError, EntitiesStep, FiltersStep, NotificationStep,
    QueryStep, ReviewStep, StepContext, StepController,
};
use crate::error::WizardError;
use crate::pipeline::{EnhancementOutcome, EnhancementRequest, QueryEnhancementPipeline};
use crate::reconstruct::reconstruct;
use crate::steps::{check_step, first_failure, WizardStep};
use crate::store::{SignalDraft, SignalDraftStore, SubscriptionId};
use crate::submit::to_payload;
use crate::suggest::{SuggestionBatch, SuggestionDebouncer, SuggestionService};

pub struct Wizard {
    store: SignalDraftStore,
    current: WizardStep,
    pipeline: QueryEnhancementPipeline,
    suggestions: SuggestionDebouncer,
    suggestion_rx: mpsc::UnboundedReceiver<SuggestionBatch>,
}

impl Wizard {
    /// A wizard on an empty draft, positioned on the query step.
    pub fn new(
        config: &WizardConfig,
        enhancer: Arc<dyn EnhancementService>,
        suggester: Arc<dyn SuggestionService>,
    ) -> Self {
        let max_depth = (config.max_query_depth as usize).min(MAX_QUERY_DEPTH);
        let (suggestions, suggestion_rx) =
            SuggestionDebouncer::new(suggester, config.suggest_debounce());
        Self {
            store: SignalDraftStore::new(),
            current: WizardStep::Query,
            pipeline: QueryEnhancementPipeline::new(enhancer, max_depth),
            suggestions,
            suggestion_rx,
        }
    }

    /// A wizard wired to the configured enhancement backend, with entity
    /// suggestions served by the signal API.
    pub fn from_config(config: &Config) -> Result<Self, WizardError> {
        config.log_summary();
        let enhancer = create_enhancer(config).map_err(WizardError::Enhancement)?;
        let suggester = Arc::new(HttpSignalApi::from_config(&config.api));
        Ok(Self::new(&config.wizard, enhancer, suggester))
    }

    // ── Reads ─────────────────────────────────────────────────

    pub fn draft(&self) -> &SignalDraft {
        self.store.get()
    }

    pub fn current_step(&self) -> WizardStep {
        self.current
    }

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&SignalDraft) + Send + 'static,
    ) -> SubscriptionId {
        self.store.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    // ── Controllers ───────────────────────────────────────────

    fn context(&mut self) -> StepContext<'_> {
        StepContext::new(&mut self.store, &mut self.current)
    }

    pub fn query(&mut self) -> QueryStep<'_> {
        QueryStep::new(self.context())
    }

    pub fn entities(&mut self) -> EntitiesStep<'_> {
        EntitiesStep::new(self.context())
    }

    pub fn filters(&mut self) -> FiltersStep<'_> {
        FiltersStep::new(self.context())
    }

    pub fn anomaly(&mut self) -> AnomalyStep<'_> {
        AnomalyStep::new(self.context())
    }

    pub fn notification(&mut self) -> NotificationStep<'_> {
        NotificationStep::new(self.context())
    }

    pub fn alert_methods(&mut self) -> AlertMethodsStep<'_> {
        AlertMethodsStep::new(self.context())
    }

    pub fn review(&mut self) -> ReviewStep<'_> {
        ReviewStep::new(self.context())
    }

    /// The controller for any step, for callers that treat steps uniformly.
    pub fn controller(&mut self, step: WizardStep) -> Box<dyn StepController + '_> {
        match step {
            WizardStep::Query => Box::new(self.query()),
            WizardStep::Entities => Box::new(self.entities()),
            WizardStep::Filters => Box::new(self.filters()),
            WizardStep::Anomaly => Box::new(self.anomaly()),
            WizardStep::NotificationPolicy => Box::new(self.notification()),
            WizardStep::AlertMethods => Box::new(self.alert_methods()),
            WizardStep::Review => Box::new(self.review()),
        }
    }

    // ── Navigation ────────────────────────────────────────────

    /// "Continue": commit the current step. When the step is blocked its
    /// error is attached to the draft and nothing else changes.
    pub fn advance(&mut self) -> Result<WizardStep, CommitError> {
        let step = self.current;
        let result = self.controller(step).commit();
        if let Err(CommitError::Blocked(kind)) = &result {
            debug!(step = %step, error = ?kind, "continue blocked");
            self.store.flag(step, *kind);
        }
        result
    }

    /// "Back": always allowed, never validates.
    pub fn back(&mut self) -> WizardStep {
        if let Some(previous) = self.current.previous(self.store.get()) {
            self.current = previous;
        }
        self.current
    }

    /// Jump to `target`. Going back is free; going forward requires every
    /// step from the current one up to `target` to pass its check, and stops
    /// at the first one that does not.
    pub fn go_to(&mut self, target: WizardStep) -> Result<WizardStep, CommitError> {
        let target = target.resolve(self.store.get());
        if target <= self.current {
            self.current = target;
            return Ok(target);
        }
        while self.current < target {
            let step = self.current;
            if let Some(kind) = check_step(step, self.store.get()) {
                self.store.flag(step, kind);
                return Err(CommitError::Blocked(kind));
            }
            self.current = step.next(self.store.get()).unwrap_or(WizardStep::Review);
        }
        Ok(self.current)
    }

    // ── Enhancement ───────────────────────────────────────────

    /// Enhance the current query text and write the result into the draft.
    pub async fn enhance(&mut self) -> Result<StructuredQuery, WizardError> {
        let request = self.prepare_enhancement()?;
        let outcome = request.send().await;
        self.apply_enhancement(outcome)
    }

    /// First half of [`Wizard::enhance`] for callers that keep editing while
    /// the request is in flight. Supersedes any earlier request.
    pub fn prepare_enhancement(&mut self) -> Result<EnhancementRequest, WizardError> {
        self.pipeline.prepare(&mut self.store)
    }

    pub fn apply_enhancement(
        &mut self,
        outcome: EnhancementOutcome,
    ) -> Result<StructuredQuery, WizardError> {
        self.pipeline.apply(&mut self.store, outcome)
    }

    // ── Entity suggestions ────────────────────────────────────

    /// Feed a keystroke of the entity search box. Requests are debounced.
    /// Clearing the box also clears the shown suggestions.
    pub fn search_entities(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text.trim().is_empty() && !self.store.get().entity_suggestions.is_empty() {
            self.store.patch(|d| d.entity_suggestions.clear());
        }
        let title = self.store.get().name.clone();
        self.suggestions.input(text, title);
    }

    /// Wait for the next finished suggestion request.
    pub async fn recv_suggestions(&mut self) -> Option<SuggestionBatch> {
        self.suggestion_rx.recv().await
    }

    /// Store a suggestion batch. Returns `false` when the batch was
    /// superseded or failed; the draft is then left as it was.
    pub fn apply_suggestions(&mut self, batch: SuggestionBatch) -> bool {
        if !self.suggestions.is_current(batch.token) {
            debug!(token = %batch.token, "discarding stale suggestions");
            return false;
        }
        match batch.result {
            Ok(entities) => {
                debug!(token = %batch.token, count = entities.len(), "suggestions applied");
                self.store.patch(|d| d.entity_suggestions = entities);
                true
            }
            Err(_) => false,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Load a saved signal for editing and open it at `start_step`.
    /// Requests still in flight for the previous draft become stale.
    pub fn edit(&mut self, signal: &PersistedSignal, start_step: WizardStep) -> WizardStep {
        self.invalidate_requests();
        let reconstruction = reconstruct(signal, start_step);
        self.store.replace(reconstruction.draft);
        self.current = reconstruction.start_step;
        self.current
    }

    /// Fetch a signal by id and [`edit`](Self::edit) it.
    pub async fn open(
        &mut self,
        api: &dyn SignalApi,
        signal_id: &str,
        start_step: WizardStep,
    ) -> Result<WizardStep, WizardError> {
        let signal = api.fetch(signal_id).await?;
        Ok(self.edit(&signal, start_step))
    }

    /// Leave the wizard: late responses are ignored and the draft is reset.
    pub fn cancel(&mut self) {
        info!(draft = %self.store.get().draft_id, "wizard cancelled");
        self.invalidate_requests();
        self.store.reset();
        self.current = WizardStep::Query;
    }

    /// Save the signal: create it, or update it in edit mode. On success the
    /// draft is reset and the signal id returned.
    pub async fn submit(&mut self, api: &dyn SignalApi) -> Result<String, WizardError> {
        if let Some((step, kind)) = first_failure(self.store.get()) {
            self.store.flag(step, kind);
            return Err(WizardError::Blocked { step, kind });
        }

        let payload = to_payload(self.store.get());
        let checked = validate_payload(&payload);
        for warning in &checked.warnings {
            warn!(path = %warning.path, "{}", warning.message);
        }
        if !checked.valid {
            return Err(WizardError::Invalid(checked.errors));
        }

        let id = match self.store.get().signal_id.clone() {
            Some(id) => {
                api.update(&id, &payload).await?;
                id
            }
            None => api.create(&payload).await?,
        };
        info!(signal = %id, draft = %self.store.get().draft_id, "signal saved");

        self.invalidate_requests();
        self.store.reset();
        self.current = WizardStep::Query;
        Ok(id)
    }

    fn invalidate_requests(&mut self) {
        self.pipeline.invalidate();
        self.suggestions.cancel();
    }
}
