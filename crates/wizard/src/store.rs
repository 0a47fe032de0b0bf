//! The in-progress signal and its container.

use std::collections::BTreeMap;

use serde::Serialize;
use signal_core::{EntityRef, EntitySet, ErrorKind};
use signal_query::schema::{
    AnomalyConfig, DeliveryMethods, FilterState, NotificationPolicy, SchedulePolicy,
    SearchScope, SelectionPolicy, StructuredQuery,
};
use tracing::{debug, trace};
use uuid::Uuid;

use crate::steps::{recheck, WizardStep};

/// Everything the wizard knows about the signal being created or edited.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalDraft {
    /// Identifies this draft in logs; a fresh id is issued on every reset.
    pub draft_id: Uuid,
    pub name: String,
    pub raw_query: String,
    pub scope: SearchScope,
    /// Set only by a successful enhancement (or loaded with a saved signal).
    pub enhanced_query: Option<StructuredQuery>,
    /// The trimmed query text `enhanced_query` was built from.
    pub enhanced_from: Option<String>,
    pub entities: EntitySet,
    /// Latest suggestion batch for the entity type-ahead.
    pub entity_suggestions: Vec<EntityRef>,
    pub filters: FilterState,
    pub anomaly_config: Option<AnomalyConfig>,
    pub notification_policy: NotificationPolicy,
    pub selection_policy: SelectionPolicy,
    pub schedule_policy: Option<SchedulePolicy>,
    pub delivery_methods: DeliveryMethods,
    pub is_edit_mode: bool,
    pub signal_id: Option<String>,
    /// Filters as they were when editing started.
    pub original_filters: Option<FilterState>,
    pub validation_errors: BTreeMap<WizardStep, ErrorKind>,
}

impl Default for SignalDraft {
    fn default() -> Self {
        Self {
            draft_id: Uuid::new_v4(),
            name: String::new(),
            raw_query: String::new(),
            scope: SearchScope::All,
            enhanced_query: None,
            enhanced_from: None,
            entities: EntitySet::new(),
            entity_suggestions: Vec::new(),
            filters: FilterState::default(),
            anomaly_config: None,
            notification_policy: NotificationPolicy::Immediate,
            selection_policy: SelectionPolicy::AllMatches,
            schedule_policy: None,
            delivery_methods: DeliveryMethods::new(),
            is_edit_mode: false,
            signal_id: None,
            original_filters: None,
            validation_errors: BTreeMap::new(),
        }
    }
}

impl SignalDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error_for(&self, step: WizardStep) -> Option<ErrorKind> {
        self.validation_errors.get(&step).copied()
    }

    /// The enhanced query, but only while it still belongs to the current
    /// query text. After the text is edited it is `None` until the next
    /// successful enhancement.
    pub fn current_enhanced_query(&self) -> Option<&StructuredQuery> {
        match (&self.enhanced_query, &self.enhanced_from) {
            (Some(query), Some(source)) if source == self.raw_query.trim() => Some(query),
            _ => None,
        }
    }

    /// Whether the filters differ from the ones loaded for editing.
    /// Always false outside edit mode.
    pub fn filters_changed(&self) -> bool {
        self.original_filters
            .as_ref()
            .is_some_and(|original| *original != self.filters)
    }
}

// ── Store ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&SignalDraft) + Send>;

/// Holds the draft and notifies listeners after every write.
///
/// Reads are public. Writes are crate-private so that every mutation goes
/// through a step controller or the wizard itself. Writes are synchronous
/// and applied in call order; `&mut self` rules out interleaving.
pub struct SignalDraftStore {
    draft: SignalDraft,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl Default for SignalDraftStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalDraftStore {
    pub fn new() -> Self {
        Self::with_draft(SignalDraft::default())
    }

    pub(crate) fn with_draft(draft: SignalDraft) -> Self {
        Self {
            draft,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn get(&self) -> &SignalDraft {
        &self.draft
    }

    /// Register a listener called with the draft after each write.
    pub fn subscribe(&mut self, listener: impl FnMut(&SignalDraft) + Send + 'static) -> SubscriptionId {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    /// Apply a mutation, drop errors whose condition it resolved, then notify.
    pub(crate) fn patch(&mut self, mutate: impl FnOnce(&mut SignalDraft)) {
        mutate(&mut self.draft);
        self.recheck_errors();
        self.notify();
    }

    /// Replace the whole draft, e.g. with a reconstructed one.
    pub(crate) fn replace(&mut self, draft: SignalDraft) {
        self.draft = draft;
        self.notify();
    }

    /// Back to an empty creation-mode draft. Listeners stay registered.
    pub(crate) fn reset(&mut self) {
        debug!(draft = %self.draft.draft_id, "draft reset");
        self.draft = SignalDraft::default();
        self.notify();
    }

    /// Attach `kind` to `step`. A blocking kind replaces a notice; a notice
    /// never hides a blocking kind already attached.
    pub(crate) fn flag(&mut self, step: WizardStep, kind: ErrorKind) {
        if let Some(existing) = self.draft.validation_errors.get(&step) {
            if existing.is_blocking() && !kind.is_blocking() {
                return;
            }
        }
        debug!(step = %step, error = ?kind, "validation error attached");
        self.draft.validation_errors.insert(step, kind);
        self.notify();
    }

    pub(crate) fn clear(&mut self, step: WizardStep, kind: ErrorKind) {
        if self.draft.validation_errors.get(&step) == Some(&kind) {
            self.draft.validation_errors.remove(&step);
            self.notify();
        }
    }

    fn recheck_errors(&mut self) {
        let attached: Vec<(WizardStep, ErrorKind)> = self
            .draft
            .validation_errors
            .iter()
            .map(|(s, k)| (*s, *k))
            .collect();
        for (step, kind) in attached {
            match recheck(step, kind, &self.draft) {
                Some(current) if current == kind => {}
                Some(current) => {
                    trace!(step = %step, from = ?kind, to = ?current, "validation error changed");
                    self.draft.validation_errors.insert(step, current);
                }
                None => {
                    trace!(step = %step, error = ?kind, "validation error resolved");
                    self.draft.validation_errors.remove(&step);
                }
            }
        }
    }

    fn notify(&mut self) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.draft);
        }
    }
}
