//! Rebuild a draft from a saved signal so it can be edited.

use signal_core::ErrorKind;
use signal_query::mapper::to_filter_state;
use signal_query::schema::PersistedSignal;
use tracing::{info, warn};

use crate::steps::{check_step, WizardStep};
use crate::store::SignalDraft;

/// A draft ready for editing and the step the wizard opens on.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconstruction {
    pub draft: SignalDraft,
    pub start_step: WizardStep,
}

/// Map a saved signal back into wizard state.
///
/// Never fails. Clauses without a filter field are kept in
/// `filters.opaque_clauses` and flagged with the `PartialReconstruction`
/// notice on the filters step. A policy that needs a schedule but has none
/// is flagged `ScheduleIncomplete`. A `start_step` the signal's selection
/// policy skips resolves to the next step that exists.
pub fn reconstruct(signal: &PersistedSignal, start_step: WizardStep) -> Reconstruction {
    let saved = &signal.signal;
    let filters = to_filter_state(&saved.filters);

    let mut draft = SignalDraft {
        name: saved.name.clone(),
        raw_query: saved.raw_query.clone(),
        scope: saved.scope.clone(),
        enhanced_query: saved.query.clone(),
        enhanced_from: saved
            .query
            .as_ref()
            .map(|_| saved.raw_query.trim().to_string()),
        entities: saved.entities.clone(),
        original_filters: Some(filters.clone()),
        filters,
        anomaly_config: saved.anomaly.clone(),
        notification_policy: saved.notification_policy,
        selection_policy: saved.selection_policy.clone(),
        schedule_policy: saved.schedule_policy.clone(),
        delivery_methods: saved.delivery_methods.clone(),
        is_edit_mode: true,
        signal_id: Some(signal.id.clone()),
        ..SignalDraft::default()
    };

    let opaque = draft.filters.opaque_clauses.len();
    if opaque > 0 {
        warn!(
            signal = %signal.id,
            opaque,
            "saved filters contain clauses that cannot be displayed"
        );
        draft
            .validation_errors
            .insert(WizardStep::Filters, ErrorKind::PartialReconstruction);
    }

    if let Some(kind) = check_step(WizardStep::NotificationPolicy, &draft) {
        warn!(
            signal = %signal.id,
            policy = ?draft.notification_policy,
            "saved notification policy is incomplete"
        );
        draft
            .validation_errors
            .insert(WizardStep::NotificationPolicy, kind);
    }

    let start_step = start_step.resolve(&draft);
    info!(
        signal = %signal.id,
        draft = %draft.draft_id,
        start = %start_step,
        "signal loaded for editing"
    );

    Reconstruction { draft, start_step }
}
