//! Draft to persistence body.

use signal_query::mapper::to_structured_query;
use signal_query::schema::SignalPayload;

use crate::store::SignalDraft;

const DERIVED_NAME_CHARS: usize = 60;

/// Build the `POST signal` / `PUT signal/{id}` body.
///
/// An enhanced query built from different text than the current query is
/// left out. Settings of steps the current policies skip (anomaly without top-N, a
/// schedule with immediate delivery) are left out.
pub fn to_payload(draft: &SignalDraft) -> SignalPayload {
    let name = match draft.name.trim() {
        "" => derive_name(&draft.raw_query),
        name => name.to_string(),
    };

    SignalPayload {
        name,
        raw_query: draft.raw_query.trim().to_string(),
        scope: draft.scope.clone(),
        query: draft.current_enhanced_query().cloned(),
        filters: to_structured_query(&draft.filters),
        entities: draft.entities.clone(),
        anomaly: draft
            .anomaly_config
            .clone()
            .filter(|_| draft.selection_policy.requires_volume_data()),
        notification_policy: draft.notification_policy,
        selection_policy: draft.selection_policy.clone(),
        schedule_policy: draft
            .schedule_policy
            .clone()
            .filter(|_| draft.notification_policy.requires_schedule()),
        delivery_methods: draft.delivery_methods.clone(),
    }
}

/// Name for an unnamed signal: the query text, cut at a word boundary.
pub fn derive_name(raw_query: &str) -> String {
    let text = raw_query.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.chars().count() <= DERIVED_NAME_CHARS {
        return text;
    }
    let cut: String = text.chars().take(DERIVED_NAME_CHARS).collect();
    let trimmed = match cut.rfind(' ') {
        Some(pos) if pos > 0 => &cut[..pos],
        _ => cut.as_str(),
    };
    format!("{}…", trimmed)
}
