//! Wizard steps, their transition table and their checks.

use std::fmt;

use serde::{Deserialize, Serialize};
use signal_core::ErrorKind;
use signal_query::schema::SearchScope;

use crate::store::SignalDraft;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WizardStep {
    Query,
    Entities,
    Filters,
    Anomaly,
    NotificationPolicy,
    AlertMethods,
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 7] = [
        WizardStep::Query,
        WizardStep::Entities,
        WizardStep::Filters,
        WizardStep::Anomaly,
        WizardStep::NotificationPolicy,
        WizardStep::AlertMethods,
        WizardStep::Review,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// The anomaly step only exists for selection policies that rank by volume.
    pub fn is_reachable(self, draft: &SignalDraft) -> bool {
        match self {
            WizardStep::Anomaly => draft.selection_policy.requires_volume_data(),
            _ => true,
        }
    }

    /// The step "continue" leads to, or `None` from the review step.
    pub fn next(self, draft: &SignalDraft) -> Option<WizardStep> {
        Self::ALL[self.index() + 1..]
            .iter()
            .copied()
            .find(|s| s.is_reachable(draft))
    }

    /// The step "back" leads to, or `None` from the query step.
    pub fn previous(self, draft: &SignalDraft) -> Option<WizardStep> {
        Self::ALL[..self.index()]
            .iter()
            .rev()
            .copied()
            .find(|s| s.is_reachable(draft))
    }

    /// This step if reachable, otherwise the next reachable one.
    pub fn resolve(self, draft: &SignalDraft) -> WizardStep {
        if self.is_reachable(draft) {
            self
        } else {
            self.next(draft).unwrap_or(WizardStep::Review)
        }
    }

    /// Reachable steps in wizard order.
    pub fn reachable(draft: &SignalDraft) -> impl Iterator<Item = WizardStep> + '_ {
        Self::ALL.into_iter().filter(move |s| s.is_reachable(draft))
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WizardStep::Query => "QUERY",
            WizardStep::Entities => "ENTITIES",
            WizardStep::Filters => "FILTERS",
            WizardStep::Anomaly => "ANOMALY",
            WizardStep::NotificationPolicy => "NOTIFICATION_POLICY",
            WizardStep::AlertMethods => "ALERT_METHODS",
            WizardStep::Review => "REVIEW",
        };
        write!(f, "{name}")
    }
}

// ── Checks ────────────────────────────────────────────────────

/// The blocking condition a step currently has, if any.
///
/// Pure function of the draft. The review step reports the first failure
/// of any reachable step before it.
pub fn check_step(step: WizardStep, draft: &SignalDraft) -> Option<ErrorKind> {
    match step {
        WizardStep::Query => check_query(draft),
        WizardStep::Entities => None,
        WizardStep::Filters => {
            (!draft.filters.date_window.is_valid()).then_some(ErrorKind::InvalidDateWindow)
        }
        WizardStep::Anomaly => match &draft.anomaly_config {
            Some(config) if config.is_valid() => None,
            _ => Some(ErrorKind::AnomalyConfigInvalid),
        },
        WizardStep::NotificationPolicy => {
            let complete = draft
                .schedule_policy
                .as_ref()
                .is_some_and(|s| s.is_complete());
            (draft.notification_policy.requires_schedule() && !complete)
                .then_some(ErrorKind::ScheduleIncomplete)
        }
        WizardStep::AlertMethods => draft
            .delivery_methods
            .unconfigured()
            .next()
            .map(|_| ErrorKind::NoDeliveryMethodSelected),
        WizardStep::Review => first_failure(draft).map(|(_, kind)| kind),
    }
}

fn check_query(draft: &SignalDraft) -> Option<ErrorKind> {
    if !draft.raw_query.trim().is_empty() {
        return None;
    }
    match draft.scope {
        SearchScope::All => Some(ErrorKind::QueryRequired),
        SearchScope::Template { .. } => Some(ErrorKind::QueryRequiredForWorkflow),
    }
}

/// First reachable step (before review) whose check fails.
pub fn first_failure(draft: &SignalDraft) -> Option<(WizardStep, ErrorKind)> {
    WizardStep::reachable(draft)
        .filter(|s| *s != WizardStep::Review)
        .find_map(|s| check_step(s, draft).map(|kind| (s, kind)))
}

/// Re-evaluate an attached error after a mutation.
///
/// Returns the kind that should stay attached to `step`: `None` once the
/// condition is resolved, or the step's current kind when the context
/// changed (e.g. switching scope turns `QueryRequired` into
/// `QueryRequiredForWorkflow`). Notices are kept as they are.
pub(crate) fn recheck(step: WizardStep, kind: ErrorKind, draft: &SignalDraft) -> Option<ErrorKind> {
    if !kind.clears_automatically() {
        return Some(kind);
    }
    match kind {
        ErrorKind::EmptyQuery => draft.raw_query.trim().is_empty().then_some(kind),
        _ if step == WizardStep::Review => None,
        _ => check_step(step, draft),
    }
}
