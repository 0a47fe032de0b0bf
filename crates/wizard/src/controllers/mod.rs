//! One controller per wizard step.
//!
//! A controller borrows the store and the wizard's current step for as long
//! as the caller holds it. Its setters patch the draft; `commit` moves the
//! wizard forward, and only when the step's check passes.

mod alerts;
mod anomaly;
mod entities;
mod filters;
mod notification;
mod query;
mod review;


pub use alerts::AlertMethodsStep;
pub use anomaly::AnomalyStep;
pub use entities::EntitiesStep;
pub use filters::FiltersStep;
pub use notification::NotificationStep;
pub use query::{Highlight, QueryStep};
pub use review::ReviewStep;

use signal_core::ErrorKind;
use tracing::info;

use crate::steps::{check_step, WizardStep};
use crate::store::{SignalDraft, SignalDraftStore};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommitError {
    #[error("cannot continue: {0}")]
    Blocked(ErrorKind),
    #[error("{step} is not the current step ({current} is)")]
    NotCurrentStep {
        step: WizardStep,
        current: WizardStep,
    },
}

pub trait StepController {
    fn step(&self) -> WizardStep;

    fn draft(&self) -> &SignalDraft;

    /// The blocking condition of this step, if any.
    fn validate(&self) -> Option<ErrorKind> {
        check_step(self.step(), self.draft())
    }

    /// Finish the step and move to the next reachable one.
    ///
    /// Leaves the draft and the current step untouched when it fails.
    fn commit(&mut self) -> Result<WizardStep, CommitError>;
}

/// What a controller borrows from the wizard.
pub(crate) struct StepContext<'a> {
    pub(crate) store: &'a mut SignalDraftStore,
    pub(crate) current: &'a mut WizardStep,
}

impl<'a> StepContext<'a> {
    pub(crate) fn new(store: &'a mut SignalDraftStore, current: &'a mut WizardStep) -> Self {
        Self { store, current }
    }

    pub(crate) fn draft(&self) -> &SignalDraft {
        self.store.get()
    }

    pub(crate) fn patch(&mut self, mutate: impl FnOnce(&mut SignalDraft)) {
        self.store.patch(mutate);
    }

    /// Shared commit: gate on the step check, apply the step's
    /// normalization, then advance.
    pub(crate) fn commit(
        &mut self,
        step: WizardStep,
        normalize: impl FnOnce(&mut SignalDraft),
    ) -> Result<WizardStep, CommitError> {
        if *self.current != step {
            return Err(CommitError::NotCurrentStep {
                step,
                current: *self.current,
            });
        }
        if let Some(kind) = check_step(step, self.store.get()) {
            return Err(CommitError::Blocked(kind));
        }

        self.store.patch(normalize);
        let next = step.next(self.store.get()).unwrap_or(step);
        *self.current = next;
        info!(
            draft = %self.store.get().draft_id,
            from = %step,
            to = %next,
            "step committed"
        );
        Ok(next)
    }
}
