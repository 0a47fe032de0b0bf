use signal_query::mapper;
use signal_query::schema::SignalPayload;

use super::{CommitError, StepContext, StepController};
use crate::steps::{first_failure, WizardStep};
use crate::store::SignalDraft;
use crate::submit::to_payload;

pub struct ReviewStep<'a> {
    ctx: StepContext<'a>,
}

impl<'a> ReviewStep<'a> {
    pub(crate) fn new(ctx: StepContext<'a>) -> Self {
        Self { ctx }
    }

    /// The step that needs attention before the signal can be saved.
    pub fn first_failure(&self) -> Option<(WizardStep, signal_core::ErrorKind)> {
        first_failure(self.ctx.draft())
    }

    /// The body that would be sent on save.
    pub fn payload(&self) -> SignalPayload {
        to_payload(self.ctx.draft())
    }

    /// Filters in boolean query syntax, e.g. `source:in:["ap"] AND NOT label:in:["spam"]`.
    pub fn filter_preview(&self) -> String {
        mapper::to_structured_query(&self.ctx.draft().filters).to_string()
    }
}

impl StepController for ReviewStep<'_> {
    fn step(&self) -> WizardStep {
        WizardStep::Review
    }

    fn draft(&self) -> &SignalDraft {
        self.ctx.draft()
    }

    /// Stays on the review step; saving is [`crate::Wizard::submit`].
    fn commit(&mut self) -> Result<WizardStep, CommitError> {
        self.ctx.commit(WizardStep::Review, |_| {})
    }
}
