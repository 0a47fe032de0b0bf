use signal_query::schema::{DateWindow, FilterState, ListField, SelectionPolicy};

use super::{CommitError, StepContext, StepController};
use crate::steps::WizardStep;
use crate::store::SignalDraft;

/// Inclusion/exclusion filters and the selection policy.
pub struct FiltersStep<'a> {
    ctx: StepContext<'a>,
}

impl<'a> FiltersStep<'a> {
    pub(crate) fn new(ctx: StepContext<'a>) -> Self {
        Self { ctx }
    }

    pub fn filters(&self) -> &FilterState {
        &self.ctx.draft().filters
    }

    pub fn selection_policy(&self) -> &SelectionPolicy {
        &self.ctx.draft().selection_policy
    }

    /// Saved clauses that cannot be shown as filters.
    pub fn unrecognized_count(&self) -> usize {
        self.filters().opaque_clauses.len()
    }

    pub fn set_filters(&mut self, filters: FilterState) {
        self.ctx.patch(|d| d.filters = filters);
    }

    /// Include `value`, moving it out of the excluded list if it was there.
    pub fn include(&mut self, field: ListField, value: impl Into<String>) {
        self.place(field, value.into(), false);
    }

    /// Exclude `value`, moving it out of the included list if it was there.
    pub fn exclude(&mut self, field: ListField, value: impl Into<String>) {
        self.place(field, value.into(), true);
    }

    fn place(&mut self, field: ListField, value: String, excluded: bool) {
        self.ctx.patch(|d| {
            d.filters.list_mut(field, !excluded).retain(|v| *v != value);
            let list = d.filters.list_mut(field, excluded);
            if !list.contains(&value) {
                list.push(value);
            }
        });
    }

    /// Drop `value` from both lists of `field`.
    pub fn remove_value(&mut self, field: ListField, value: &str) {
        self.ctx.patch(|d| {
            d.filters.list_mut(field, false).retain(|v| v != value);
            d.filters.list_mut(field, true).retain(|v| v != value);
        });
    }

    pub fn set_date_window(&mut self, window: DateWindow) {
        self.ctx.patch(|d| d.filters.date_window = window);
    }

    pub fn set_show_reprints(&mut self, show: bool) {
        self.ctx.patch(|d| d.filters.show_reprints = show);
    }

    pub fn set_selection_policy(&mut self, policy: SelectionPolicy) {
        self.ctx.patch(|d| d.selection_policy = policy);
    }

    /// Restore the filters loaded for editing. No-op when creating.
    pub fn discard_changes(&mut self) -> bool {
        let Some(original) = self.ctx.draft().original_filters.clone() else {
            return false;
        };
        self.ctx.patch(|d| d.filters = original);
        true
    }
}

impl StepController for FiltersStep<'_> {
    fn step(&self) -> WizardStep {
        WizardStep::Filters
    }

    fn draft(&self) -> &SignalDraft {
        self.ctx.draft()
    }

    fn commit(&mut self) -> Result<WizardStep, CommitError> {
        self.ctx.commit(WizardStep::Filters, |d| {
            if !d.selection_policy.requires_volume_data() {
                d.anomaly_config = None;
            }
        })
    }
}
