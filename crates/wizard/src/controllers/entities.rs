use signal_core::{EntityKind, EntityRef, EntitySet};

use super::{CommitError, StepContext, StepController};
use crate::steps::WizardStep;
use crate::store::SignalDraft;

pub struct EntitiesStep<'a> {
    ctx: StepContext<'a>,
}

impl<'a> EntitiesStep<'a> {
    pub(crate) fn new(ctx: StepContext<'a>) -> Self {
        Self { ctx }
    }

    pub fn entities(&self) -> &EntitySet {
        &self.ctx.draft().entities
    }

    pub fn suggestions(&self) -> &[EntityRef] {
        &self.ctx.draft().entity_suggestions
    }

    /// Returns `false` when the entity is already selected.
    pub fn add(&mut self, entity: EntityRef) -> bool {
        if self.entities().contains(&entity.id, entity.kind) {
            return false;
        }
        self.ctx.patch(|d| {
            d.entities.insert(entity);
        });
        true
    }

    pub fn remove(&mut self, id: &str, kind: EntityKind) -> Option<EntityRef> {
        if !self.entities().contains(id, kind) {
            return None;
        }
        let mut removed = None;
        self.ctx.patch(|d| removed = d.entities.remove(id, kind));
        removed
    }

    /// Select an entry of the current suggestion batch.
    pub fn accept_suggestion(&mut self, id: &str, kind: EntityKind) -> bool {
        let found = self
            .suggestions()
            .iter()
            .find(|e| e.id == id && e.kind == kind)
            .cloned();
        match found {
            Some(entity) => self.add(entity),
            None => false,
        }
    }
}

impl StepController for EntitiesStep<'_> {
    fn step(&self) -> WizardStep {
        WizardStep::Entities
    }

    fn draft(&self) -> &SignalDraft {
        self.ctx.draft()
    }

    fn commit(&mut self) -> Result<WizardStep, CommitError> {
        self.ctx.commit(WizardStep::Entities, |_| {})
    }
}
