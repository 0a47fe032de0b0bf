use signal_query::schema::{DeliveryKind, DeliveryMethod, DeliveryMethods};

use super::{CommitError, StepContext, StepController};
use crate::steps::WizardStep;
use crate::store::SignalDraft;

/// Delivery methods. The dashboard is always on and cannot be removed.
pub struct AlertMethodsStep<'a> {
    ctx: StepContext<'a>,
}

impl<'a> AlertMethodsStep<'a> {
    pub(crate) fn new(ctx: StepContext<'a>) -> Self {
        Self { ctx }
    }

    pub fn methods(&self) -> &DeliveryMethods {
        &self.ctx.draft().delivery_methods
    }

    pub fn add(&mut self, method: DeliveryMethod) -> bool {
        if method.kind == DeliveryKind::Dashboard || self.methods().contains(&method) {
            return false;
        }
        self.ctx.patch(|d| {
            d.delivery_methods.add(method);
        });
        true
    }

    /// Turn a channel on before its destination is chosen.
    pub fn enable(&mut self, kind: DeliveryKind) -> bool {
        self.add(DeliveryMethod {
            kind,
            config_id: None,
        })
    }

    /// Point an enabled-but-unconfigured channel at a destination, or add
    /// the configured channel if it was not enabled yet.
    pub fn configure(&mut self, kind: DeliveryKind, config_id: impl Into<String>) {
        let configured = DeliveryMethod::new(kind, config_id);
        self.ctx.patch(|d| {
            d.delivery_methods.remove(&DeliveryMethod {
                kind,
                config_id: None,
            });
            d.delivery_methods.add(configured);
        });
    }

    /// Returns `false` for the dashboard and for methods not present.
    pub fn remove(&mut self, method: &DeliveryMethod) -> bool {
        if method.kind == DeliveryKind::Dashboard || !self.methods().contains(method) {
            return false;
        }
        self.ctx.patch(|d| {
            d.delivery_methods.remove(method);
        });
        true
    }
}

impl StepController for AlertMethodsStep<'_> {
    fn step(&self) -> WizardStep {
        WizardStep::AlertMethods
    }

    fn draft(&self) -> &SignalDraft {
        self.ctx.draft()
    }

    fn commit(&mut self) -> Result<WizardStep, CommitError> {
        self.ctx.commit(WizardStep::AlertMethods, |_| {})
    }
}
