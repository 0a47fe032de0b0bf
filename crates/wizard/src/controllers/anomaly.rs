use signal_query::schema::AnomalyConfig;

use super::{CommitError, StepContext, StepController};
use crate::steps::WizardStep;
use crate::store::SignalDraft;

/// Volume threshold settings, shown only for top-N selection.
pub struct AnomalyStep<'a> {
    ctx: StepContext<'a>,
}

impl<'a> AnomalyStep<'a> {
    pub(crate) fn new(ctx: StepContext<'a>) -> Self {
        Self { ctx }
    }

    pub fn config(&self) -> Option<&AnomalyConfig> {
        self.ctx.draft().anomaly_config.as_ref()
    }

    pub fn set_config(&mut self, config: AnomalyConfig) {
        self.ctx.patch(|d| d.anomaly_config = Some(config));
    }

    pub fn set_volume_field(&mut self, field: impl Into<String>) {
        let field = field.into();
        self.ctx.patch(|d| match &mut d.anomaly_config {
            Some(config) => config.volume_field = field,
            None => {
                d.anomaly_config = Some(AnomalyConfig {
                    volume_field: field,
                    threshold: 0.0,
                })
            }
        });
    }

    pub fn set_threshold(&mut self, threshold: f64) {
        self.ctx.patch(|d| match &mut d.anomaly_config {
            Some(config) => config.threshold = threshold,
            None => {
                d.anomaly_config = Some(AnomalyConfig {
                    volume_field: String::new(),
                    threshold,
                })
            }
        });
    }
}

impl StepController for AnomalyStep<'_> {
    fn step(&self) -> WizardStep {
        WizardStep::Anomaly
    }

    fn draft(&self) -> &SignalDraft {
        self.ctx.draft()
    }

    fn commit(&mut self) -> Result<WizardStep, CommitError> {
        self.ctx.commit(WizardStep::Anomaly, |d| {
            if let Some(config) = &mut d.anomaly_config {
                config.volume_field = config.volume_field.trim().to_string();
            }
        })
    }
}
