use serde::Serialize;
use signal_query::grammar::{self, GrammarReport, Token};
use signal_query::schema::{SearchScope, StructuredQuery};

use super::{CommitError, StepContext, StepController};
use crate::steps::WizardStep;
use crate::store::SignalDraft;

/// Tokens for the colorizer plus the grammar findings for the same text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Highlight {
    pub tokens: Vec<Token>,
    pub report: GrammarReport,
}

pub struct QueryStep<'a> {
    ctx: StepContext<'a>,
}

impl<'a> QueryStep<'a> {
    pub(crate) fn new(ctx: StepContext<'a>) -> Self {
        Self { ctx }
    }

    pub fn raw_query(&self) -> &str {
        &self.ctx.draft().raw_query
    }

    /// The enhancement of the current text, if there is one.
    pub fn enhanced_query(&self) -> Option<&StructuredQuery> {
        self.ctx.draft().current_enhanced_query()
    }

    /// Replace the query text. An enhancement of the old text is no longer
    /// current and is not submitted.
    pub fn set_raw_query(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.ctx.patch(|d| d.raw_query = text);
    }

    pub fn set_scope(&mut self, scope: SearchScope) {
        self.ctx.patch(|d| d.scope = scope);
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.ctx.patch(|d| d.name = name);
    }

    /// Grammar highlighting of the current text. Never blocks the step.
    pub fn highlight(&self) -> Highlight {
        let text = self.raw_query();
        Highlight {
            tokens: grammar::tokenize(text),
            report: grammar::validate(text),
        }
    }
}

impl StepController for QueryStep<'_> {
    fn step(&self) -> WizardStep {
        WizardStep::Query
    }

    fn draft(&self) -> &SignalDraft {
        self.ctx.draft()
    }

    fn commit(&mut self) -> Result<WizardStep, CommitError> {
        self.ctx.commit(WizardStep::Query, |d| {
            let trimmed = d.raw_query.trim();
            if trimmed.len() != d.raw_query.len() {
                d.raw_query = trimmed.to_string();
            }
        })
    }
}
