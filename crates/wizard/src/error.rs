use signal_core::ErrorKind;
use signal_llm::EnhanceError;
use signal_query::validation::ValidationError;

use crate::client::ApiError;
use crate::controllers::CommitError;
use crate::steps::WizardStep;

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    /// The input was refused before any request was made.
    #[error("{0}")]
    Rejected(ErrorKind),

    #[error("{step}: {kind}")]
    Blocked { step: WizardStep, kind: ErrorKind },

    #[error(transparent)]
    Commit(#[from] CommitError),

    #[error("query enhancement failed: {0}")]
    Enhancement(#[source] EnhanceError),

    /// A newer request superseded this one; nothing was changed.
    #[error("superseded by a newer request")]
    Stale,

    #[error("signal failed validation: {}", summarize(.0))]
    Invalid(Vec<ValidationError>),

    #[error("signal API error: {0}")]
    Api(#[from] ApiError),
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.path, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}
