use serde::{Deserialize, Serialize};
use thiserror::Error;

/// User-recoverable conditions raised while building or editing a signal.
///
/// None of these are fatal. Condition-based kinds are attached to the step
/// that owns the condition and disappear as soon as the condition resolves;
/// `EnhancementFailed` stays until a later enhancement succeeds.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    #[error("Enter a query before requesting an enhancement")]
    EmptyQuery,

    #[error("Describe what you want to monitor")]
    QueryRequired,

    #[error("The selected workflow needs a query to run")]
    QueryRequiredForWorkflow,

    #[error("Query enhancement failed, please try again")]
    EnhancementFailed,

    #[error("Some saved filters could not be displayed and were kept as-is")]
    PartialReconstruction,

    #[error("Pick at least one day and a time for this notification policy")]
    ScheduleIncomplete,

    #[error("Select a destination for every enabled delivery method")]
    NoDeliveryMethodSelected,

    #[error("The start date must not be after the end date")]
    InvalidDateWindow,

    #[error("Choose a volume field and a positive threshold")]
    AnomalyConfigInvalid,
}

impl ErrorKind {
    /// Whether this kind prevents moving forward through the wizard.
    ///
    /// A failed enhancement is a retryable notice: the signal can still be
    /// saved with its raw query.
    pub fn is_blocking(self) -> bool {
        !matches!(
            self,
            ErrorKind::PartialReconstruction | ErrorKind::EnhancementFailed
        )
    }

    /// Whether this kind is derived from draft state and should be dropped
    /// as soon as a mutation resolves the underlying condition.
    pub fn clears_automatically(self) -> bool {
        !matches!(
            self,
            ErrorKind::EnhancementFailed | ErrorKind::PartialReconstruction
        )
    }
}
