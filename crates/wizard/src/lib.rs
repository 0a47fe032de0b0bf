//! Signal creation and edit wizard.
//!
//! [`Wizard`] owns the in-progress [`SignalDraft`] and is the only writer of
//! its [`SignalDraftStore`]. Each step is edited through a controller
//! (`wizard.query()`, `wizard.filters()`, ...) and left through
//! [`Wizard::advance`], which refuses to move past a step whose checks fail.
//! Editing an existing signal starts from [`reconstruct`].

pub mod client;
pub mod controllers;
pub mod error;
pub mod generation;
pub mod pipeline;
pub mod reconstruct;
pub mod steps;
pub mod store;
pub mod submit;
pub mod suggest;
pub mod wizard;

pub use client::{ApiError, HttpSignalApi, SignalApi};
pub use controllers::{CommitError, StepController};
pub use error::WizardError;
pub use generation::{Generation, RequestGenerations};
pub use pipeline::{EnhancementOutcome, EnhancementRequest, QueryEnhancementPipeline};
pub use reconstruct::{reconstruct, Reconstruction};
pub use steps::WizardStep;
pub use store::{SignalDraft, SignalDraftStore, SubscriptionId};
pub use submit::to_payload;
pub use suggest::{SuggestionBatch, SuggestionDebouncer, SuggestionService};
pub use wizard::Wizard;
