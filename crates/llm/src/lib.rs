//! Query enhancement: free text in, structured query out.
//!
//! This crate provides:
//! - `EnhancementService`: the contract the wizard consumes
//! - `HttpEnhancementService`: client for a dedicated NLP conversion endpoint
//! - `LlmQueryEnhancer`: prompt-based conversion through any `LlmProvider`
//! - `create_enhancer`: picks a backend from configuration

pub mod enhancer;
pub mod provider;
pub mod providers;
pub mod service;

pub use enhancer::LlmQueryEnhancer;
pub use provider::{LlmError, LlmProvider, Message, Role};
pub use service::{create_enhancer, EnhanceError, EnhancementService, HttpEnhancementService};
