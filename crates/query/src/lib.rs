//! Structured query model and the pure transforms around it.
//!
//! This crate provides:
//! - `StructuredQuery`: AND/OR/NOT clause trees as persisted by the signal API
//! - `FilterState`: the flat filter record the wizard edits
//! - Persisted signal schema and its notification/selection/delivery policies
//! - Boolean query grammar for validating and highlighting free text
//! - Bidirectional mapping between clause trees and `FilterState`
//! - Structural validation of signal payloads before submission

pub mod grammar;
pub mod mapper;
pub mod schema;
pub mod validation;
