//! Signal schema types with serde (de)serialization.
//!
//! Defines the type hierarchy shared by the wizard and the persistence API:
//! - `StructuredQuery`: AND/OR/NOT groups over `{field, operator, value}` clauses
//! - `FilterState`: flat included/excluded lists, date window, reprints toggle
//! - `SignalPayload` / `PersistedSignal`: the persisted signal body
//! - Policies: notification, selection, schedule, anomaly, delivery

mod delivery;
mod filters;
mod policy;
mod query;
mod signal;

pub use delivery::*;
pub use filters::*;
pub use policy::*;
pub use query::*;
pub use signal::*;
