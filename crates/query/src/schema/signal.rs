//! Signal body as exchanged with the persistence API.

use serde::{Deserialize, Serialize};
use signal_core::EntitySet;

use super::{
    AnomalyConfig, DeliveryMethods, NotificationPolicy, SchedulePolicy, SearchScope,
    SelectionPolicy, StructuredQuery,
};

/// Body of `POST signal` and `PUT signal/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalPayload {
    pub name: String,
    #[serde(default)]
    pub raw_query: String,
    #[serde(default)]
    pub scope: SearchScope,
    /// Enhanced search query, absent when the text was never enhanced.
    #[serde(default)]
    pub query: Option<StructuredQuery>,
    /// Inclusion/exclusion clauses.
    #[serde(default)]
    pub filters: StructuredQuery,
    #[serde(default)]
    pub entities: EntitySet,
    #[serde(default)]
    pub anomaly: Option<AnomalyConfig>,
    #[serde(default)]
    pub notification_policy: NotificationPolicy,
    #[serde(default)]
    pub selection_policy: SelectionPolicy,
    #[serde(default)]
    pub schedule_policy: Option<SchedulePolicy>,
    #[serde(default)]
    pub delivery_methods: DeliveryMethods,
}

/// A stored signal as returned by `GET signal/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedSignal {
    pub id: String,
    #[serde(flatten)]
    pub signal: SignalPayload,
}

impl PersistedSignal {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }
}

/// Response of `POST signal`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalCreated {
    pub id: String,
}
