//! Delivery methods: where a signal's results are sent.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryKind {
    Dashboard,
    Email,
    Slack,
    Webhook,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryMethod {
    #[serde(rename = "type")]
    pub kind: DeliveryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_id: Option<String>,
}

impl DeliveryMethod {
    pub fn dashboard() -> Self {
        Self {
            kind: DeliveryKind::Dashboard,
            config_id: None,
        }
    }

    pub fn new(kind: DeliveryKind, config_id: impl Into<String>) -> Self {
        Self {
            kind,
            config_id: Some(config_id.into()),
        }
    }

    /// A channel without a destination has been toggled on but not pointed anywhere.
    pub fn is_configured(&self) -> bool {
        match self.kind {
            DeliveryKind::Dashboard => true,
            _ => self
                .config_id
                .as_deref()
                .is_some_and(|id| !id.trim().is_empty()),
        }
    }
}

/// Set of delivery methods that always contains the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<DeliveryMethod>", into = "Vec<DeliveryMethod>")]
pub struct DeliveryMethods {
    methods: IndexSet<DeliveryMethod>,
}

impl DeliveryMethods {
    pub fn new() -> Self {
        let mut methods = IndexSet::new();
        methods.insert(DeliveryMethod::dashboard());
        Self { methods }
    }

    /// Add a method. Dashboard entries collapse into the implicit one.
    pub fn add(&mut self, method: DeliveryMethod) -> bool {
        if method.kind == DeliveryKind::Dashboard {
            return false;
        }
        self.methods.insert(method)
    }

    /// Remove a method. The dashboard cannot be removed.
    pub fn remove(&mut self, method: &DeliveryMethod) -> bool {
        if method.kind == DeliveryKind::Dashboard {
            return false;
        }
        self.methods.shift_remove(method)
    }

    pub fn contains(&self, method: &DeliveryMethod) -> bool {
        self.methods.contains(method)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeliveryMethod> {
        self.methods.iter()
    }

    /// Methods that were enabled without a destination.
    pub fn unconfigured(&self) -> impl Iterator<Item = &DeliveryMethod> {
        self.methods.iter().filter(|m| !m.is_configured())
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl Default for DeliveryMethods {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<DeliveryMethod>> for DeliveryMethods {
    fn from(list: Vec<DeliveryMethod>) -> Self {
        let mut methods = DeliveryMethods::new();
        for method in list {
            methods.add(method);
        }
        methods
    }
}

impl From<DeliveryMethods> for Vec<DeliveryMethod> {
    fn from(methods: DeliveryMethods) -> Self {
        methods.methods.into_iter().collect()
    }
}
