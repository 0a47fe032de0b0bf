//! Flat filter record edited by the wizard.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::QueryNode;

/// List-valued filter fields that have an included and an excluded side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListField {
    Source,
    Label,
    Location,
}

impl ListField {
    pub const ALL: [ListField; 3] = [ListField::Source, ListField::Label, ListField::Location];

    /// Clause field name used in the persisted query.
    pub fn clause_field(self) -> &'static str {
        match self {
            ListField::Source => "source",
            ListField::Label => "label",
            ListField::Location => "location",
        }
    }

    pub fn from_clause_field(field: &str) -> Option<Self> {
        match field {
            "source" => Some(ListField::Source),
            "label" => Some(ListField::Label),
            "location" => Some(ListField::Location),
            _ => None,
        }
    }
}

/// Publication date bounds, both inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

impl DateWindow {
    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// A window is valid unless both ends are set and `from` is after `to`.
    pub fn is_valid(&self) -> bool {
        match (self.from, self.to) {
            (Some(from), Some(to)) => from <= to,
            _ => true,
        }
    }
}

/// Flat representation of the inclusion/exclusion clauses of a signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    #[serde(default)]
    pub sources_included: Vec<String>,
    #[serde(default)]
    pub sources_excluded: Vec<String>,
    #[serde(default)]
    pub labels_included: Vec<String>,
    #[serde(default)]
    pub labels_excluded: Vec<String>,
    #[serde(default)]
    pub locations_included: Vec<String>,
    #[serde(default)]
    pub locations_excluded: Vec<String>,
    #[serde(default)]
    pub date_window: DateWindow,
    #[serde(default = "default_show_reprints")]
    pub show_reprints: bool,
    /// Nodes the mapper could not interpret, passed through untouched.
    #[serde(default)]
    pub opaque_clauses: Vec<QueryNode>,
}

fn default_show_reprints() -> bool {
    true
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            sources_included: Vec::new(),
            sources_excluded: Vec::new(),
            labels_included: Vec::new(),
            labels_excluded: Vec::new(),
            locations_included: Vec::new(),
            locations_excluded: Vec::new(),
            date_window: DateWindow::default(),
            show_reprints: true,
            opaque_clauses: Vec::new(),
        }
    }
}

impl FilterState {
    pub fn list(&self, field: ListField, excluded: bool) -> &Vec<String> {
        match (field, excluded) {
            (ListField::Source, false) => &self.sources_included,
            (ListField::Source, true) => &self.sources_excluded,
            (ListField::Label, false) => &self.labels_included,
            (ListField::Label, true) => &self.labels_excluded,
            (ListField::Location, false) => &self.locations_included,
            (ListField::Location, true) => &self.locations_excluded,
        }
    }

    pub fn list_mut(&mut self, field: ListField, excluded: bool) -> &mut Vec<String> {
        match (field, excluded) {
            (ListField::Source, false) => &mut self.sources_included,
            (ListField::Source, true) => &mut self.sources_excluded,
            (ListField::Label, false) => &mut self.labels_included,
            (ListField::Label, true) => &mut self.labels_excluded,
            (ListField::Location, false) => &mut self.locations_included,
            (ListField::Location, true) => &mut self.locations_excluded,
        }
    }

    /// True when no filter is set and reprints are shown.
    pub fn is_empty(&self) -> bool {
        ListField::ALL
            .iter()
            .all(|f| self.list(*f, false).is_empty() && self.list(*f, true).is_empty())
            && self.date_window.is_empty()
            && self.show_reprints
            && self.opaque_clauses.is_empty()
    }
}
