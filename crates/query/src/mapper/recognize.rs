//! Leaf-clause recognition: which clause shapes map onto `FilterState` fields.

use chrono::NaiveDate;
use serde_json::Value;

use crate::schema::{Clause, ClauseOperator, ListField, QueryGroup, QueryNode};

pub(crate) const DATE_FIELD: &str = "published_at";
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Marker clause for "hide reprints".
///
/// The legacy persisted format has no boolean for this toggle: the clause's
/// presence means reprints are hidden, its absence means they are shown. The
/// shape looks like a compatibility shim rather than a deliberate design, but
/// stored signals depend on it, so it must be written and read exactly so.
pub(crate) const REPRINT_MARKER_FIELD: &str = "hide_reprints";

/// A clause the mapper knows how to place in `FilterState`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Recognized {
    List(ListField, Vec<String>),
    DateFrom(NaiveDate),
    DateTo(NaiveDate),
    HideReprints,
}

pub(crate) fn recognize(clause: &Clause) -> Option<Recognized> {
    // Unknown extra keys would be lost by the flat representation.
    if !clause.extra.is_empty() {
        return None;
    }

    if let Some(field) = ListField::from_clause_field(&clause.field) {
        if clause.operator != ClauseOperator::In {
            return None;
        }
        return string_list(&clause.value).map(|values| Recognized::List(field, values));
    }

    match (clause.field.as_str(), &clause.operator) {
        (DATE_FIELD, ClauseOperator::Gte) => parse_date(&clause.value).map(Recognized::DateFrom),
        (DATE_FIELD, ClauseOperator::Lte) => parse_date(&clause.value).map(Recognized::DateTo),
        (REPRINT_MARKER_FIELD, ClauseOperator::Exists) if clause.value.is_null() => {
            Some(Recognized::HideReprints)
        }
        _ => None,
    }
}

/// A non-empty array made only of strings.
fn string_list(value: &Value) -> Option<Vec<String>> {
    let items = value.as_array()?;
    if items.is_empty() {
        return None;
    }
    items
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect()
}

fn parse_date(value: &Value) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.as_str()?, DATE_FORMAT).ok()
}

/// `OR` of `in` clauses that all target the same list field.
pub(crate) fn same_field_union(group: &QueryGroup) -> Option<(ListField, Vec<String>)> {
    let mut field = None;
    let mut values = Vec::new();
    for child in &group.children {
        let QueryNode::Clause(clause) = child else {
            return None;
        };
        let Some(Recognized::List(f, vals)) = recognize(clause) else {
            return None;
        };
        match field {
            None => field = Some(f),
            Some(existing) if existing != f => return None,
            Some(_) => {}
        }
        values.extend(vals);
    }
    field.map(|f| (f, values))
}

/// The list field and values a `NOT` node excludes, if it has a recognized shape.
pub(crate) fn excluded_list(group: &QueryGroup) -> Option<(ListField, Vec<String>)> {
    let [child] = group.children.as_slice() else {
        return None;
    };
    match child {
        QueryNode::Clause(clause) => match recognize(clause) {
            Some(Recognized::List(field, values)) => Some((field, values)),
            _ => None,
        },
        QueryNode::Group(inner) if inner.op == crate::schema::LogicalOperator::Or => {
            same_field_union(inner)
        }
        QueryNode::Group(_) => None,
    }
}

pub(crate) fn list_clause(field: ListField, values: &[String]) -> QueryNode {
    QueryNode::clause(
        field.clause_field(),
        ClauseOperator::In,
        Value::Array(values.iter().cloned().map(Value::String).collect()),
    )
}

pub(crate) fn date_clause(operator: ClauseOperator, date: NaiveDate) -> QueryNode {
    QueryNode::clause(
        DATE_FIELD,
        operator,
        Value::String(date.format(DATE_FORMAT).to_string()),
    )
}

pub(crate) fn reprint_marker() -> QueryNode {
    QueryNode::clause(REPRINT_MARKER_FIELD, ClauseOperator::Exists, Value::Null)
}
