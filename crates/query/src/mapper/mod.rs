//! Bidirectional mapping between persisted clause trees and `FilterState`.
//!
//! Both directions are total. Shapes the mapper does not understand are moved
//! into `FilterState::opaque_clauses` (with their `NOT`/`OR` wrapper) and are
//! written back unchanged, so nothing is dropped on a load/save cycle.

mod recognize;


use tracing::debug;

use crate::schema::{
    ClauseOperator, FilterState, ListField, LogicalOperator, QueryNode, StructuredQuery,
    MAX_QUERY_DEPTH,
};

use recognize::{
    date_clause, excluded_list, list_clause, recognize, reprint_marker, same_field_union,
    Recognized,
};

/// Flatten a clause tree into the wizard's filter record.
pub fn to_filter_state(query: &StructuredQuery) -> FilterState {
    let mut state = FilterState::default();
    collect(&query.root, 1, &mut state);
    if !state.opaque_clauses.is_empty() {
        debug!(
            opaque = state.opaque_clauses.len(),
            "query contains clauses without a filter field"
        );
    }
    state
}

/// Rebuild an AND-of-clauses tree from the filter record.
pub fn to_structured_query(filters: &FilterState) -> StructuredQuery {
    let mut children = Vec::new();

    for field in ListField::ALL {
        let values = filters.list(field, false);
        if !values.is_empty() {
            children.push(list_clause(field, values));
        }
    }
    if let Some(from) = filters.date_window.from {
        children.push(date_clause(ClauseOperator::Gte, from));
    }
    if let Some(to) = filters.date_window.to {
        children.push(date_clause(ClauseOperator::Lte, to));
    }
    if !filters.show_reprints {
        children.push(reprint_marker());
    }
    for field in ListField::ALL {
        let values = filters.list(field, true);
        if !values.is_empty() {
            children.push(QueryNode::not(list_clause(field, values)));
        }
    }
    children.extend(filters.opaque_clauses.iter().cloned());

    StructuredQuery::and(children)
}

/// Number of nodes in `query` that [`to_filter_state`] cannot interpret.
pub fn unrecognized_count(query: &StructuredQuery) -> usize {
    to_filter_state(query).opaque_clauses.len()
}

fn collect(node: &QueryNode, depth: usize, state: &mut FilterState) {
    if depth > MAX_QUERY_DEPTH {
        state.opaque_clauses.push(node.clone());
        return;
    }

    match node {
        QueryNode::Clause(clause) => match recognize(clause) {
            Some(recognized) => {
                if !apply(recognized, state) {
                    state.opaque_clauses.push(node.clone());
                }
            }
            None => state.opaque_clauses.push(node.clone()),
        },
        QueryNode::Group(group) => match group.op {
            LogicalOperator::And => {
                for child in &group.children {
                    collect(child, depth + 1, state);
                }
            }
            LogicalOperator::Or => match same_field_union(group) {
                Some((field, values)) if state.list(field, false).is_empty() => {
                    state.list_mut(field, false).extend(values)
                }
                _ => state.opaque_clauses.push(node.clone()),
            },
            LogicalOperator::Not => match excluded_list(group) {
                Some((field, values)) => state.list_mut(field, true).extend(values),
                None => state.opaque_clauses.push(node.clone()),
            },
        },
    }
}

/// Place a recognized clause. Returns false when its slot is already taken,
/// in which case the caller keeps the clause opaque.
fn apply(recognized: Recognized, state: &mut FilterState) -> bool {
    match recognized {
        // A second included list on the same field narrows the match to the
        // intersection, which one flat list cannot express.
        Recognized::List(field, values) => {
            if !state.list(field, false).is_empty() {
                return false;
            }
            state.list_mut(field, false).extend(values);
            true
        }
        Recognized::DateFrom(date) => {
            if state.date_window.from.is_some() {
                return false;
            }
            state.date_window.from = Some(date);
            true
        }
        Recognized::DateTo(date) => {
            if state.date_window.to.is_some() {
                return false;
            }
            state.date_window.to = Some(date);
            true
        }
        Recognized::HideReprints => {
            if !state.show_reprints {
                return false;
            }
            state.show_reprints = false;
            true
        }
    }
}
