//! Query checks: depth cap, scope requirements, clauses the editor cannot show.

use crate::mapper::to_filter_state;
use crate::schema::*;

use super::fuzzy::fuzzy_match;
use super::ValidationResult;

const KNOWN_FIELDS: &[&str] = &["source", "label", "location", "published_at", "hide_reprints"];

pub(super) fn validate_queries(payload: &SignalPayload, result: &mut ValidationResult) {
    if let SearchScope::Template { template_id } = &payload.scope {
        if template_id.trim().is_empty() {
            result.error("scope.templateId", "Template scope requires a template id");
        }
        if payload.raw_query.trim().is_empty() {
            result.error("rawQuery", "The selected workflow needs a query");
        }
    } else if payload.raw_query.trim().is_empty() {
        result.error("rawQuery", "Query must not be empty");
    }

    if let Some(query) = &payload.query {
        if query.exceeds_depth(MAX_QUERY_DEPTH) {
            result.error(
                "query",
                format!(
                    "Query is nested {} levels deep, the maximum is {MAX_QUERY_DEPTH}",
                    query.depth()
                ),
            );
        }
    }

    if payload.filters.exceeds_depth(MAX_QUERY_DEPTH) {
        result.error(
            "filters",
            format!(
                "Filters are nested {} levels deep, the maximum is {MAX_QUERY_DEPTH}",
                payload.filters.depth()
            ),
        );
    }

    let state = to_filter_state(&payload.filters);
    for (i, node) in state.opaque_clauses.iter().enumerate() {
        let path = format!("filters.opaque[{i}]");
        match node {
            QueryNode::Clause(clause) => match fuzzy_match(&clause.field, KNOWN_FIELDS) {
                Some(known) => result.warn(
                    path,
                    format!(
                        "Clause on '{}' is kept as-is. Did you mean '{known}'?",
                        clause.field
                    ),
                ),
                None => result.warn(
                    path,
                    format!("Clause on '{}' cannot be edited in the wizard", clause.field),
                ),
            },
            QueryNode::Group(group) => result.warn(
                path,
                format!("{} group cannot be edited in the wizard", group.op),
            ),
        }
    }
}
