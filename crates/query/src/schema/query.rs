//! Clause-tree types for structured queries.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Deepest tree the mapper will interpret. Deeper subtrees are carried opaquely.
pub const MAX_QUERY_DEPTH: usize = 10;

/// Logical operators for clause groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalOperator {
    And,
    Or,
    Not,
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalOperator::And => write!(f, "AND"),
            LogicalOperator::Or => write!(f, "OR"),
            LogicalOperator::Not => write!(f, "NOT"),
        }
    }
}

/// Comparison operator of a leaf clause.
///
/// Unknown operators are kept verbatim in `Other` so that clauses written by
/// newer backends survive a load/save cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ClauseOperator {
    Eq,
    In,
    Gte,
    Lte,
    Exists,
    Other(String),
}

impl From<String> for ClauseOperator {
    fn from(s: String) -> Self {
        match s.as_str() {
            "eq" => ClauseOperator::Eq,
            "in" => ClauseOperator::In,
            "gte" => ClauseOperator::Gte,
            "lte" => ClauseOperator::Lte,
            "exists" => ClauseOperator::Exists,
            _ => ClauseOperator::Other(s),
        }
    }
}

impl From<ClauseOperator> for String {
    fn from(op: ClauseOperator) -> Self {
        match op {
            ClauseOperator::Eq => "eq".to_string(),
            ClauseOperator::In => "in".to_string(),
            ClauseOperator::Gte => "gte".to_string(),
            ClauseOperator::Lte => "lte".to_string(),
            ClauseOperator::Exists => "exists".to_string(),
            ClauseOperator::Other(s) => s,
        }
    }
}

/// A single typed condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clause {
    pub field: String,
    pub operator: ClauseOperator,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub value: Value,
    /// Fields this crate does not model, kept for lossless round trips.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Clause {
    pub fn new(field: impl Into<String>, operator: ClauseOperator, value: Value) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
            extra: Map::new(),
        }
    }
}

/// An operator applied to child nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryGroup {
    pub op: LogicalOperator,
    #[serde(default)]
    pub children: Vec<QueryNode>,
}

/// A group node or a leaf clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryNode {
    Group(QueryGroup),
    Clause(Clause),
}

impl QueryNode {
    pub fn clause(field: impl Into<String>, operator: ClauseOperator, value: Value) -> Self {
        QueryNode::Clause(Clause::new(field, operator, value))
    }

    pub fn and(children: Vec<QueryNode>) -> Self {
        QueryNode::Group(QueryGroup {
            op: LogicalOperator::And,
            children,
        })
    }

    pub fn or(children: Vec<QueryNode>) -> Self {
        QueryNode::Group(QueryGroup {
            op: LogicalOperator::Or,
            children,
        })
    }

    pub fn not(child: QueryNode) -> Self {
        QueryNode::Group(QueryGroup {
            op: LogicalOperator::Not,
            children: vec![child],
        })
    }

    /// Number of levels in this subtree; a leaf counts as one.
    pub fn depth(&self) -> usize {
        match self {
            QueryNode::Clause(_) => 1,
            QueryNode::Group(g) => 1 + g.children.iter().map(QueryNode::depth).max().unwrap_or(0),
        }
    }

    /// Whether `needle` appears anywhere in this subtree, compared structurally.
    pub fn contains(&self, needle: &QueryNode) -> bool {
        if self == needle {
            return true;
        }
        match self {
            QueryNode::Clause(_) => false,
            QueryNode::Group(g) => g.children.iter().any(|c| c.contains(needle)),
        }
    }

    fn write_boolean(&self, f: &mut fmt::Formatter<'_>, nested: bool) -> fmt::Result {
        match self {
            QueryNode::Clause(c) => write_clause(c, f),
            QueryNode::Group(g) => match g.op {
                LogicalOperator::Not => {
                    write!(f, "NOT ")?;
                    match g.children.first() {
                        Some(child) => child.write_boolean(f, true),
                        None => write!(f, "()"),
                    }
                }
                op => {
                    let wrap = nested && g.children.len() > 1;
                    if wrap {
                        write!(f, "(")?;
                    }
                    for (i, child) in g.children.iter().enumerate() {
                        if i > 0 {
                            write!(f, " {op} ")?;
                        }
                        child.write_boolean(f, true)?;
                    }
                    if wrap {
                        write!(f, ")")?;
                    }
                    Ok(())
                }
            },
        }
    }
}

fn write_clause(c: &Clause, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let op: String = c.operator.clone().into();
    match &c.value {
        Value::Null => write!(f, "{}:{}", c.field, op),
        Value::String(s) => write!(f, "{}:{}:\"{}\"", c.field, op, s),
        Value::Array(items) => {
            write!(f, "{}:{}:[", c.field, op)?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, " OR ")?;
                }
                match item {
                    Value::String(s) => write!(f, "\"{s}\"")?,
                    other => write!(f, "{other}")?,
                }
            }
            write!(f, "]")
        }
        other => write!(f, "{}:{}:{}", c.field, op, other),
    }
}

/// Root of a clause tree as stored with a signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructuredQuery {
    pub root: QueryNode,
}

impl StructuredQuery {
    /// The "no filters" query: an AND with no children.
    pub fn empty() -> Self {
        Self {
            root: QueryNode::and(Vec::new()),
        }
    }

    pub fn and(children: Vec<QueryNode>) -> Self {
        Self {
            root: QueryNode::and(children),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(&self.root, QueryNode::Group(g) if g.op == LogicalOperator::And && g.children.is_empty())
    }

    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    pub fn exceeds_depth(&self, max: usize) -> bool {
        self.depth() > max
    }

    pub fn contains(&self, needle: &QueryNode) -> bool {
        self.root.contains(needle)
    }
}

impl Default for StructuredQuery {
    fn default() -> Self {
        Self::empty()
    }
}

/// Renders the tree in the boolean query syntax shown on the review step.
impl fmt::Display for StructuredQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.write_boolean(f, false)
    }
}
