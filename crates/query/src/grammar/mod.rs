//! Boolean query grammar for free-text monitoring requests.
//!
//! Recognizes the case-sensitive keywords `AND`, `OR`, `NOT`, `AND NOT`, the
//! `*` wildcard, quoted phrases and `()`/`[]`/`{}` nesting. Unbalanced
//! brackets and quotes are reported as warnings only; they never make a
//! query invalid. Misplaced operators are errors.

mod lexer;

pub use lexer::{tokenize, Span, Token, TokenKind};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

/// A flagged region of the query text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpanIssue {
    pub span: Span,
    pub severity: Severity,
    pub message: String,
}

/// Outcome of [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrammarReport {
    /// False only when at least one issue is an error.
    pub valid: bool,
    pub error_spans: Vec<SpanIssue>,
}

impl GrammarReport {
    pub fn warnings(&self) -> impl Iterator<Item = &SpanIssue> {
        self.error_spans
            .iter()
            .filter(|i| i.severity == Severity::Warning)
    }
}

/// Check `text` for structural problems.
pub fn validate(text: &str) -> GrammarReport {
    let tokens = tokenize(text);
    let mut issues = Vec::new();

    for token in &tokens {
        match token.kind {
            TokenKind::Open | TokenKind::Close if !token.matched => issues.push(SpanIssue {
                span: token.span,
                severity: Severity::Warning,
                message: "Unmatched bracket".to_string(),
            }),
            TokenKind::Quote => issues.push(SpanIssue {
                span: token.span,
                severity: Severity::Warning,
                message: "Unterminated quote".to_string(),
            }),
            _ => {}
        }
    }

    check_operators(&tokens, &mut issues);
    issues.sort_by_key(|i| i.span.start);

    GrammarReport {
        valid: issues.iter().all(|i| i.severity != Severity::Error),
        error_spans: issues,
    }
}

/// Operators need an operand on each side they bind to.
fn check_operators(tokens: &[Token], issues: &mut Vec<SpanIssue>) {
    let significant: Vec<&Token> = tokens
        .iter()
        .filter(|t| t.kind != TokenKind::Whitespace)
        .collect();

    for (i, token) in significant.iter().enumerate() {
        if !token.kind.is_operator() {
            continue;
        }
        let prev = i.checked_sub(1).and_then(|p| significant.get(p)).map(|t| t.kind);
        let next = significant.get(i + 1).map(|t| t.kind);

        if token.kind.is_binary_operator() {
            let missing_left = match prev {
                None | Some(TokenKind::Open) => true,
                Some(kind) => kind.is_operator(),
            };
            if missing_left {
                issues.push(SpanIssue {
                    span: token.span,
                    severity: Severity::Error,
                    message: "Operator is missing a left-hand term".to_string(),
                });
                continue;
            }
        }

        let missing_right = match next {
            None | Some(TokenKind::Close) => true,
            Some(kind) => kind.is_binary_operator(),
        };
        if missing_right {
            issues.push(SpanIssue {
                span: token.span,
                severity: Severity::Error,
                message: "Operator is missing a right-hand term".to_string(),
            });
        }
    }
}
