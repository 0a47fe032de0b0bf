//! Regex-driven tokenizer with bracket and quote pairing.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Alternation order matters: `AND NOT` must win over `AND`, and keywords
/// only match as whole, case-sensitive words.
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?P<ws>\s+)|(?P<and_not>AND\s+NOT\b)|(?P<and>AND\b)|(?P<or>OR\b)|(?P<not>NOT\b)|(?P<phrase>"[^"]*")|(?P<quote>")|(?P<wild>\*)|(?P<open>[(\[{])|(?P<close>[)\]}])|(?P<term>[^\s()\[\]{}"*]+)"#,
    )
    .expect("token pattern is valid")
});

const GROUP_NAMES: [(&str, TokenKind); 11] = [
    ("ws", TokenKind::Whitespace),
    ("and_not", TokenKind::AndNot),
    ("and", TokenKind::And),
    ("or", TokenKind::Or),
    ("not", TokenKind::Not),
    ("phrase", TokenKind::Phrase),
    ("quote", TokenKind::Quote),
    ("wild", TokenKind::Wildcard),
    ("open", TokenKind::Open),
    ("close", TokenKind::Close),
    ("term", TokenKind::Term),
];

/// Byte range into the query text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Whitespace,
    And,
    Or,
    Not,
    AndNot,
    Wildcard,
    Open,
    Close,
    /// A complete `"..."` phrase; keywords inside are literal.
    Phrase,
    /// A quote with no closing partner.
    Quote,
    Term,
}

impl TokenKind {
    pub fn is_binary_operator(self) -> bool {
        matches!(self, TokenKind::And | TokenKind::Or | TokenKind::AndNot)
    }

    pub fn is_operator(self) -> bool {
        self.is_binary_operator() || self == TokenKind::Not
    }
}

/// A highlighted slice of the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// Bracket nesting level (0 = outermost) for `Open`/`Close`, 0 otherwise.
    pub depth: usize,
    /// False for brackets and quotes without a partner.
    pub matched: bool,
}

fn partner(close: char) -> char {
    match close {
        ')' => '(',
        ']' => '[',
        '}' => '{',
        other => other,
    }
}

/// Split `text` into tokens covering every byte, pairing brackets as it goes.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();
    // (token index, opening char)
    let mut stack: Vec<(usize, char)> = Vec::new();

    for caps in TOKEN_RE.captures_iter(text) {
        let Some((kind, m)) = GROUP_NAMES
            .iter()
            .find_map(|(name, kind)| caps.name(name).map(|m| (*kind, m)))
        else {
            continue;
        };

        let span = Span {
            start: m.start(),
            end: m.end(),
        };
        let mut token = Token {
            kind,
            span,
            depth: 0,
            matched: kind != TokenKind::Quote,
        };

        match kind {
            TokenKind::Open => {
                token.depth = stack.len();
                token.matched = false;
                let ch = m.as_str().chars().next().unwrap_or('(');
                stack.push((tokens.len(), ch));
            }
            TokenKind::Close => {
                let ch = m.as_str().chars().next().unwrap_or(')');
                match stack.last() {
                    Some(&(open_idx, open_ch)) if open_ch == partner(ch) => {
                        stack.pop();
                        token.depth = stack.len();
                        token.matched = true;
                        if let Some(open) = tokens.get_mut(open_idx) {
                            open.matched = true;
                        }
                    }
                    _ => {
                        token.depth = stack.len();
                        token.matched = false;
                    }
                }
            }
            _ => {}
        }

        tokens.push(token);
    }

    tokens
}
