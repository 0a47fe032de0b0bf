//! Request-generation tokens.
//!
//! Every outbound request takes a token from [`RequestGenerations::issue`].
//! When the response arrives it is applied only if its token is still the
//! latest one; anything older has been superseded and is dropped.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic token source, shared with the tasks that carry the tokens.
#[derive(Debug, Clone, Default)]
pub struct RequestGenerations {
    latest: Arc<AtomicU64>,
}

impl RequestGenerations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a new token, superseding every token issued before it.
    pub fn issue(&self) -> Generation {
        Generation(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, token: Generation) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }

    /// Supersede every outstanding token without issuing a usable one.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}
