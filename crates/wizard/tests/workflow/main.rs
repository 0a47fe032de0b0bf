/// Integration tests for the signal wizard covering step gating, query
/// enhancement, debounced suggestions, edit mode and submission.

mod edit_mode;
mod enhancement;
mod helpers;
mod steps;
mod submit;
mod suggestions;
