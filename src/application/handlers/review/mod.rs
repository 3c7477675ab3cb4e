//! Review command checks.

mod validator;

pub use validator::{ReviewValidator, LIKE_WINDOW_SECS, MAX_CONTENT_CHARS, MIN_CONTENT_CHARS};
