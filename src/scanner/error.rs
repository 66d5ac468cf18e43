use thiserror::Error;

/// Errors raised by the annotation engine.
///
/// Classification never fails: a word that matches nothing is `ActiveElement::None`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActiveTextError {
    /// Host-supplied pattern failed to compile. Raised once, when the pattern is set.
    #[error("Invalid pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },

    /// The matcher gave up at runtime (e.g. backtrack limit exceeded)
    #[error("Pattern match failed: {message}")]
    Match { message: String },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, ActiveTextError>;
