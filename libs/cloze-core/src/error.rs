//! Error types for cloze-core.

use thiserror::Error;

/// Result type alias using Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while interpreting host-supplied tags and records.
///
/// The text algorithms themselves never fail; they degrade to empty or
/// partial output instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown passage kind: {0}")]
    UnknownPassageKind(String),

    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("invalid argument for {action}: {value:?}")]
    InvalidActionArgument { action: String, value: Option<String> },

    #[error("invalid progress record: {0}")]
    Record(#[from] serde_json::Error),
}
