//! Harness error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid fixture JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A `tag:value` argument on the command line could not be parsed.
    #[error("invalid argument '{spec}': {reason}")]
    InvalidArg { spec: String, reason: &'static str },
    #[error("no fixture JSON files found in {0}")]
    NoFixtures(String),
}
