//! Crate-wide error type.

use thiserror::Error;

use crate::{engine::LaunchError, protocol::DecodeError};

/// Failure of a single engine operation. Nothing is retried.
#[derive(Debug, Error)]
pub enum Error {
    /// Required parameters missing or malformed; the engine was never started.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Launch(#[from] LaunchError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The engine answered `STATUS=ERROR` (or no usable status).
    #[error("Error {}: {}", .error_type.as_deref().unwrap_or("UnknownError"), .message.as_deref().unwrap_or("engine reported a failure without a message"))]
    Engine {
        error_type: Option<String>,
        message: Option<String>,
    },
}

impl Error {
    /// Validation error naming every missing attribute, e.g.
    /// `'file', 'out' and 'signature' attributes are mandatory`.
    pub fn missing(names: &[&str]) -> Self {
        let quoted: Vec<String> = names.iter().map(|n| format!("'{}'", n)).collect();
        let msg = match quoted.as_slice() {
            [] => "required attributes are missing".to_string(),
            [one] => format!("{} attribute is mandatory", one),
            [init @ .., last] => format!("{} and {} attributes are mandatory", init.join(", "), last),
        };
        Self::Validation(msg)
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
