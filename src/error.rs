//! Error taxonomy for the call layer
//!
//! Every failure propagates immediately to the caller; this crate makes
//! no retry decision and swallows nothing.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A descriptor carries a type string the codec cannot parse, or an
    /// ABI document could not be read.
    #[error("abi: {0}")]
    Abi(String),

    /// A caller-supplied argument is outside the declared type's domain.
    /// Local and non-retryable; raised before any network request.
    #[error("encoding `{function}`: {reason}")]
    Encoding { function: String, reason: String },

    /// Returned bytes do not match the declared output shape. Signals a
    /// mismatched ABI version or a corrupted response; non-retryable.
    #[error("decoding `{function}`: {reason}")]
    Decoding { function: String, reason: String },

    /// The connection rejected a state-changing submission.
    #[error("submission rejected: {reason}")]
    Submission { reason: String },

    /// Remote execution reverted during a read-only call or a gas
    /// estimate. `revert` holds the reason when the node surfaces one.
    #[error("{message}")]
    Simulation {
        revert: Option<String>,
        message: String,
    },

    /// The transport could not be created or reached.
    #[error("connection: {0}")]
    Connection(String),
}

impl Error {
    pub(crate) fn encoding(function: &str, reason: impl Into<String>) -> Self {
        Error::Encoding {
            function: function.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn decoding(function: &str, reason: impl Into<String>) -> Self {
        Error::Decoding {
            function: function.to_string(),
            reason: reason.into(),
        }
    }

    /// Revert reason surfaced by the node, if any.
    pub fn revert_reason(&self) -> Option<&str> {
        match self {
            Error::Simulation {
                revert: Some(reason),
                ..
            } => Some(reason),
            _ => None,
        }
    }
}
