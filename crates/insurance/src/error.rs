use std::time::Duration;

use thiserror::Error;

/// Why a verification produced no membership answer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerificationError {
    /// A required request field was blank.
    #[error("missing input: {0}")]
    MissingInput(&'static str),

    /// The insurer refused the request (e.g. malformed card number).
    #[error("verification rejected: {0}")]
    Rejected(String),

    /// No answer within the configured timeout.
    #[error("verification timed out after {0:?}")]
    Timeout(Duration),

    /// The insurer could not be reached.
    #[error("insurer unavailable: {0}")]
    Unavailable(String),
}
