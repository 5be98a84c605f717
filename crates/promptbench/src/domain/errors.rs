//! Domain Errors
//!
//! Error types for client-side domain operations.

use thiserror::Error;

/// Client-side domain errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Cannot save evaluation: output id is missing")]
    MissingOutputId,

    #[error("An evaluation is already being submitted for this result")]
    SubmissionInFlight,

    #[error("Validation error: {0}")]
    Validation(String),
}
