//! Error types for docchat core

use thiserror::Error;

use crate::coordinator::Family;

/// Result type alias using docchat Error
pub type Result<T> = std::result::Result<T, Error>;

/// docchat error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Intent refused: {0}")]
    Intent(#[from] IntentError),
}

/// Failures talking to the document service.
///
/// Everything here is a transport failure from the coordinator's point of view:
/// the exchange did not produce a structured result that can be interpreted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{0}")]
    Transport(String),

    #[error("{0}")]
    Decode(String),

    #[error("Failed to create client: {0}")]
    Client(String),
}

/// Local refusals raised before any request is issued
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentError {
    #[error("Please select a PDF file first.")]
    NoDocumentSelected,

    #[error("Please type a question.")]
    EmptyQuestion,

    #[error("An {0} request is already in progress.")]
    RequestInFlight(Family),
}
