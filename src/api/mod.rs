// API module exposing queries to reporting front-ends
// Author: Gabriel Demetrios Lafis

mod handlers;
mod models;

pub use handlers::*;
pub use models::*;

use thiserror::Error;

use crate::data::DataError;
use crate::processing::ProcessingError;
use crate::storage::StorageError;

/// Represents an error in the API module
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Data error: {0}")]
    DataError(#[from] DataError),

    #[error("Processing error: {0}")]
    ProcessingError(#[from] ProcessingError),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
