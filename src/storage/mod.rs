// Storage module for holding and loading student records
// Author: Gabriel Demetrios Lafis

mod file;
mod memory;

pub use file::*;
pub use memory::*;

use thiserror::Error;

use crate::data::DataError;

/// Represents an error in the storage module
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Data error: {0}")]
    DataError(#[from] DataError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}
