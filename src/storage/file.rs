// File loading for the record store
// Author: Gabriel Demetrios Lafis

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use log::info;

use crate::data::{read_students, Student, StudentDocument};
use super::{RecordStore, StorageError};

/// File format for student datasets
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FileFormat {
    Json,
    Yaml,
}

impl FileFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Json => "json",
            FileFormat::Yaml => "yaml",
        }
    }

    /// Parse a file format from a string
    pub fn from_str(s: &str) -> Result<Self, StorageError> {
        match s.to_lowercase().as_str() {
            "json" => Ok(FileFormat::Json),
            "yaml" | "yml" => Ok(FileFormat::Yaml),
            _ => Err(StorageError::InvalidFormat(format!(
                "Unknown file format: {}",
                s
            ))),
        }
    }

    /// Detect the format from a path's extension
    pub fn from_path(path: &Path) -> Result<Self, StorageError> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                StorageError::InvalidFormat(format!(
                    "No file extension on '{}'",
                    path.display()
                ))
            })?;

        Self::from_str(ext)
    }
}

/// Loads student datasets from disk
pub struct FileStorage {
    path: PathBuf,
    format: FileFormat,
}

impl FileStorage {
    /// Create a file storage with an explicit format
    pub fn new<P: AsRef<Path>>(path: P, format: FileFormat) -> Self {
        FileStorage {
            path: path.as_ref().to_path_buf(),
            format,
        }
    }

    /// Create a file storage, detecting the format from the extension
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let format = FileFormat::from_path(path.as_ref())?;
        Ok(Self::new(path, format))
    }

    /// Read the raw students without validation
    pub fn read(&self) -> Result<Vec<Student>, StorageError> {
        let reader = BufReader::new(File::open(&self.path)?);

        let students = match self.format {
            FileFormat::Json => read_students(reader)?,
            FileFormat::Yaml => {
                let document: StudentDocument = serde_yaml::from_reader(reader)
                    .map_err(|err| StorageError::InvalidFormat(err.to_string()))?;
                document.into_students()
            }
        };

        Ok(students)
    }

    /// Read and validate the dataset into a record store
    pub fn load(&self) -> Result<RecordStore, StorageError> {
        let store = RecordStore::new(self.read()?)?;
        info!(
            "Loaded {} students from {}",
            store.len(),
            self.path.display()
        );
        Ok(store)
    }

    /// Get the storage path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the storage format
    pub fn format(&self) -> FileFormat {
        self.format
    }
}

/// Load a validated record store from a JSON or YAML file
pub fn load_store<P: AsRef<Path>>(path: P) -> Result<RecordStore, StorageError> {
    FileStorage::open(path)?.load()
}
