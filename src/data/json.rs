// JSON decoding of student records
// Author: Gabriel Demetrios Lafis

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{DataError, Student};

/// Accepted document shapes: a bare array or `{"students": [...]}`
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum StudentDocument {
    List(Vec<Student>),
    Wrapped { students: Vec<Student> },
}

impl StudentDocument {
    pub(crate) fn into_students(self) -> Vec<Student> {
        match self {
            StudentDocument::List(students) => students,
            StudentDocument::Wrapped { students } => students,
        }
    }
}

/// JSON file holding student records
pub struct JsonSource {
    path: PathBuf,
}

impl JsonSource {
    /// Create a new JSON source
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        JsonSource {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Read every student in the file
    pub fn read(&self) -> Result<Vec<Student>, DataError> {
        let file = File::open(&self.path)?;
        read_students(BufReader::new(file))
    }

    /// Path this source reads from
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Decode students from a reader
pub fn read_students<R: Read>(reader: R) -> Result<Vec<Student>, DataError> {
    let document: StudentDocument = serde_json::from_reader(reader)?;
    Ok(document.into_students())
}

/// Decode students from a JSON string
pub fn parse_students(json: &str) -> Result<Vec<Student>, DataError> {
    let document: StudentDocument = serde_json::from_str(json)?;
    Ok(document.into_students())
}
