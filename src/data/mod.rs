// Data module for the student record model
// Author: Gabriel Demetrios Lafis

mod json;
mod sample;
mod schema;

pub use json::*;
pub use sample::*;
pub use schema::*;

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lowest allowed GPA or course grade
pub const MIN_GRADE: f64 = 0.0;

/// Highest allowed GPA or course grade
pub const MAX_GRADE: f64 = 4.0;

/// A student together with the courses they are enrolled in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: u32,
    pub name: String,
    pub age: u32,
    pub major: String,
    pub gpa: f64,
    pub enrollment_date: NaiveDate,
    pub email: String,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub courses: Vec<Course>,
}

impl Student {
    /// Sum of credits over all courses
    pub fn total_credits(&self) -> u32 {
        self.courses.iter().map(|c| c.credits).sum()
    }
}

/// A course taken by exactly one student
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub code: String,
    pub name: String,
    pub credits: u32,
    pub grade: f64,
    pub semester: String,
    pub instructor: String,
}

/// Postal address of a student
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

/// A (student, course) pair, one per course a student takes
#[derive(Debug, Clone, Copy)]
pub struct Enrollment<'a> {
    pub student: &'a Student,
    pub course: &'a Course,
}

/// Kind of value a field holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Integer,
    Float,
    String,
    Date,
}

impl DataType {
    /// Whether values of this kind convert losslessly enough to `f64` for arithmetic
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Integer | DataType::Float)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            DataType::Integer => "integer",
            DataType::Float => "real",
            DataType::String => "string",
            DataType::Date => "date",
        };
        f.write_str(name)
    }
}

/// A field value read off a record.
///
/// Equality and hashing are structural so values can be used as grouping keys;
/// floats compare by bit pattern there, with `-0.0` equal to `0.0`. Ordering across kinds is only defined
/// between the two numeric kinds, see [`Value::compare`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Date(NaiveDate),
    String(String),
}

impl Value {
    /// Get the kind of this value
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Integer(_) => DataType::Integer,
            Value::Float(_) => DataType::Float,
            Value::String(_) => DataType::String,
            Value::Date(_) => DataType::Date,
        }
    }

    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// String view of the value, if it is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Order two values of compatible kinds.
    ///
    /// Integers and floats compare numerically with each other; strings compare
    /// lexicographically; dates chronologically. Any other pairing has no order.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.partial_cmp(&y),
                _ => None,
            },
        }
    }

    /// Read free text as a literal for a field of kind `data_type`.
    ///
    /// Numeric kinds try an integer, then a finite real; dates expect ISO
    /// `YYYY-MM-DD`. Text that does not parse, or is aimed at a string field,
    /// stays a string.
    pub fn parse_as(text: &str, data_type: DataType) -> Value {
        let trimmed = text.trim();
        let parsed = match data_type {
            DataType::Integer | DataType::Float => trimmed
                .parse::<i64>()
                .ok()
                .map(Value::Integer)
                .or_else(|| {
                    trimmed
                        .parse::<f64>()
                        .ok()
                        .filter(|f| f.is_finite())
                        .map(Value::Float)
                }),
            DataType::Date => NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .map(Value::Date),
            DataType::String => None,
        };
        parsed.unwrap_or_else(|| Value::String(text.to_string()))
    }
}

/// Bit pattern of a float with both zeros mapped to `+0.0`
fn key_bits(f: f64) -> u64 {
    if f == 0.0 {
        0.0f64.to_bits()
    } else {
        f.to_bits()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => key_bits(*a) == key_bits(*b),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => key_bits(*f).hash(state),
            Value::String(s) => s.hash(state),
            Value::Date(d) => d.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

/// Represents an error in the data module
#[derive(Debug, Error)]
pub enum DataError {
    #[error("duplicate student id {0}")]
    DuplicateId(u32),

    #[error("{field} of {entity} is {value}, outside [0.0, 4.0]")]
    GradeOutOfRange {
        entity: String,
        field: &'static str,
        value: f64,
    },

    #[error("{field} of {entity} must be positive")]
    NotPositive { entity: String, field: &'static str },

    #[error("parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::ParseError(err.to_string())
    }
}
