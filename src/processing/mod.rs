// Processing module for querying and analysing student records
// Author: Gabriel Demetrios Lafis

mod aggregate;
mod filter;
mod pivot;
mod sort;
mod stats;

pub use aggregate::*;
pub use filter::*;
pub use pivot::*;
pub use sort::*;
pub use stats::*;

use thiserror::Error;

use crate::data::{DataError, DataType, FieldDescriptor, Record, Value};

/// Represents an error in the processing module.
///
/// Every variant is raised at the offending call; none of them is replaced by
/// a default value such as 0, NaN or an empty result.
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("unknown field '{field}' on {entity}")]
    UnknownField { entity: &'static str, field: String },

    #[error("cannot apply {operator} to {field_type} field '{field}' with a {literal_type} literal")]
    TypeMismatch {
        field: String,
        field_type: DataType,
        operator: ComparisonOperator,
        literal_type: DataType,
    },

    #[error("invalid operator '{0}'")]
    InvalidOperator(String),

    #[error("aggregate '{0}' requested over an empty group")]
    EmptyGroup(String),

    #[error("{0} requested over empty input")]
    EmptyInput(&'static str),

    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    #[error("value {value} falls outside every bucket")]
    OutOfRange { value: f64 },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Data error: {0}")]
    DataError(#[from] DataError),
}

/// Resolve a field name against a record type's schema
pub fn resolve_field<T: Record>(name: &str) -> Result<&'static FieldDescriptor<T>, ProcessingError> {
    T::field(name).ok_or_else(|| ProcessingError::UnknownField {
        entity: T::ENTITY,
        field: name.to_string(),
    })
}

/// Resolve a field that must be numeric, returning an `f64` reader
pub fn numeric_field<T: Record>(name: &str) -> Result<impl Fn(&T) -> f64, ProcessingError> {
    let field = resolve_field::<T>(name)?;

    if !field.data_type().is_numeric() {
        return Err(ProcessingError::InvalidArgument(format!(
            "field '{}' is {}, not numeric",
            name,
            field.data_type()
        )));
    }

    Ok(move |record: &T| match field.get(record) {
        Value::Integer(i) => i as f64,
        Value::Float(f) => f,
        other => unreachable!("numeric field '{}' produced {:?}", field.name(), other),
    })
}
