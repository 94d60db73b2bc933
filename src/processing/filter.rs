// Predicate construction and filtering
// Author: Gabriel Demetrios Lafis

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::data::{DataType, Record, Student, Value};
use super::{resolve_field, ProcessingError};

/// Comparison applied between a field and a literal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOperator {
    GreaterThan,
    LessThan,
    Equal,
}

impl ComparisonOperator {
    /// Operator symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::Equal => "=",
        }
    }

    /// Whether `field.compare(literal)` satisfies the operator
    fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            ComparisonOperator::GreaterThan => ordering == Ordering::Greater,
            ComparisonOperator::LessThan => ordering == Ordering::Less,
            ComparisonOperator::Equal => ordering == Ordering::Equal,
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for ComparisonOperator {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            ">" | "gt" | "GreaterThan" => Ok(ComparisonOperator::GreaterThan),
            "<" | "lt" | "LessThan" => Ok(ComparisonOperator::LessThan),
            "=" | "==" | "eq" | "Equal" => Ok(ComparisonOperator::Equal),
            other => Err(ProcessingError::InvalidOperator(other.to_string())),
        }
    }
}

/// Whether a literal of kind `literal` can be compared against a field of kind `field`
fn comparable(field: DataType, literal: DataType) -> bool {
    match (field, literal) {
        (f, l) if f.is_numeric() && l.is_numeric() => true,
        (DataType::String, DataType::String) => true,
        (DataType::Date, DataType::Date) => true,
        _ => false,
    }
}

/// A pure boolean test over one record
pub struct Predicate<T> {
    name: String,
    test: Box<dyn Fn(&T) -> bool>,
}

impl<T: Record> Predicate<T> {
    /// Create a predicate from a closure
    pub fn new<F>(name: &str, test: F) -> Self
    where
        F: Fn(&T) -> bool + 'static,
    {
        Predicate {
            name: name.to_string(),
            test: Box::new(test),
        }
    }

    /// Build `field <operator> literal`.
    ///
    /// The field name and the operator/literal kinds are checked here, before
    /// any record is seen. Integer and real values compare numerically with
    /// each other; `Equal` on a real field is exact, with no tolerance.
    pub fn build(
        field: &str,
        operator: ComparisonOperator,
        literal: impl Into<Value>,
    ) -> Result<Self, ProcessingError> {
        let descriptor = resolve_field::<T>(field)?;
        let literal = literal.into();

        if !comparable(descriptor.data_type(), literal.data_type()) {
            return Err(ProcessingError::TypeMismatch {
                field: field.to_string(),
                field_type: descriptor.data_type(),
                operator,
                literal_type: literal.data_type(),
            });
        }

        if let Value::Float(f) = literal {
            if f.is_nan() {
                return Err(ProcessingError::InvalidArgument(format!(
                    "NaN literal for field '{}'",
                    field
                )));
            }
        }

        let name = format!("{} {} {}", field, operator, literal);
        debug!("Built predicate on {}: {}", T::ENTITY, name);

        Ok(Self::new(&name, move |record: &T| {
            descriptor
                .get(record)
                .compare(&literal)
                .map_or(false, |ordering| operator.accepts(ordering))
        }))
    }

    /// Build a predicate from an operator token such as `">"` or `"Equal"`
    pub fn parse(field: &str, operator: &str, literal: impl Into<Value>) -> Result<Self, ProcessingError> {
        resolve_field::<T>(field)?;
        let operator = operator.parse::<ComparisonOperator>()?;
        Self::build(field, operator, literal)
    }

    /// Keep records where a field is greater than a value
    pub fn greater_than(field: &str, literal: impl Into<Value>) -> Result<Self, ProcessingError> {
        Self::build(field, ComparisonOperator::GreaterThan, literal)
    }

    /// Keep records where a field is less than a value
    pub fn less_than(field: &str, literal: impl Into<Value>) -> Result<Self, ProcessingError> {
        Self::build(field, ComparisonOperator::LessThan, literal)
    }

    /// Keep records where a field equals a value
    pub fn equals(field: &str, literal: impl Into<Value>) -> Result<Self, ProcessingError> {
        Self::build(field, ComparisonOperator::Equal, literal)
    }

    /// Keep records where a string field contains a substring
    pub fn contains(field: &str, substring: &str) -> Result<Self, ProcessingError> {
        let descriptor = resolve_field::<T>(field)?;

        if descriptor.data_type() != DataType::String {
            return Err(ProcessingError::InvalidArgument(format!(
                "contains needs a string field, '{}' is {}",
                field,
                descriptor.data_type()
            )));
        }

        let substring = substring.to_string();
        Ok(Self::new(
            &format!("{} contains {:?}", field, substring),
            move |record: &T| {
                descriptor
                    .get(record)
                    .as_str()
                    .map_or(false, |s| s.contains(&substring))
            },
        ))
    }

    /// Both predicates must hold
    pub fn and(self, other: Predicate<T>) -> Self {
        let name = format!("({}) and ({})", self.name, other.name);
        let (left, right) = (self.test, other.test);
        Self::new(&name, move |record: &T| left(record) && right(record))
    }

    /// Evaluate the predicate on one record
    pub fn evaluate(&self, record: &T) -> bool {
        (self.test)(record)
    }

    /// Lazily keep the records that satisfy the predicate
    pub fn filter<'p, 'r, I>(&'p self, records: I) -> impl Iterator<Item = &'r T> + 'p
    where
        T: 'r,
        I: IntoIterator<Item = &'r T>,
        I::IntoIter: 'p,
    {
        records.into_iter().filter(move |record| self.evaluate(record))
    }

    /// Human-readable description of the predicate
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Predicate<Student> {
    /// Keep students whose age lies in `[min_age, max_age]`
    pub fn age_range(min_age: u32, max_age: u32) -> Self {
        Self::new(
            &format!("age in [{}, {}]", min_age, max_age),
            move |student: &Student| student.age >= min_age && student.age <= max_age,
        )
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Predicate").field("name", &self.name).finish()
    }
}
