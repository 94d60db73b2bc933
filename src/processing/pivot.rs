// Pivot tables over categorical rows and bucketed numeric columns
// Author: Gabriel Demetrios Lafis

use std::collections::HashMap;

use log::debug;
use serde::Serialize;

use crate::data::{Value, MAX_GRADE, MIN_GRADE};
use super::{group_by, key, AggregateFunction, Group, ProcessingError};

/// Maps a numeric value to a named category
pub trait BucketSelector {
    fn bucket(&self, value: f64) -> Result<String, ProcessingError>;
}

impl<F> BucketSelector for F
where
    F: Fn(f64) -> String,
{
    fn bucket(&self, value: f64) -> Result<String, ProcessingError> {
        Ok(self(value))
    }
}

/// Contiguous numeric ranges with labels.
///
/// Every range is half-open `[lower, upper)` except the last, which also
/// includes its upper bound.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeBuckets {
    boundaries: Vec<f64>,
    labels: Vec<String>,
}

impl RangeBuckets {
    /// Create ranges from `n + 1` ascending boundaries and `n` labels
    pub fn new(boundaries: Vec<f64>, labels: Vec<String>) -> Result<Self, ProcessingError> {
        if labels.is_empty() || boundaries.len() != labels.len() + 1 {
            return Err(ProcessingError::InvalidArgument(format!(
                "{} labels need {} boundaries, got {}",
                labels.len(),
                labels.len() + 1,
                boundaries.len()
            )));
        }

        if boundaries.windows(2).any(|pair| !(pair[0] < pair[1])) {
            return Err(ProcessingError::InvalidArgument(
                "bucket boundaries must be strictly ascending".to_string(),
            ));
        }

        Ok(RangeBuckets { boundaries, labels })
    }

    /// The standard grade ranges: below 2.5, 2.5-3.0, 3.0-3.5 and 3.5-4.0
    pub fn grade_ranges() -> Self {
        RangeBuckets {
            boundaries: vec![MIN_GRADE, 2.5, 3.0, 3.5, MAX_GRADE],
            labels: vec![
                "Below 2.5".to_string(),
                "2.5-3.0".to_string(),
                "3.0-3.5".to_string(),
                "3.5-4.0".to_string(),
            ],
        }
    }

    /// Labels in ascending range order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

impl BucketSelector for RangeBuckets {
    fn bucket(&self, value: f64) -> Result<String, ProcessingError> {
        let last = self.labels.len() - 1;

        for (i, label) in self.labels.iter().enumerate() {
            let lower = self.boundaries[i];
            let upper = self.boundaries[i + 1];

            let inside = if i == last {
                value >= lower && value <= upper
            } else {
                value >= lower && value < upper
            };

            if inside {
                return Ok(label.clone());
            }
        }

        Err(ProcessingError::OutOfRange { value })
    }
}

/// One non-empty cell of a pivot table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotCell {
    pub row: Value,
    pub column: String,
    pub value: Value,
}

/// Sparse two-dimensional aggregate table.
///
/// Only (row, column) combinations backed by at least one record have a cell;
/// callers wanting a dense grid fill the gaps themselves.
#[derive(Debug, Clone, Serialize)]
pub struct PivotTable {
    rows: Vec<Value>,
    columns: Vec<String>,
    cells: Vec<PivotCell>,
    #[serde(skip)]
    index: HashMap<(Value, String), usize>,
}

impl PivotTable {
    /// Row categories in first-occurrence order
    pub fn rows(&self) -> &[Value] {
        &self.rows
    }

    /// Column buckets in first-occurrence order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Non-empty cells in first-occurrence order
    pub fn cells(&self) -> &[PivotCell] {
        &self.cells
    }

    /// Get the number of non-empty cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the table has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Aggregate of one cell, `None` when no record fell into it
    pub fn get(&self, row: &Value, column: &str) -> Option<&Value> {
        self.index
            .get(&(row.clone(), column.to_string()))
            .map(|&i| &self.cells[i].value)
    }
}

/// Build a pivot table.
///
/// Each record is placed in row `row_key(record)` and in the column bucket of
/// `column_value(record)`; `aggregate` then runs once per occupied cell.
pub fn pivot<'a, T, I, R, C, B, A>(
    records: I,
    row_key: R,
    column_value: C,
    buckets: &B,
    aggregate: &A,
) -> Result<PivotTable, ProcessingError>
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
    R: Fn(&T) -> Value,
    C: Fn(&T) -> f64,
    B: BucketSelector + ?Sized,
    A: AggregateFunction<T> + ?Sized,
{
    let labeled = records
        .into_iter()
        .map(|record| Ok((record, buckets.bucket(column_value(record))?)))
        .collect::<Result<Vec<(&'a T, String)>, ProcessingError>>()?;

    let grouping = group_by(
        labeled.iter(),
        &[
            key(|(record, _): &(&'a T, String)| row_key(*record)),
            key(|(_, bucket): &(&'a T, String)| Value::String(bucket.clone())),
        ],
    )?;

    let mut rows: Vec<Value> = Vec::new();
    let mut columns: Vec<String> = Vec::new();
    let mut cells = Vec::with_capacity(grouping.len());
    let mut index = HashMap::with_capacity(grouping.len());

    for group in grouping.iter() {
        let (row, column) = match group.key().values() {
            [row, Value::String(column)] => (row.clone(), column.clone()),
            other => {
                return Err(ProcessingError::InvalidArgument(format!(
                    "malformed pivot key {:?}",
                    other
                )))
            }
        };

        let mut cell = Group::new(group.key().clone());
        for (record, _) in group.records() {
            cell.push(*record);
        }
        let value = aggregate.apply(&cell)?;

        if !rows.contains(&row) {
            rows.push(row.clone());
        }
        if !columns.contains(&column) {
            columns.push(column.clone());
        }

        index.insert((row.clone(), column.clone()), cells.len());
        cells.push(PivotCell { row, column, value });
    }

    debug!(
        "Pivot built with {} rows, {} columns, {} cells",
        rows.len(),
        columns.len(),
        cells.len()
    );

    Ok(PivotTable {
        rows,
        columns,
        cells,
        index,
    })
}
