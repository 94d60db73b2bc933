// Sorting records by a named field
// Author: Gabriel Demetrios Lafis

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data::Record;
use super::{resolve_field, ProcessingError};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl FromStr for SortOrder {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            other => Err(ProcessingError::InvalidArgument(format!(
                "unknown sort order '{}'",
                other
            ))),
        }
    }
}

/// Sort records by a named field.
///
/// The sort is stable: records with equal field values keep their input order
/// in both directions.
pub fn sort_by_field<'a, T, I>(
    records: I,
    field: &str,
    order: SortOrder,
) -> Result<Vec<&'a T>, ProcessingError>
where
    T: Record,
    I: IntoIterator<Item = &'a T>,
{
    let descriptor = resolve_field::<T>(field)?;

    let mut keyed: Vec<_> = records
        .into_iter()
        .map(|record| (descriptor.get(record), record))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| {
        let ordering = a.compare(b).unwrap_or(Ordering::Equal);
        match order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });

    Ok(keyed.into_iter().map(|(_, record)| record).collect())
}
