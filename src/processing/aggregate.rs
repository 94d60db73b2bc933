// Grouping and aggregation
// Author: Gabriel Demetrios Lafis

use std::collections::HashMap;
use std::fmt;

use log::debug;
use serde::Serialize;

use crate::data::{Record, Student, Value};
use super::{numeric_field, resolve_field, ProcessingError};

/// Derives one component of a composite grouping key
pub type KeySelector<'s, T> = Box<dyn Fn(&T) -> Value + 's>;

/// Wrap a closure as a key selector
pub fn key<'s, T, F>(selector: F) -> KeySelector<'s, T>
where
    F: Fn(&T) -> Value + 's,
{
    Box::new(selector)
}

/// Key selector reading a named field
pub fn field_key<T: Record>(name: &str) -> Result<KeySelector<'static, T>, ProcessingError> {
    let field = resolve_field::<T>(name)?;
    Ok(Box::new(move |record: &T| field.get(record)))
}

/// Composite grouping key, compared component by component
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct GroupKey(Vec<Value>);

impl GroupKey {
    /// Create a key from its components
    pub fn new(values: Vec<Value>) -> Self {
        GroupKey(values)
    }

    /// Key components in selector order
    pub fn values(&self) -> &[Value] {
        &self.0
    }

    /// Get one component
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }
}

impl From<Vec<Value>> for GroupKey {
    fn from(values: Vec<Value>) -> Self {
        GroupKey(values)
    }
}

impl From<Value> for GroupKey {
    fn from(value: Value) -> Self {
        GroupKey(vec![value])
    }
}

impl From<&str> for GroupKey {
    fn from(value: &str) -> Self {
        GroupKey(vec![Value::from(value)])
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" / ")?;
            }
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}

/// Records sharing one grouping key
#[derive(Debug, Clone)]
pub struct Group<'a, T> {
    key: GroupKey,
    records: Vec<&'a T>,
}

impl<'a, T> Group<'a, T> {
    /// Create a group with no records yet
    pub fn new(key: GroupKey) -> Self {
        Group {
            key,
            records: Vec::new(),
        }
    }

    /// Add a record to the group
    pub fn push(&mut self, record: &'a T) {
        self.records.push(record);
    }

    /// Key shared by the records
    pub fn key(&self) -> &GroupKey {
        &self.key
    }

    /// Records in input order
    pub fn records(&self) -> &[&'a T] {
        &self.records
    }

    /// Number of records
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Check if the group has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of a numeric selector; 0 for an empty group
    pub fn sum<F: Fn(&T) -> f64>(&self, selector: F) -> f64 {
        self.records.iter().map(|&r| selector(r)).sum()
    }

    /// Arithmetic mean of a numeric selector
    pub fn average<F: Fn(&T) -> f64>(&self, selector: F) -> Result<f64, ProcessingError> {
        if self.records.is_empty() {
            return Err(ProcessingError::EmptyGroup(format!("average of {}", self.key)));
        }
        Ok(self.sum(selector) / self.records.len() as f64)
    }

    /// Smallest value of a numeric selector
    pub fn min<F: Fn(&T) -> f64>(&self, selector: F) -> Result<f64, ProcessingError> {
        self.records
            .iter()
            .map(|&r| selector(r))
            .reduce(f64::min)
            .ok_or_else(|| ProcessingError::EmptyGroup(format!("min of {}", self.key)))
    }

    /// Largest value of a numeric selector
    pub fn max<F: Fn(&T) -> f64>(&self, selector: F) -> Result<f64, ProcessingError> {
        self.records
            .iter()
            .map(|&r| selector(r))
            .reduce(f64::max)
            .ok_or_else(|| ProcessingError::EmptyGroup(format!("max of {}", self.key)))
    }
}

/// Groups in first-occurrence order of their keys
#[derive(Debug, Clone)]
pub struct Grouping<'a, T> {
    groups: Vec<Group<'a, T>>,
    index: HashMap<GroupKey, usize>,
}

impl<'a, T> Grouping<'a, T> {
    /// Get the number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if there are no groups
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterate over groups in first-occurrence order
    pub fn iter(&self) -> std::slice::Iter<'_, Group<'a, T>> {
        self.groups.iter()
    }

    /// Look up a group by key
    pub fn get(&self, key: &GroupKey) -> Option<&Group<'a, T>> {
        self.index.get(key).map(|&i| &self.groups[i])
    }

    /// Total number of records across all groups
    pub fn total_count(&self) -> usize {
        self.groups.iter().map(Group::count).sum()
    }
}

/// Partition records by the composite key built from `key_selectors`.
///
/// Every record lands in exactly one group. Groups appear in the order their
/// key is first seen in the input.
pub fn group_by<'a, T, I, S>(records: I, key_selectors: &[S]) -> Result<Grouping<'a, T>, ProcessingError>
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
    S: Fn(&T) -> Value,
{
    if key_selectors.is_empty() {
        return Err(ProcessingError::InvalidArgument(
            "group by requires at least one key selector".to_string(),
        ));
    }

    let mut groups: Vec<Group<'a, T>> = Vec::new();
    let mut index: HashMap<GroupKey, usize> = HashMap::new();

    for record in records {
        let key = GroupKey(key_selectors.iter().map(|select| select(record)).collect());

        let position = match index.get(&key) {
            Some(&position) => position,
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(Group::new(key));
                groups.len() - 1
            }
        };

        groups[position].push(record);
    }

    debug!("Grouped records into {} groups", groups.len());

    Ok(Grouping { groups, index })
}

/// Represents an aggregation function over one group
pub trait AggregateFunction<T> {
    /// Get the name of the aggregation function
    fn name(&self) -> &str;

    /// Compute the aggregate for a group
    fn apply(&self, group: &Group<'_, T>) -> Result<Value, ProcessingError>;
}

/// Count aggregation function
pub struct CountFunction;

impl<T> AggregateFunction<T> for CountFunction {
    fn name(&self) -> &str {
        "count"
    }

    fn apply(&self, group: &Group<'_, T>) -> Result<Value, ProcessingError> {
        Ok(Value::Integer(group.count() as i64))
    }
}

/// Sum aggregation function
pub struct SumFunction<F> {
    selector: F,
}

impl<F> SumFunction<F> {
    pub fn new(selector: F) -> Self {
        SumFunction { selector }
    }
}

impl<T, F: Fn(&T) -> f64> AggregateFunction<T> for SumFunction<F> {
    fn name(&self) -> &str {
        "sum"
    }

    fn apply(&self, group: &Group<'_, T>) -> Result<Value, ProcessingError> {
        Ok(Value::Float(group.sum(&self.selector)))
    }
}

/// Average aggregation function; the plain arithmetic mean
pub struct AvgFunction<F> {
    selector: F,
}

impl<F> AvgFunction<F> {
    pub fn new(selector: F) -> Self {
        AvgFunction { selector }
    }
}

impl<T, F: Fn(&T) -> f64> AggregateFunction<T> for AvgFunction<F> {
    fn name(&self) -> &str {
        "avg"
    }

    fn apply(&self, group: &Group<'_, T>) -> Result<Value, ProcessingError> {
        group.average(&self.selector).map(Value::Float)
    }
}

/// Min aggregation function
pub struct MinFunction<F> {
    selector: F,
}

impl<F> MinFunction<F> {
    pub fn new(selector: F) -> Self {
        MinFunction { selector }
    }
}

impl<T, F: Fn(&T) -> f64> AggregateFunction<T> for MinFunction<F> {
    fn name(&self) -> &str {
        "min"
    }

    fn apply(&self, group: &Group<'_, T>) -> Result<Value, ProcessingError> {
        group.min(&self.selector).map(Value::Float)
    }
}

/// Max aggregation function
pub struct MaxFunction<F> {
    selector: F,
}

impl<F> MaxFunction<F> {
    pub fn new(selector: F) -> Self {
        MaxFunction { selector }
    }
}

impl<T, F: Fn(&T) -> f64> AggregateFunction<T> for MaxFunction<F> {
    fn name(&self) -> &str {
        "max"
    }

    fn apply(&self, group: &Group<'_, T>) -> Result<Value, ProcessingError> {
        group.max(&self.selector).map(Value::Float)
    }
}

/// One output row: a group key and its aggregates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRow {
    pub key: GroupKey,
    pub values: Vec<Value>,
}

/// Aggregated groups in first-occurrence order
#[derive(Debug, Clone, Serialize)]
pub struct AggregateTable {
    pub key_names: Vec<String>,
    pub aggregate_names: Vec<String>,
    pub rows: Vec<AggregateRow>,
    #[serde(skip)]
    index: HashMap<GroupKey, usize>,
}

impl AggregateTable {
    /// Get the number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Look up a row by key
    pub fn get(&self, key: &GroupKey) -> Option<&AggregateRow> {
        self.index.get(key).map(|&i| &self.rows[i])
    }

    /// Look up one aggregate of one group by output name
    pub fn value(&self, key: &GroupKey, aggregate: &str) -> Option<&Value> {
        let column = self.aggregate_names.iter().position(|n| n == aggregate)?;
        self.get(key).and_then(|row| row.values.get(column))
    }
}

/// Group by processor for aggregating records
pub struct GroupByProcessor<'s, T> {
    keys: Vec<(String, KeySelector<'s, T>)>,
    aggregations: Vec<(String, Box<dyn AggregateFunction<T> + 's>)>,
}

impl<'s, T: Record> GroupByProcessor<'s, T> {
    /// Create a new group by processor
    pub fn new() -> Self {
        GroupByProcessor {
            keys: Vec::new(),
            aggregations: Vec::new(),
        }
    }

    /// Add a derived key component
    pub fn group_by<F>(mut self, name: &str, selector: F) -> Self
    where
        F: Fn(&T) -> Value + 's,
    {
        self.keys.push((name.to_string(), Box::new(selector)));
        self
    }

    /// Add a key component read from a named field
    pub fn group_by_field(mut self, field: &str) -> Result<Self, ProcessingError> {
        self.keys.push((field.to_string(), field_key::<T>(field)?));
        Ok(self)
    }

    /// Add an aggregation
    pub fn aggregate<A: AggregateFunction<T> + 's>(mut self, output_name: &str, function: A) -> Self {
        self.aggregations.push((output_name.to_string(), Box::new(function)));
        self
    }

    /// Add a count aggregation
    pub fn count(self, output_name: &str) -> Self {
        self.aggregate(output_name, CountFunction)
    }

    /// Add a sum aggregation
    pub fn sum<F: Fn(&T) -> f64 + 's>(self, output_name: &str, selector: F) -> Self {
        self.aggregate(output_name, SumFunction::new(selector))
    }

    /// Add an average aggregation
    pub fn avg<F: Fn(&T) -> f64 + 's>(self, output_name: &str, selector: F) -> Self {
        self.aggregate(output_name, AvgFunction::new(selector))
    }

    /// Add a min aggregation
    pub fn min<F: Fn(&T) -> f64 + 's>(self, output_name: &str, selector: F) -> Self {
        self.aggregate(output_name, MinFunction::new(selector))
    }

    /// Add a max aggregation
    pub fn max<F: Fn(&T) -> f64 + 's>(self, output_name: &str, selector: F) -> Self {
        self.aggregate(output_name, MaxFunction::new(selector))
    }

    /// Add an aggregation over a named numeric field (`count`, `sum`, `avg`, `min`, `max`)
    pub fn aggregate_field(self, function: &str, field: &str) -> Result<Self, ProcessingError> {
        let output_name = format!("{}_{}", function, field);

        match function {
            "count" => Ok(self.count(&output_name)),
            "sum" => Ok(self.sum(&output_name, numeric_field::<T>(field)?)),
            "avg" | "average" => Ok(self.avg(&output_name, numeric_field::<T>(field)?)),
            "min" => Ok(self.min(&output_name, numeric_field::<T>(field)?)),
            "max" => Ok(self.max(&output_name, numeric_field::<T>(field)?)),
            other => Err(ProcessingError::InvalidArgument(format!(
                "unknown aggregate function '{}'",
                other
            ))),
        }
    }

    /// Group the records and compute every aggregate per group
    pub fn process<'a, I>(&self, records: I) -> Result<AggregateTable, ProcessingError>
    where
        T: 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let selectors: Vec<&KeySelector<'s, T>> = self.keys.iter().map(|(_, s)| s).collect();
        let grouping = group_by(records, &selectors)?;

        let mut rows = Vec::with_capacity(grouping.len());
        let mut index = HashMap::with_capacity(grouping.len());

        for group in grouping.iter() {
            let values = self
                .aggregations
                .iter()
                .map(|(_, function)| function.apply(group))
                .collect::<Result<Vec<_>, _>>()?;

            index.insert(group.key().clone(), rows.len());
            rows.push(AggregateRow {
                key: group.key().clone(),
                values,
            });
        }

        Ok(AggregateTable {
            key_names: self.keys.iter().map(|(name, _)| name.clone()).collect(),
            aggregate_names: self.aggregations.iter().map(|(name, _)| name.clone()).collect(),
            rows,
            index,
        })
    }
}

impl<'s, T: Record> Default for GroupByProcessor<'s, T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Average GPA per major, in first-occurrence order of the majors
pub fn average_gpa_by_major<'a, I>(students: I) -> Result<Vec<(String, f64)>, ProcessingError>
where
    I: IntoIterator<Item = &'a Student>,
{
    let grouping = group_by(students, &[key(|s: &Student| Value::from(s.major.as_str()))])?;

    grouping
        .iter()
        .map(|group| Ok((group.key().to_string(), group.average(|s| s.gpa)?)))
        .collect()
}
