// Query handlers over a record store
// Author: Gabriel Demetrios Lafis

use std::collections::HashSet;

use log::debug;

use crate::data::{Course, DataType, Enrollment, Student, Value};
use crate::processing::{
    average_gpa_by_major, numeric_field, pearson_correlation, pivot, resolve_field, sort_by_field,
    summarize, z_score_outliers, AggregateFunction, AggregateTable, BucketSelector,
    ComparisonOperator, CountFunction, GroupByProcessor, PivotTable, Predicate, ProcessingError,
    RangeBuckets, SortOrder, Summary,
};
use crate::storage::RecordStore;
use super::{
    AggregateRequest, ApiError, CorrelationRequest, FilterRequest, PivotRequest, StatsRequest,
    StatisticsResponse,
};

/// Read-only query surface over one record store
#[derive(Debug, Clone, Copy)]
pub struct QueryEngine<'a> {
    store: &'a RecordStore,
}

impl<'a> QueryEngine<'a> {
    /// Create an engine over a store
    pub fn new(store: &'a RecordStore) -> Self {
        QueryEngine { store }
    }

    /// The underlying store
    pub fn store(&self) -> &'a RecordStore {
        self.store
    }

    /// Students satisfying `field operator literal`, produced lazily.
    ///
    /// Field and literal are validated before the iterator is returned.
    pub fn filter(
        &self,
        field: &str,
        operator: ComparisonOperator,
        literal: Value,
    ) -> Result<impl Iterator<Item = &'a Student> + 'a, ProcessingError> {
        let predicate = Predicate::<Student>::build(field, operator, literal)?;
        Ok(self
            .store
            .iter()
            .filter(move |student| predicate.evaluate(student)))
    }

    /// Run a filter request with a textual operator
    pub fn handle_filter(&self, request: &FilterRequest) -> Result<Vec<&'a Student>, ApiError> {
        let descriptor = resolve_field::<Student>(&request.field)?;
        let literal = literal_for(&request.value, descriptor.data_type())?;
        let predicate = Predicate::<Student>::parse(&request.field, &request.operator, literal)?;
        let students: Vec<_> = predicate.filter(self.store).collect();
        debug!("Filter '{}' matched {} students", predicate.name(), students.len());
        Ok(students)
    }

    /// Students whose age lies in `[min_age, max_age]`
    pub fn filter_by_age_range(&self, min_age: u32, max_age: u32) -> Vec<&'a Student> {
        Predicate::age_range(min_age, max_age).filter(self.store).collect()
    }

    /// Group students and compute the processor's aggregates per group
    pub fn group_and_aggregate(
        &self,
        processor: &GroupByProcessor<'_, Student>,
    ) -> Result<AggregateTable, ProcessingError> {
        processor.process(self.store)
    }

    /// Run an aggregate request naming fields and functions
    pub fn handle_aggregate(&self, request: &AggregateRequest) -> Result<AggregateTable, ApiError> {
        if request.group_by.is_empty() {
            return Err(ApiError::ValidationError(
                "at least one group by field is required".to_string(),
            ));
        }

        let mut processor = GroupByProcessor::<Student>::new();
        for field in &request.group_by {
            processor = processor.group_by_field(field)?;
        }

        if request.aggregations.is_empty() {
            processor = processor.count("count");
        }
        for aggregation in &request.aggregations {
            processor = processor.aggregate_field(&aggregation.function, &aggregation.field)?;
        }

        Ok(self.group_and_aggregate(&processor)?)
    }

    /// Average GPA per major
    pub fn average_gpa_by_major(&self) -> Result<Vec<(String, f64)>, ProcessingError> {
        average_gpa_by_major(self.store)
    }

    /// Mean, median and standard deviation of a series
    pub fn statistics(values: &[f64]) -> Result<StatisticsResponse, ProcessingError> {
        let summary = summarize(values)?;
        Ok(StatisticsResponse {
            mean: summary.mean,
            median: summary.median,
            std_dev: summary.std_dev,
        })
    }

    /// Pearson correlation of two paired series
    pub fn correlation(xs: &[f64], ys: &[f64]) -> Result<f64, ProcessingError> {
        pearson_correlation(xs, ys)
    }

    /// Values of a numeric student field in store order
    pub fn field_values(&self, field: &str) -> Result<Vec<f64>, ProcessingError> {
        let read = numeric_field::<Student>(field)?;
        Ok(self.store.iter().map(|s| read(s)).collect())
    }

    /// Full summary of a numeric student field
    pub fn summarize_field(&self, field: &str) -> Result<Summary, ProcessingError> {
        summarize(&self.field_values(field)?)
    }

    /// Run a statistics request
    pub fn handle_stats(&self, request: &StatsRequest) -> Result<StatisticsResponse, ApiError> {
        Ok(Self::statistics(&self.field_values(&request.field)?)?)
    }

    /// Run a correlation request
    pub fn handle_correlation(&self, request: &CorrelationRequest) -> Result<f64, ApiError> {
        let xs = self.field_values(&request.x)?;
        let ys = self.field_values(&request.y)?;
        Ok(Self::correlation(&xs, &ys)?)
    }

    /// Values of a numeric student field with |z| above `threshold`
    pub fn outliers(&self, field: &str, threshold: f64) -> Result<Vec<f64>, ProcessingError> {
        z_score_outliers(&self.field_values(field)?, threshold)
    }

    /// Pivot students: a row key against bucketed numeric values
    pub fn pivot<R, C, B, A>(
        &self,
        row_key: R,
        column_value: C,
        buckets: &B,
        aggregate: &A,
    ) -> Result<PivotTable, ProcessingError>
    where
        R: Fn(&Student) -> Value,
        C: Fn(&Student) -> f64,
        B: BucketSelector + ?Sized,
        A: AggregateFunction<Student> + ?Sized,
    {
        pivot(self.store, row_key, column_value, buckets, aggregate)
    }

    /// Pivot enrollments: a student field against bucketed values of a course field
    pub fn pivot_enrollments<B, A>(
        &self,
        row_field: &str,
        column_field: &str,
        buckets: &B,
        aggregate: &A,
    ) -> Result<PivotTable, ProcessingError>
    where
        B: BucketSelector + ?Sized,
        A: AggregateFunction<Enrollment<'a>> + ?Sized,
    {
        let row = resolve_field::<Student>(row_field)?;
        let column = numeric_field::<Course>(column_field)?;
        let enrollments: Vec<Enrollment<'a>> = self.store.enrollments().collect();

        pivot(
            &enrollments,
            |e: &Enrollment<'a>| row.get(e.student),
            |e: &Enrollment<'a>| column(e.course),
            buckets,
            aggregate,
        )
    }

    /// Run a pivot request counting enrollments per grade range
    pub fn handle_pivot(&self, request: &PivotRequest) -> Result<PivotTable, ApiError> {
        Ok(self.pivot_enrollments(
            &request.row_field,
            &request.column_field,
            &RangeBuckets::grade_ranges(),
            &CountFunction,
        )?)
    }

    /// Course grades counted per major and grade range
    pub fn grade_distribution_by_major(&self) -> Result<PivotTable, ProcessingError> {
        self.pivot_enrollments("major", "grade", &RangeBuckets::grade_ranges(), &CountFunction)
    }

    /// Students sorted by a named field
    pub fn sort_by(&self, field: &str, order: SortOrder) -> Result<Vec<&'a Student>, ProcessingError> {
        sort_by_field(self.store, field, order)
    }

    /// Distinct names of courses whose name contains `needle`, first occurrence first
    pub fn course_names_containing(&self, needle: &str) -> Result<Vec<String>, ProcessingError> {
        let predicate = Predicate::<Course>::contains("name", needle)?;
        let mut seen = HashSet::new();

        Ok(predicate
            .filter(self.store.courses())
            .filter(|course| seen.insert(course.name.as_str()))
            .map(|course| course.name.clone())
            .collect())
    }

    /// Read one named field off every student
    pub fn column(&self, field: &str) -> Result<Vec<Value>, ProcessingError> {
        let descriptor = resolve_field::<Student>(field)?;
        Ok(self.store.iter().map(|s| descriptor.get(s)).collect())
    }
}

/// Type a request literal against the kind of the field it is compared with.
///
/// Strings stay strings unless the field is a date; numbers keep their own
/// kind, so a number aimed at a string field still fails as a type mismatch.
fn literal_for(value: &serde_json::Value, data_type: DataType) -> Result<Value, ApiError> {
    match value {
        serde_json::Value::String(text) => Ok(match data_type {
            DataType::Date => Value::parse_as(text, data_type),
            _ => Value::from(text.as_str()),
        }),
        serde_json::Value::Number(n) => n
            .as_i64()
            .map(Value::Integer)
            .or_else(|| n.as_f64().map(Value::Float))
            .ok_or_else(|| ApiError::ValidationError(format!("unsupported number {}", n))),
        other => Err(ApiError::ValidationError(format!(
            "filter value must be a string or a number, got {}",
            other
        ))),
    }
}
