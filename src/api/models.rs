// Query request and response models
// Author: Gabriel Demetrios Lafis

use serde::{Deserialize, Serialize};

/// Request to filter students by `field operator value`.
///
/// `value` is kept as sent and typed against the field when the request runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRequest {
    pub field: String,
    pub operator: String,
    pub value: serde_json::Value,
}

/// Aggregation definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Aggregation {
    pub function: String,
    pub field: String,
}

/// Request to group students and aggregate each group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateRequest {
    pub group_by: Vec<String>,
    #[serde(default)]
    pub aggregations: Vec<Aggregation>,
}

/// Request for statistics on one numeric student field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsRequest {
    pub field: String,
}

/// Request for the correlation between two numeric student fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationRequest {
    pub x: String,
    pub y: String,
}

/// Request to pivot enrollments: a student field against bucketed course values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PivotRequest {
    pub row_field: String,
    pub column_field: String,
}

/// Mean, median and population standard deviation of a series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatisticsResponse {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
}
