// Student Analytics Engine
// Author: Gabriel Demetrios Lafis

//! # Student Analytics Engine
//!
//! An in-memory query, aggregation and statistics engine over students and
//! the courses they take.
//!
//! ## Features
//!
//! - Validated, read-only record store loaded from JSON or YAML
//! - Predicates built from a field name, an operator and a literal
//! - Multi-key grouping with count, sum, average, min and max
//! - Mean, median, standard deviation, Pearson correlation, percentile rank
//!   and z-score outliers
//! - Sparse pivot tables over bucketed numeric values
//!
//! ## Example
//!
//! ```rust
//! use student_analytics_engine::{
//!     api::QueryEngine,
//!     data::Value,
//!     processing::ComparisonOperator,
//!     storage::RecordStore,
//! };
//!
//! let store = RecordStore::sample().unwrap();
//! let engine = QueryEngine::new(&store);
//!
//! let honors: Vec<_> = engine
//!     .filter("gpa", ComparisonOperator::GreaterThan, Value::Float(3.5))
//!     .unwrap()
//!     .map(|s| s.name.as_str())
//!     .collect();
//! assert_eq!(honors, vec!["Alice Johnson", "Carol Davis"]);
//!
//! let pivot = engine.grade_distribution_by_major().unwrap();
//! assert_eq!(
//!     pivot.get(&Value::from("Mathematics"), "3.0-3.5"),
//!     Some(&Value::Integer(2))
//! );
//! ```

pub mod api;
pub mod data;
pub mod processing;
pub mod report;
pub mod storage;
pub mod utils;

// Re-export main types
pub use api::QueryEngine;
pub use data::{Course, DataType, Record, Student, Value};
pub use processing::{GroupByProcessor, Predicate, ProcessingError};
pub use storage::RecordStore;
pub use utils::Config;
