// Pivot table tests
// Author: Gabriel Demetrios Lafis

use student_analytics_engine::{
    api::QueryEngine,
    data::{Enrollment, Student, Value},
    processing::{
        pivot, AvgFunction, BucketSelector, CountFunction, ProcessingError, RangeBuckets,
    },
    storage::RecordStore,
};

#[test]
fn test_grade_range_boundaries() {
    let ranges = RangeBuckets::grade_ranges();

    assert_eq!(ranges.bucket(0.0).unwrap(), "Below 2.5");
    assert_eq!(ranges.bucket(2.49).unwrap(), "Below 2.5");
    assert_eq!(ranges.bucket(2.5).unwrap(), "2.5-3.0");
    assert_eq!(ranges.bucket(3.0).unwrap(), "3.0-3.5");
    assert_eq!(ranges.bucket(3.5).unwrap(), "3.5-4.0");
    assert_eq!(ranges.bucket(4.0).unwrap(), "3.5-4.0");

    assert!(matches!(ranges.bucket(4.01), Err(ProcessingError::OutOfRange { .. })));
    assert!(matches!(ranges.bucket(-0.1), Err(ProcessingError::OutOfRange { .. })));
}

#[test]
fn test_range_buckets_validation() {
    assert!(RangeBuckets::new(vec![0.0, 1.0], vec!["low".to_string()]).is_ok());
    assert!(matches!(
        RangeBuckets::new(vec![0.0, 1.0, 2.0], vec!["low".to_string()]),
        Err(ProcessingError::InvalidArgument(_))
    ));
    assert!(matches!(
        RangeBuckets::new(vec![1.0, 1.0], vec!["flat".to_string()]),
        Err(ProcessingError::InvalidArgument(_))
    ));
}

#[test]
fn test_course_grades_by_major() {
    let store = RecordStore::sample().unwrap();
    let table = QueryEngine::new(&store).grade_distribution_by_major().unwrap();

    let cs = Value::from("Computer Science");
    let math = Value::from("Mathematics");

    assert_eq!(table.get(&cs, "3.5-4.0"), Some(&Value::Integer(4)));
    assert_eq!(table.get(&math, "3.0-3.5"), Some(&Value::Integer(2)));

    // Sparse: no zero-filled cells
    assert_eq!(table.get(&cs, "3.0-3.5"), None);
    assert_eq!(table.get(&math, "3.5-4.0"), None);
    assert_eq!(table.get(&cs, "Below 2.5"), None);
    assert_eq!(table.len(), 2);

    assert_eq!(table.rows(), &[cs, math]);
    assert_eq!(table.columns(), &["3.5-4.0".to_string(), "3.0-3.5".to_string()]);
}

#[test]
fn test_cell_counts_cover_enrollments() {
    let store = RecordStore::sample().unwrap();
    let table = QueryEngine::new(&store).grade_distribution_by_major().unwrap();

    let total: i64 = table
        .cells()
        .iter()
        .map(|cell| match cell.value {
            Value::Integer(n) => n,
            ref other => panic!("count is not an integer: {:?}", other),
        })
        .sum();
    assert_eq!(total as usize, store.enrollments().count());
}

#[test]
fn test_student_gpa_pivot() {
    let store = RecordStore::sample().unwrap();
    let table = pivot(
        &store,
        |s: &Student| Value::from(s.major.as_str()),
        |s: &Student| s.gpa,
        &RangeBuckets::grade_ranges(),
        &CountFunction,
    )
    .unwrap();

    assert_eq!(
        table.get(&Value::from("Computer Science"), "3.5-4.0"),
        Some(&Value::Integer(2))
    );
    assert_eq!(
        table.get(&Value::from("Mathematics"), "3.0-3.5"),
        Some(&Value::Integer(1))
    );
}

#[test]
fn test_pivot_with_closure_buckets_and_average() {
    let store = RecordStore::sample().unwrap();
    let engine = QueryEngine::new(&store);

    let honors = |grade: f64| {
        if grade >= 3.8 {
            "honors".to_string()
        } else {
            "regular".to_string()
        }
    };
    let table = engine
        .pivot_enrollments(
            "major",
            "grade",
            &honors,
            &AvgFunction::new(|e: &Enrollment| e.course.grade),
        )
        .unwrap();

    let cs = Value::from("Computer Science");
    let math = Value::from("Mathematics");

    match table.get(&cs, "honors") {
        Some(Value::Float(avg)) => assert!((avg - 3.9).abs() < 1e-9),
        other => panic!("unexpected cell {:?}", other),
    }
    assert_eq!(table.get(&cs, "regular"), Some(&Value::Float(3.7)));
    match table.get(&math, "regular") {
        Some(Value::Float(avg)) => assert!((avg - 3.2).abs() < 1e-9),
        other => panic!("unexpected cell {:?}", other),
    }
    assert_eq!(table.get(&math, "honors"), None);
}

#[test]
fn test_pivot_value_outside_buckets() {
    let store = RecordStore::sample().unwrap();
    let low_only = RangeBuckets::new(vec![0.0, 1.0], vec!["low".to_string()]).unwrap();

    let result = pivot(
        &store,
        |s: &Student| Value::from(s.major.as_str()),
        |s: &Student| s.gpa,
        &low_only,
        &CountFunction,
    );
    assert!(matches!(result, Err(ProcessingError::OutOfRange { .. })));
}

#[test]
fn test_pivot_empty_input() {
    let students: Vec<Student> = Vec::new();
    let table = pivot(
        &students,
        |s: &Student| Value::from(s.major.as_str()),
        |s: &Student| s.gpa,
        &RangeBuckets::grade_ranges(),
        &CountFunction,
    )
    .unwrap();

    assert!(table.is_empty());
    assert!(table.rows().is_empty());
}

#[test]
fn test_pivot_unknown_fields() {
    let store = RecordStore::sample().unwrap();
    let engine = QueryEngine::new(&store);

    assert!(matches!(
        engine.pivot_enrollments("nickname", "grade", &RangeBuckets::grade_ranges(), &CountFunction),
        Err(ProcessingError::UnknownField { .. })
    ));
    assert!(matches!(
        engine.pivot_enrollments("major", "semester", &RangeBuckets::grade_ranges(), &CountFunction),
        Err(ProcessingError::InvalidArgument(_))
    ));
}
