// Record store and loader tests
// Author: Gabriel Demetrios Lafis

use std::fs;

use chrono::NaiveDate;
use student_analytics_engine::{
    data::{
        parse_students, Course, DataError, JsonSource, Record, Student, Value, SAMPLE_STUDENTS_JSON,
    },
    storage::{load_store, FileFormat, FileStorage, RecordStore, StorageError},
};
use tempfile::tempdir;

fn student(id: u32, major: &str, gpa: f64) -> Student {
    Student {
        id,
        name: format!("Student {}", id),
        age: 20,
        major: major.to_string(),
        gpa,
        enrollment_date: NaiveDate::from_ymd_opt(2022, 9, 1).unwrap(),
        email: format!("s{}@university.edu", id),
        address: None,
        courses: Vec::new(),
    }
}

fn course(code: &str, grade: f64) -> Course {
    Course {
        code: code.to_string(),
        name: format!("Course {}", code),
        credits: 3,
        grade,
        semester: "Fall 2022".to_string(),
        instructor: "Dr. Smith".to_string(),
    }
}

#[test]
fn test_sample_store() {
    let store = RecordStore::sample().unwrap();

    assert_eq!(store.len(), 3);
    assert_eq!(store.courses().count(), 6);
    assert_eq!(store.enrollments().count(), 6);

    let bob = store.get(2).unwrap();
    assert_eq!(bob.name, "Bob Wilson");
    assert_eq!(bob.total_credits(), 6);
    assert!(store.get(42).is_none());
}

#[test]
fn test_duplicate_id_rejected() {
    let result = RecordStore::new(vec![
        student(1, "Physics", 3.0),
        student(2, "Physics", 3.1),
        student(1, "Biology", 2.9),
    ]);

    match result {
        Err(DataError::DuplicateId(id)) => assert_eq!(id, 1),
        other => panic!("expected DuplicateId, got {:?}", other),
    }
}

#[test]
fn test_gpa_out_of_range_rejected() {
    let result = RecordStore::new(vec![student(1, "Physics", 4.2)]);

    match result {
        Err(DataError::GradeOutOfRange { field, value, .. }) => {
            assert_eq!(field, "gpa");
            assert_eq!(value, 4.2);
        }
        other => panic!("expected GradeOutOfRange, got {:?}", other),
    }
}

#[test]
fn test_course_grade_out_of_range_rejected() {
    let mut s = student(1, "Physics", 3.0);
    s.courses.push(course("PHY101", -0.5));

    assert!(matches!(
        RecordStore::new(vec![s]),
        Err(DataError::GradeOutOfRange { field: "grade", .. })
    ));
}

#[test]
fn test_zero_age_rejected() {
    let mut s = student(1, "Physics", 3.0);
    s.age = 0;

    assert!(matches!(
        RecordStore::new(vec![s]),
        Err(DataError::NotPositive { field: "age", .. })
    ));
}

#[test]
fn test_boundary_grades_accepted() {
    let mut low = student(1, "Physics", 0.0);
    low.courses.push(course("PHY101", 4.0));

    let store = RecordStore::new(vec![low, student(2, "Physics", 4.0)]).unwrap();
    assert_eq!(store.len(), 2);
}

#[test]
fn test_field_resolution() {
    let store = RecordStore::sample().unwrap();
    let alice = store.get(1).unwrap();

    assert_eq!(alice.get_field("gpa"), Some(Value::Float(3.8)));
    assert_eq!(alice.get_field("age"), Some(Value::Integer(20)));
    assert_eq!(
        alice.get_field("enrollmentDate"),
        Some(Value::Date(NaiveDate::from_ymd_opt(2022, 9, 1).unwrap()))
    );
    assert_eq!(alice.get_field("nickname"), None);
    assert_eq!(alice.get_field("GPA"), None);
}

#[test]
fn test_parse_wrapped_document() {
    let json = r#"{"students": [{
        "id": 7, "name": "Dana", "age": 21, "major": "Biology", "gpa": 3.4,
        "enrollmentDate": "2021-01-15", "email": "dana@university.edu"
    }]}"#;

    let students = parse_students(json).unwrap();
    assert_eq!(students.len(), 1);
    assert_eq!(students[0].id, 7);
    assert!(students[0].courses.is_empty());
    assert!(students[0].address.is_none());
}

#[test]
fn test_load_json_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("students.json");

    let sample = RecordStore::sample().unwrap();
    fs::write(&path, serde_json::to_string(sample.students()).unwrap()).unwrap();

    let loaded = load_store(&path).unwrap();
    assert_eq!(loaded.students(), sample.students());
}

#[test]
fn test_json_source_reads_wrapped_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("students.json");

    let sample = RecordStore::sample().unwrap();
    let document = serde_json::json!({ "students": sample.students() });
    fs::write(&path, document.to_string()).unwrap();

    let source = JsonSource::new(&path);
    assert_eq!(source.path(), path.as_path());

    let students = source.read().unwrap();
    assert_eq!(students.len(), 3);
    assert_eq!(students[2].courses[0].code, "CS102");
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let source = JsonSource::new(dir.path().join("absent.json"));

    assert!(matches!(source.read(), Err(DataError::IoError(_))));
}

#[test]
fn test_load_yaml_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("students.yaml");

    fs::write(
        &path,
        r#"
- id: 1
  name: Erin
  age: 23
  major: Chemistry
  gpa: 3.6
  enrollmentDate: 2020-09-01
  email: erin@university.edu
  courses:
    - code: CHEM101
      name: General Chemistry
      credits: 4
      grade: 3.5
      semester: Fall 2020
      instructor: Dr. White
"#,
    )
    .unwrap();

    let storage = FileStorage::open(&path).unwrap();
    assert_eq!(storage.format(), FileFormat::Yaml);

    let store = storage.load().unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(1).unwrap().courses[0].code, "CHEM101");
}

#[test]
fn test_load_rejects_invalid_records() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("students.json");

    let mut students = RecordStore::sample().unwrap().students().to_vec();
    students[1].id = students[0].id;
    fs::write(&path, serde_json::to_string(&students).unwrap()).unwrap();

    assert!(matches!(
        load_store(&path),
        Err(StorageError::DataError(DataError::DuplicateId(1)))
    ));
}

#[test]
fn test_unknown_extension() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("students.txt");
    fs::write(&path, "[]").unwrap();

    assert!(matches!(
        load_store(&path),
        Err(StorageError::InvalidFormat(_))
    ));
}

#[test]
fn test_explicit_format_ignores_extension() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("students.txt");
    fs::write(&path, SAMPLE_STUDENTS_JSON).unwrap();

    let storage = FileStorage::new(&path, FileFormat::Json);
    assert_eq!(storage.format().extension(), "json");
    assert_eq!(storage.path(), path.as_path());
    assert_eq!(storage.load().unwrap().len(), 3);
}
