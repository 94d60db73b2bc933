// Built-in sample dataset
// Author: Gabriel Demetrios Lafis

use super::{parse_students, DataError, Student};

/// Three students across two majors, two courses each
pub const SAMPLE_STUDENTS_JSON: &str = r#"[
  {
    "id": 1, "name": "Alice Johnson", "age": 20, "major": "Computer Science",
    "gpa": 3.8, "enrollmentDate": "2022-09-01", "email": "alice.j@university.edu",
    "address": { "city": "Seattle", "state": "WA", "zipCode": "98101" },
    "courses": [
      { "code": "CS101", "name": "Intro to Programming", "credits": 3, "grade": 3.7,
        "semester": "Fall 2022", "instructor": "Dr. Smith" },
      { "code": "MATH201", "name": "Calculus II", "credits": 4, "grade": 3.9,
        "semester": "Fall 2022", "instructor": "Prof. Johnson" }
    ]
  },
  {
    "id": 2, "name": "Bob Wilson", "age": 22, "major": "Mathematics",
    "gpa": 3.2, "enrollmentDate": "2021-09-01", "email": "bob.w@university.edu",
    "address": { "city": "Portland", "state": "OR", "zipCode": "97201" },
    "courses": [
      { "code": "MATH301", "name": "Linear Algebra", "credits": 3, "grade": 3.3,
        "semester": "Spring 2023", "instructor": "Dr. Brown" },
      { "code": "STAT101", "name": "Statistics", "credits": 3, "grade": 3.1,
        "semester": "Spring 2023", "instructor": "Prof. Davis" }
    ]
  },
  {
    "id": 3, "name": "Carol Davis", "age": 19, "major": "Computer Science",
    "gpa": 3.9, "enrollmentDate": "2023-09-01", "email": "carol.d@university.edu",
    "address": { "city": "San Francisco", "state": "CA", "zipCode": "94101" },
    "courses": [
      { "code": "CS102", "name": "Data Structures", "credits": 4, "grade": 4.0,
        "semester": "Fall 2023", "instructor": "Dr. Smith" },
      { "code": "CS201", "name": "Algorithms", "credits": 3, "grade": 3.8,
        "semester": "Fall 2023", "instructor": "Prof. Lee" }
    ]
  }
]"#;

/// The sample students, freshly decoded
pub fn sample_students() -> Result<Vec<Student>, DataError> {
    parse_students(SAMPLE_STUDENTS_JSON)
}
