// Validation utilities
// Author: Gabriel Demetrios Lafis

use crate::data::{DataError, Student, MAX_GRADE, MIN_GRADE};

/// Validate that a GPA or grade lies in the allowed range
pub fn validate_grade(entity: &str, field: &'static str, value: f64) -> Result<(), DataError> {
    if (MIN_GRADE..=MAX_GRADE).contains(&value) {
        Ok(())
    } else {
        Err(DataError::GradeOutOfRange {
            entity: entity.to_string(),
            field,
            value,
        })
    }
}

/// Validate that an integer attribute is positive
pub fn validate_positive(entity: &str, field: &'static str, value: u32) -> Result<(), DataError> {
    if value == 0 {
        Err(DataError::NotPositive {
            entity: entity.to_string(),
            field,
        })
    } else {
        Ok(())
    }
}

/// Validate a student and each of their courses
pub fn validate_student(student: &Student) -> Result<(), DataError> {
    let entity = format!("student {}", student.id);

    validate_positive(&entity, "id", student.id)?;
    validate_positive(&entity, "age", student.age)?;
    validate_grade(&entity, "gpa", student.gpa)?;

    for course in &student.courses {
        let entity = format!("course {} of student {}", course.code, student.id);
        validate_positive(&entity, "credits", course.credits)?;
        validate_grade(&entity, "grade", course.grade)?;
    }

    Ok(())
}
