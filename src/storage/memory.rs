// In-memory record store
// Author: Gabriel Demetrios Lafis

use std::collections::HashMap;

use log::debug;

use crate::data::{sample_students, Course, DataError, Enrollment, Student};
use crate::utils::validate_student;

/// Validated, read-only set of students.
///
/// Every student is checked on construction: ids are unique and positive,
/// ages and course credits are positive, GPA and course grades lie in
/// `[0.0, 4.0]`. Nothing is clamped; the first violation is returned.
#[derive(Debug, Clone)]
pub struct RecordStore {
    students: Vec<Student>,
    index: HashMap<u32, usize>,
}

impl RecordStore {
    /// Build a store from already-loaded students
    pub fn new(students: Vec<Student>) -> Result<Self, DataError> {
        let mut index = HashMap::with_capacity(students.len());

        for (position, student) in students.iter().enumerate() {
            validate_student(student)?;

            if index.insert(student.id, position).is_some() {
                return Err(DataError::DuplicateId(student.id));
            }
        }

        debug!("Record store built with {} students", students.len());

        Ok(RecordStore { students, index })
    }

    /// Store holding the built-in sample dataset
    pub fn sample() -> Result<Self, DataError> {
        Self::new(sample_students()?)
    }

    /// All students in load order
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    /// Iterate over students in load order
    pub fn iter(&self) -> std::slice::Iter<'_, Student> {
        self.students.iter()
    }

    /// Get the number of students
    pub fn len(&self) -> usize {
        self.students.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Look up a student by id
    pub fn get(&self, id: u32) -> Option<&Student> {
        self.index.get(&id).map(|&i| &self.students[i])
    }

    /// Every course of every student
    pub fn courses(&self) -> impl Iterator<Item = &Course> + '_ {
        self.students.iter().flat_map(|s| s.courses.iter())
    }

    /// Every (student, course) pair
    pub fn enrollments(&self) -> impl Iterator<Item = Enrollment<'_>> + '_ {
        self.students.iter().flat_map(|student| {
            student
                .courses
                .iter()
                .map(move |course| Enrollment { student, course })
        })
    }
}

impl<'a> IntoIterator for &'a RecordStore {
    type Item = &'a Student;
    type IntoIter = std::slice::Iter<'a, Student>;

    fn into_iter(self) -> Self::IntoIter {
        self.students.iter()
    }
}
