// Field schema tables for dynamic field access
// Author: Gabriel Demetrios Lafis

use std::fmt;

use super::{Course, DataType, Student, Value};

/// Reads one field off a record
pub type FieldAccessor<T> = fn(&T) -> Value;

/// A named, typed field of a record type
pub struct FieldDescriptor<T> {
    name: &'static str,
    data_type: DataType,
    accessor: FieldAccessor<T>,
}

impl<T> FieldDescriptor<T> {
    /// Field name as used in queries
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Kind of value the field holds
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Read the field off a record
    pub fn get(&self, record: &T) -> Value {
        (self.accessor)(record)
    }
}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("data_type", &self.data_type)
            .finish()
    }
}

/// A record type whose fields can be addressed by name.
///
/// The schema is a fixed table built at compile time; lookups are exact and
/// case-sensitive.
pub trait Record: Sized + 'static {
    /// Entity name used in error messages
    const ENTITY: &'static str;

    /// All queryable fields, in declaration order
    fn fields() -> &'static [FieldDescriptor<Self>];

    /// Look up a field descriptor by name
    fn field(name: &str) -> Option<&'static FieldDescriptor<Self>> {
        Self::fields().iter().find(|f| f.name == name)
    }

    /// Read a named field, if the schema has it
    fn get_field(&self, name: &str) -> Option<Value> {
        Self::field(name).map(|f| f.get(self))
    }
}

const STUDENT_FIELDS: &[FieldDescriptor<Student>] = &[
    FieldDescriptor {
        name: "id",
        data_type: DataType::Integer,
        accessor: |s| Value::from(s.id),
    },
    FieldDescriptor {
        name: "name",
        data_type: DataType::String,
        accessor: |s| Value::from(s.name.as_str()),
    },
    FieldDescriptor {
        name: "age",
        data_type: DataType::Integer,
        accessor: |s| Value::from(s.age),
    },
    FieldDescriptor {
        name: "major",
        data_type: DataType::String,
        accessor: |s| Value::from(s.major.as_str()),
    },
    FieldDescriptor {
        name: "gpa",
        data_type: DataType::Float,
        accessor: |s| Value::Float(s.gpa),
    },
    FieldDescriptor {
        name: "enrollmentDate",
        data_type: DataType::Date,
        accessor: |s| Value::Date(s.enrollment_date),
    },
    FieldDescriptor {
        name: "email",
        data_type: DataType::String,
        accessor: |s| Value::from(s.email.as_str()),
    },
];

const COURSE_FIELDS: &[FieldDescriptor<Course>] = &[
    FieldDescriptor {
        name: "code",
        data_type: DataType::String,
        accessor: |c| Value::from(c.code.as_str()),
    },
    FieldDescriptor {
        name: "name",
        data_type: DataType::String,
        accessor: |c| Value::from(c.name.as_str()),
    },
    FieldDescriptor {
        name: "credits",
        data_type: DataType::Integer,
        accessor: |c| Value::from(c.credits),
    },
    FieldDescriptor {
        name: "grade",
        data_type: DataType::Float,
        accessor: |c| Value::Float(c.grade),
    },
    FieldDescriptor {
        name: "semester",
        data_type: DataType::String,
        accessor: |c| Value::from(c.semester.as_str()),
    },
    FieldDescriptor {
        name: "instructor",
        data_type: DataType::String,
        accessor: |c| Value::from(c.instructor.as_str()),
    },
];

impl Record for Student {
    const ENTITY: &'static str = "Student";

    fn fields() -> &'static [FieldDescriptor<Self>] {
        STUDENT_FIELDS
    }
}

impl Record for Course {
    const ENTITY: &'static str = "Course";

    fn fields() -> &'static [FieldDescriptor<Self>] {
        COURSE_FIELDS
    }
}
