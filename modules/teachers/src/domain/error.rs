use thiserror::Error;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Teacher not found: {id}")]
    TeacherNotFound { id: i64 },

    #[error("No teachers with lastname starting with '{prefix}'")]
    NoTeachersWithLastname { prefix: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn teacher_not_found(id: i64) -> Self {
        Self::TeacherNotFound { id }
    }

    pub fn no_teachers_with_lastname(prefix: impl Into<String>) -> Self {
        Self::NoTeachersWithLastname {
            prefix: prefix.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}
