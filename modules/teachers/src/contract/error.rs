use thiserror::Error;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TeachersError {
    #[error("Teacher not found: {id}")]
    NotFound { id: i64 },

    #[error("No teacher with lastname starting with '{prefix}'")]
    NoMatch { prefix: String },

    #[error("Internal error")]
    Internal,
}

impl TeachersError {
    pub fn not_found(id: i64) -> Self {
        Self::NotFound { id }
    }

    pub fn no_match(prefix: impl Into<String>) -> Self {
        Self::NoMatch {
            prefix: prefix.into(),
        }
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}

impl From<crate::domain::error::DomainError> for TeachersError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            TeacherNotFound { id } => Self::not_found(id),
            NoTeachersWithLastname { prefix } => Self::no_match(prefix),
            Database { .. } => Self::internal(),
        }
    }
}
