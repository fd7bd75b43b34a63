//! Per-operation REST errors.
//!
//! Every variant renders as a bare status code with an empty body. Storage
//! failures are logged at `error`, everything else at `debug`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{debug, error};

use crate::api::rest::validation::ValidationErrors;
use crate::domain::error::DomainError;

#[derive(Debug, Error)]
pub enum ListTeachersError {
    #[error("invalid query: {0}")]
    InvalidQuery(String),
    #[error("no teachers with lastname starting with '{prefix}'")]
    NoMatch { prefix: String },
    #[error("storage failure: {0}")]
    Internal(String),
}

impl ListTeachersError {
    pub fn status(&self) -> StatusCode {
        match self {
            // An empty search is reported as a bad request, not as an empty list.
            Self::InvalidQuery(_) | Self::NoMatch { .. } => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Error)]
pub enum GetTeacherError {
    #[error("invalid teacher id: {0}")]
    InvalidId(String),
    #[error("teacher {id} not found")]
    NotFound { id: i64 },
    #[error("storage failure: {0}")]
    Internal(String),
}

impl GetTeacherError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidId(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Error)]
pub enum CreateTeacherError {
    #[error("invalid request body: {0}")]
    InvalidBody(String),
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("teacher could not be created: {0}")]
    Unavailable(String),
}

impl CreateTeacherError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidBody(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[derive(Debug, Error)]
pub enum UpdateTeacherError {
    #[error("path id {path} does not match body id {body}")]
    IdMismatch { path: i64, body: i64 },
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("teacher {id} not found")]
    NotFound { id: i64 },
    #[error("storage failure: {0}")]
    Internal(String),
}

impl UpdateTeacherError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::IdMismatch { .. } => StatusCode::UNAUTHORIZED,
            Self::InvalidRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Error)]
pub enum DeleteTeacherError {
    #[error("invalid teacher id: {0}")]
    InvalidId(String),
    #[error("teacher {id} not found")]
    NotFound { id: i64 },
    #[error("storage failure: {0}")]
    Internal(String),
}

impl DeleteTeacherError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidId(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Domain error mapping. Each operation translates exactly one not-found
// condition; everything else is an infrastructure failure.

impl From<DomainError> for ListTeachersError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NoTeachersWithLastname { prefix } => Self::NoMatch { prefix },
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<DomainError> for GetTeacherError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::TeacherNotFound { id } => Self::NotFound { id },
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<DomainError> for CreateTeacherError {
    fn from(e: DomainError) -> Self {
        Self::Unavailable(e.to_string())
    }
}

impl From<DomainError> for UpdateTeacherError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::TeacherNotFound { id } => Self::NotFound { id },
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<DomainError> for DeleteTeacherError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::TeacherNotFound { id } => Self::NotFound { id },
            other => Self::Internal(other.to_string()),
        }
    }
}

fn bare_status(status: StatusCode, message: &dyn std::fmt::Display) -> Response {
    if status.is_server_error() {
        error!(status = status.as_u16(), "{}", message);
    } else {
        debug!(status = status.as_u16(), "{}", message);
    }
    status.into_response()
}

macro_rules! impl_into_response {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl IntoResponse for $ty {
                fn into_response(self) -> Response {
                    bare_status(self.status(), &self)
                }
            }
        )+
    };
}

impl_into_response!(
    ListTeachersError,
    GetTeacherError,
    CreateTeacherError,
    UpdateTeacherError,
    DeleteTeacherError,
);
