use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::contract::model::{NewTeacher, Teacher, TeacherUpdate};

/// REST DTO for teacher representation (output only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TeacherReadOnlyDto {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
}

/// REST DTO for creating a teacher
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TeacherInsertDto {
    pub firstname: String,
    pub lastname: String,
}

/// REST DTO for updating a teacher. `id` must repeat the path id.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TeacherUpdateDto {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
}

/// Query string of the lastname search
#[derive(Debug, Clone, Deserialize)]
pub struct LastnameQuery {
    pub lastname: String,
}

// Conversion implementations between REST DTOs and contract models

impl From<Teacher> for TeacherReadOnlyDto {
    fn from(teacher: Teacher) -> Self {
        Self {
            id: teacher.id,
            firstname: teacher.firstname,
            lastname: teacher.lastname,
        }
    }
}

impl From<TeacherInsertDto> for NewTeacher {
    fn from(req: TeacherInsertDto) -> Self {
        Self {
            firstname: req.firstname,
            lastname: req.lastname,
        }
    }
}

impl From<TeacherUpdateDto> for TeacherUpdate {
    fn from(req: TeacherUpdateDto) -> Self {
        Self {
            firstname: req.firstname,
            lastname: req.lastname,
        }
    }
}
