use async_trait::async_trait;

use crate::contract::{
    error::TeachersError,
    model::{NewTeacher, Teacher, TeacherUpdate},
};

/// Public API trait for the teachers module that other modules can use
#[async_trait]
pub trait TeachersApi: Send + Sync {
    /// Teachers whose lastname starts with `prefix`, ordered by id
    async fn get_teachers_by_lastname(&self, prefix: &str) -> Result<Vec<Teacher>, TeachersError>;

    async fn get_teacher(&self, id: i64) -> Result<Teacher, TeachersError>;

    async fn insert_teacher(&self, new_teacher: NewTeacher) -> Result<Teacher, TeachersError>;

    async fn update_teacher(
        &self,
        id: i64,
        update: TeacherUpdate,
    ) -> Result<Teacher, TeachersError>;

    /// Delete by id, returning the removed teacher
    async fn delete_teacher(&self, id: i64) -> Result<Teacher, TeachersError>;
}
