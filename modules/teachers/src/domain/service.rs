use std::sync::Arc;

use crate::contract::model::{NewTeacher, Teacher, TeacherUpdate};
use crate::domain::error::DomainError;
use crate::domain::repo::TeachersRepository;
use tracing::{debug, info, instrument};

/// Domain service for teacher management.
/// Depends only on the repository port, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn TeachersRepository>,
}

impl Service {
    pub fn new(repo: Arc<dyn TeachersRepository>) -> Self {
        Self { repo }
    }

    #[instrument(name = "teachers.service.get_teachers_by_lastname", skip(self))]
    pub async fn get_teachers_by_lastname(&self, prefix: &str) -> Result<Vec<Teacher>, DomainError> {
        debug!("Searching teachers by lastname prefix");

        let teachers = self
            .repo
            .find_by_lastname_prefix(prefix)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        if teachers.is_empty() {
            return Err(DomainError::no_teachers_with_lastname(prefix));
        }

        debug!("Found {} teachers", teachers.len());
        Ok(teachers)
    }

    #[instrument(name = "teachers.service.get_teacher_by_id", skip(self), fields(teacher_id = id))]
    pub async fn get_teacher_by_id(&self, id: i64) -> Result<Teacher, DomainError> {
        debug!("Getting teacher by id");

        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::teacher_not_found(id))
    }

    #[instrument(
        name = "teachers.service.insert_teacher",
        skip(self),
        fields(lastname = %new_teacher.lastname)
    )]
    pub async fn insert_teacher(&self, new_teacher: NewTeacher) -> Result<Teacher, DomainError> {
        info!("Creating new teacher");

        let teacher = self
            .repo
            .insert(NewTeacher {
                firstname: new_teacher.firstname.trim().to_string(),
                lastname: new_teacher.lastname.trim().to_string(),
            })
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        info!("Successfully created teacher with id={}", teacher.id);
        Ok(teacher)
    }

    #[instrument(name = "teachers.service.update_teacher", skip(self, update), fields(teacher_id = id))]
    pub async fn update_teacher(
        &self,
        id: i64,
        update: TeacherUpdate,
    ) -> Result<Teacher, DomainError> {
        info!("Updating teacher");

        let mut current = self.get_teacher_by_id(id).await?;
        current.firstname = update.firstname.trim().to_string();
        current.lastname = update.lastname.trim().to_string();

        let updated = self
            .repo
            .update(current.clone())
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        // Deleted between the read and the write.
        if !updated {
            return Err(DomainError::teacher_not_found(id));
        }

        info!("Successfully updated teacher");
        Ok(current)
    }

    #[instrument(name = "teachers.service.delete_teacher", skip(self), fields(teacher_id = id))]
    pub async fn delete_teacher(&self, id: i64) -> Result<Teacher, DomainError> {
        info!("Deleting teacher");

        let deleted = self
            .repo
            .delete(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::teacher_not_found(id))?;

        info!("Successfully deleted teacher");
        Ok(deleted)
    }
}
