use async_trait::async_trait;
use std::sync::Arc;

use crate::contract::{
    client::TeachersApi,
    error::TeachersError,
    model::{NewTeacher, Teacher, TeacherUpdate},
};
use crate::domain::service::Service;

/// Local implementation of the TeachersApi trait that delegates to the domain service
pub struct TeachersLocalClient {
    service: Arc<Service>,
}

impl TeachersLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl TeachersApi for TeachersLocalClient {
    async fn get_teachers_by_lastname(&self, prefix: &str) -> Result<Vec<Teacher>, TeachersError> {
        self.service
            .get_teachers_by_lastname(prefix)
            .await
            .map_err(Into::into)
    }

    async fn get_teacher(&self, id: i64) -> Result<Teacher, TeachersError> {
        self.service.get_teacher_by_id(id).await.map_err(Into::into)
    }

    async fn insert_teacher(&self, new_teacher: NewTeacher) -> Result<Teacher, TeachersError> {
        self.service
            .insert_teacher(new_teacher)
            .await
            .map_err(Into::into)
    }

    async fn update_teacher(
        &self,
        id: i64,
        update: TeacherUpdate,
    ) -> Result<Teacher, TeachersError> {
        self.service
            .update_teacher(id, update)
            .await
            .map_err(Into::into)
    }

    async fn delete_teacher(&self, id: i64) -> Result<Teacher, TeachersError> {
        self.service.delete_teacher(id).await.map_err(Into::into)
    }
}
