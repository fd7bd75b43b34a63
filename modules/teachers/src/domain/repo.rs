use crate::contract::model::{NewTeacher, Teacher};
use async_trait::async_trait;

/// Port for the domain layer: persistence operations the domain needs.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait TeachersRepository: Send + Sync {
    /// Load a teacher by id.
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Teacher>>;
    /// Teachers whose lastname starts with `prefix` (case-sensitive), ordered by id.
    async fn find_by_lastname_prefix(&self, prefix: &str) -> anyhow::Result<Vec<Teacher>>;
    /// Persist a new teacher; the store assigns the id.
    async fn insert(&self, new_teacher: NewTeacher) -> anyhow::Result<Teacher>;
    /// Overwrite an existing teacher (by primary key in `t.id`).
    /// Returns false if no such row exists.
    async fn update(&self, t: Teacher) -> anyhow::Result<bool>;
    /// Delete by id, returning the removed row.
    async fn delete(&self, id: i64) -> anyhow::Result<Option<Teacher>>;
}
