use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::contract::model::{NewTeacher, Teacher};
use crate::domain::repo::TeachersRepository;

/// Process-local store. Ids start at 1 and are never reused.
pub struct InMemoryTeachersRepository {
    rows: RwLock<BTreeMap<i64, Teacher>>,
    next_id: AtomicI64,
}

impl Default for InMemoryTeachersRepository {
    fn default() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl InMemoryTeachersRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TeachersRepository for InMemoryTeachersRepository {
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Teacher>> {
        Ok(self.rows.read().get(&id).cloned())
    }

    async fn find_by_lastname_prefix(&self, prefix: &str) -> anyhow::Result<Vec<Teacher>> {
        Ok(self
            .rows
            .read()
            .values()
            .filter(|t| t.lastname.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn insert(&self, new_teacher: NewTeacher) -> anyhow::Result<Teacher> {
        let mut rows = self.rows.write();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let teacher = Teacher {
            id,
            firstname: new_teacher.firstname,
            lastname: new_teacher.lastname,
        };
        rows.insert(id, teacher.clone());
        Ok(teacher)
    }

    async fn update(&self, t: Teacher) -> anyhow::Result<bool> {
        let mut rows = self.rows.write();
        match rows.get_mut(&t.id) {
            Some(slot) => {
                *slot = t;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i64) -> anyhow::Result<Option<Teacher>> {
        Ok(self.rows.write().remove(&id))
    }
}
