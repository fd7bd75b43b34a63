use crate::contract::model::Teacher;
use crate::infra::storage::entity::Model as TeacherEntity;

/// Convert a database entity to a contract model
pub fn entity_to_contract(entity: TeacherEntity) -> Teacher {
    Teacher {
        id: i64::from(entity.id),
        firstname: entity.firstname,
        lastname: entity.lastname,
    }
}
