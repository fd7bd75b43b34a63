/// Pure teacher model for inter-module communication (no serde/utoipa)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Teacher {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
}

/// Data for creating a new teacher; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTeacher {
    pub firstname: String,
    pub lastname: String,
}

/// Full replacement of a teacher's names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeacherUpdate {
    pub firstname: String,
    pub lastname: String,
}
