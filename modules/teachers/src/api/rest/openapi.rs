use utoipa::OpenApi;

use crate::api::rest::dto::{TeacherInsertDto, TeacherReadOnlyDto, TeacherUpdateDto};
use crate::api::rest::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Teachers API",
        description = "CRUD endpoints for the teacher resource"
    ),
    paths(
        handlers::get_teachers_by_lastname,
        handlers::get_teacher,
        handlers::create_teacher,
        handlers::update_teacher,
        handlers::delete_teacher,
    ),
    components(schemas(TeacherReadOnlyDto, TeacherInsertDto, TeacherUpdateDto)),
    tags((name = "teachers", description = "Teacher management"))
)]
pub struct TeachersApiDoc;
