use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query,
    },
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::Json,
    Extension,
};
use tracing::info;

use crate::api::rest::dto::{
    LastnameQuery, TeacherInsertDto, TeacherReadOnlyDto, TeacherUpdateDto,
};
use crate::api::rest::error::{
    CreateTeacherError, DeleteTeacherError, GetTeacherError, ListTeachersError,
    UpdateTeacherError,
};
use crate::api::rest::validation::{
    FieldRules, TeacherInsertValidator, TeacherUpdateValidator, ValidationErrors, Validator,
};
use crate::config::TeachersConfig;
use crate::domain::service::Service;

/// Base path of the teacher resource.
pub const TEACHERS_PATH: &str = "/api/teachers";

/// Everything the handlers need, shared through an `Extension`.
pub struct TeachersRestState {
    service: Arc<Service>,
    rules: FieldRules,
    insert_validator: Arc<dyn Validator<TeacherInsertDto>>,
    update_validator: Arc<dyn Validator<TeacherUpdateDto>>,
    public_base_url: Option<String>,
}

impl TeachersRestState {
    pub fn new(service: Arc<Service>, config: &TeachersConfig) -> Self {
        Self {
            service,
            rules: FieldRules::new(config.max_name_length),
            insert_validator: Arc::new(TeacherInsertValidator),
            update_validator: Arc::new(TeacherUpdateValidator),
            public_base_url: config
                .public_base_url
                .as_deref()
                .map(|s| s.trim_end_matches('/').to_string())
                .filter(|s| !s.is_empty()),
        }
    }

    pub fn with_insert_validator(mut self, v: Arc<dyn Validator<TeacherInsertDto>>) -> Self {
        self.insert_validator = v;
        self
    }

    pub fn with_update_validator(mut self, v: Arc<dyn Validator<TeacherUpdateDto>>) -> Self {
        self.update_validator = v;
        self
    }
}

/// Canonical URL of a teacher.
///
/// Prefers the configured public base URL, then the request's `Host` header
/// (scheme from `x-forwarded-proto` when it is http or https, else `http`),
/// then a root-relative path.
pub fn teacher_location(public_base_url: Option<&str>, headers: &HeaderMap, id: i64) -> String {
    let path = format!("{TEACHERS_PATH}/{id}");
    if let Some(base) = public_base_url {
        return format!("{base}{path}");
    }
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|h| !h.is_empty());
    match host {
        Some(host) => {
            let scheme = headers
                .get("x-forwarded-proto")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .and_then(|s| {
                    ["http", "https"]
                        .into_iter()
                        .find(|known| s.eq_ignore_ascii_case(known))
                })
                .unwrap_or("http");
            format!("{scheme}://{host}{path}")
        }
        None => path,
    }
}

/// Search teachers by lastname prefix
#[utoipa::path(
    get,
    path = "/api/teachers",
    tag = "teachers",
    params(("lastname" = String, Query, description = "Lastname prefix (case-sensitive)")),
    responses(
        (status = 200, description = "Matching teachers ordered by id", body = Vec<TeacherReadOnlyDto>),
        (status = 400, description = "Missing lastname or no teacher matches")
    )
)]
pub async fn get_teachers_by_lastname(
    Extension(state): Extension<Arc<TeachersRestState>>,
    query: Result<Query<LastnameQuery>, QueryRejection>,
) -> Result<Json<Vec<TeacherReadOnlyDto>>, ListTeachersError> {
    let Query(query) = query.map_err(|e| ListTeachersError::InvalidQuery(e.body_text()))?;
    info!("Searching teachers with lastname prefix: {:?}", query.lastname);

    let teachers = state
        .service
        .get_teachers_by_lastname(&query.lastname)
        .await?;
    Ok(Json(
        teachers.into_iter().map(TeacherReadOnlyDto::from).collect(),
    ))
}

/// Get a teacher by id
#[utoipa::path(
    get,
    path = "/api/teachers/{id}",
    tag = "teachers",
    params(("id" = i64, Path, description = "Teacher id")),
    responses(
        (status = 200, description = "Teacher found", body = TeacherReadOnlyDto),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Teacher not found")
    )
)]
pub async fn get_teacher(
    Extension(state): Extension<Arc<TeachersRestState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<TeacherReadOnlyDto>, GetTeacherError> {
    let Path(id) = id.map_err(|e| GetTeacherError::InvalidId(e.body_text()))?;
    info!("Getting teacher with id: {}", id);

    let teacher = state.service.get_teacher_by_id(id).await?;
    Ok(Json(TeacherReadOnlyDto::from(teacher)))
}

/// Create a teacher
#[utoipa::path(
    post,
    path = "/api/teachers",
    tag = "teachers",
    request_body = TeacherInsertDto,
    responses(
        (status = 201, description = "Teacher created", body = TeacherReadOnlyDto,
            headers(("location" = String, description = "URL of the new teacher"))),
        (status = 400, description = "Invalid payload"),
        (status = 503, description = "Teacher could not be created")
    )
)]
pub async fn create_teacher(
    Extension(state): Extension<Arc<TeachersRestState>>,
    headers: HeaderMap,
    body: Result<Json<TeacherInsertDto>, JsonRejection>,
) -> Result<(StatusCode, [(header::HeaderName, HeaderValue); 1], Json<TeacherReadOnlyDto>), CreateTeacherError>
{
    let Json(req) = body.map_err(|e| CreateTeacherError::InvalidBody(e.body_text()))?;
    info!("Creating teacher: {:?}", req);

    let mut errors = ValidationErrors::new();
    state.rules.check_insert(&req, &mut errors);
    state.insert_validator.validate(&req, &mut errors);
    if errors.has_errors() {
        return Err(CreateTeacherError::Validation(errors));
    }

    let teacher = state.service.insert_teacher(req.into()).await?;

    let location = teacher_location(state.public_base_url.as_deref(), &headers, teacher.id);
    let location = HeaderValue::from_str(&location)
        .map_err(|e| CreateTeacherError::Unavailable(format!("invalid location header: {e}")))?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(TeacherReadOnlyDto::from(teacher)),
    ))
}

/// Replace a teacher's names
#[utoipa::path(
    put,
    path = "/api/teachers/{id}",
    tag = "teachers",
    params(("id" = i64, Path, description = "Teacher id; must equal the body id")),
    request_body = TeacherUpdateDto,
    responses(
        (status = 200, description = "Teacher updated", body = TeacherReadOnlyDto),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Path id and body id differ"),
        (status = 404, description = "Teacher not found")
    )
)]
pub async fn update_teacher(
    Extension(state): Extension<Arc<TeachersRestState>>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<TeacherUpdateDto>, JsonRejection>,
) -> Result<Json<TeacherReadOnlyDto>, UpdateTeacherError> {
    let Path(id) = id.map_err(|e| UpdateTeacherError::InvalidRequest(e.body_text()))?;
    let Json(req) = body.map_err(|e| UpdateTeacherError::InvalidRequest(e.body_text()))?;
    info!("Updating teacher {} with: {:?}", id, req);

    if req.id != id {
        return Err(UpdateTeacherError::IdMismatch { path: id, body: req.id });
    }

    let mut errors = ValidationErrors::new();
    state.rules.check_update(&req, &mut errors);
    state.update_validator.validate(&req, &mut errors);
    if errors.has_errors() {
        return Err(UpdateTeacherError::Validation(errors));
    }

    let teacher = state.service.update_teacher(id, req.into()).await?;
    Ok(Json(TeacherReadOnlyDto::from(teacher)))
}

/// Delete a teacher, returning its last state
#[utoipa::path(
    delete,
    path = "/api/teachers/{id}",
    tag = "teachers",
    params(("id" = i64, Path, description = "Teacher id")),
    responses(
        (status = 200, description = "Teacher deleted", body = TeacherReadOnlyDto),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Teacher not found")
    )
)]
pub async fn delete_teacher(
    Extension(state): Extension<Arc<TeachersRestState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<TeacherReadOnlyDto>, DeleteTeacherError> {
    let Path(id) = id.map_err(|e| DeleteTeacherError::InvalidId(e.body_text()))?;
    info!("Deleting teacher: {}", id);

    let teacher = state.service.delete_teacher(id).await?;
    Ok(Json(TeacherReadOnlyDto::from(teacher)))
}
