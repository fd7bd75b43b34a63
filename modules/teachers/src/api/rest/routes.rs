use std::sync::Arc;

use axum::{routing::get, Extension, Router};

use crate::api::rest::handlers::{self, TeachersRestState};

/// Mount the teacher endpoints on `router`.
///
/// `GET/POST /api/teachers` and `GET/PUT/DELETE /api/teachers/{id}`.
pub fn register_routes(router: Router, state: Arc<TeachersRestState>) -> Router {
    let teachers = Router::new()
        .route(
            handlers::TEACHERS_PATH,
            get(handlers::get_teachers_by_lastname).post(handlers::create_teacher),
        )
        .route(
            "/api/teachers/{id}",
            get(handlers::get_teacher)
                .put(handlers::update_teacher)
                .delete(handlers::delete_teacher),
        )
        .layer(Extension(state));

    router.merge(teachers)
}
