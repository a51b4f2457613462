use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::access::ResourceEnforcer;
use crate::features::exam_types::handlers::{self, ExamTypeState};
use crate::features::exam_types::services::ExamTypeService;

/// Create routes for the exam types feature
pub fn routes(service: Arc<ExamTypeService>, enforcer: Arc<ResourceEnforcer>) -> Router {
    let state = ExamTypeState { service, enforcer };

    Router::new()
        .route(
            "/api/tipi-esame",
            get(handlers::list_exam_types).post(handlers::create_exam_type),
        )
        .route(
            "/api/tipi-esame/{id}",
            put(handlers::update_exam_type).delete(handlers::delete_exam_type),
        )
        .route("/api/tipi-esame/{id}/delete", post(handlers::delete_exam_type))
        .with_state(state)
}
