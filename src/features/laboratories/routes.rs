use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::access::ResourceEnforcer;
use crate::features::laboratories::handlers::{self, LaboratoryState};
use crate::features::laboratories::services::LaboratoryService;

/// Create routes for the laboratories feature
pub fn routes(service: Arc<LaboratoryService>, enforcer: Arc<ResourceEnforcer>) -> Router {
    let state = LaboratoryState { service, enforcer };

    Router::new()
        .route(
            "/api/laboratori",
            get(handlers::list_laboratories).post(handlers::create_laboratory),
        )
        .route(
            "/api/laboratori/{id}",
            put(handlers::update_laboratory).delete(handlers::delete_laboratory),
        )
        .route(
            "/api/laboratori/{id}/delete",
            post(handlers::delete_laboratory),
        )
        .with_state(state)
}
