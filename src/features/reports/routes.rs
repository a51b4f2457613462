use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::features::access::ResourceEnforcer;
use crate::features::reports::handlers::{self, ReportState};
use crate::features::reports::services::ReportService;

/// Create routes for the reports feature
pub fn routes(service: Arc<ReportService>, enforcer: Arc<ResourceEnforcer>) -> Router {
    let state = ReportState { service, enforcer };

    Router::new()
        .route(
            "/api/referti",
            get(handlers::list_reports).post(handlers::create_report),
        )
        .route("/api/referti/{id}", delete(handlers::delete_report))
        .route("/api/referti/{id}/delete", post(handlers::delete_report))
        .with_state(state)
}
