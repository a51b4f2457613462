use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::auth::gate::AccessGate;
use crate::features::portal::handlers::{self, PortalState};
use crate::shared::constants::UNAUTHORIZED_PATH;

/// Create routes for the navigation entry points
pub fn routes(gate: Arc<AccessGate>, debug_surface_enabled: bool) -> Router {
    let state = PortalState {
        gate,
        debug_surface_enabled,
    };

    Router::new()
        .route("/", get(handlers::root))
        .route(UNAUTHORIZED_PATH, get(handlers::unauthorized))
        .route("/api/session/landing", get(handlers::session_landing))
        .route("/api/debug/session", get(handlers::debug_session))
        .with_state(state)
}
