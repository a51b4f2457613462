use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::access::ResourceEnforcer;
use crate::features::auth::gate::AccessGate;
use crate::features::logto::ElevatedIdentityBridge;
use crate::features::profiles::handlers::{self, ProfileState};
use crate::features::profiles::services::ProfileService;

/// Create routes for operators and patients
pub fn routes(
    service: Arc<ProfileService>,
    enforcer: Arc<ResourceEnforcer>,
    gate: Arc<AccessGate>,
    bridge: Arc<ElevatedIdentityBridge>,
) -> Router {
    let state = ProfileState {
        service,
        enforcer,
        gate,
        bridge,
    };

    Router::new()
        .route("/api/operatori", get(handlers::list_operators))
        .route(
            "/api/operatori/{id}",
            get(handlers::get_operator).put(handlers::update_operator),
        )
        .route("/api/pazienti", get(handlers::list_patients))
        .with_state(state)
}
