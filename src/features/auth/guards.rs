//! Extractor form of the access gate.
//!
//! # Example
//! ```ignore
//! pub async fn handler(RequireAdmin(grant): RequireAdmin) { ... }
//! ```

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::core::error::AppError;
use crate::features::auth::gate::{AccessGate, AdminGrant};
use crate::features::auth::model::RequestContext;

/// Runs `require_role({admin})` before the handler body. The handler only
/// executes with a grant in hand.
pub struct RequireAdmin(pub AdminGrant);

impl<S> FromRequestParts<S> for RequireAdmin
where
    Arc<AccessGate>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let ctx = RequestContext::from_request_parts(parts, state).await?;
        let gate = Arc::<AccessGate>::from_ref(state);

        Ok(RequireAdmin(gate.require_admin(&ctx).await?))
    }
}
