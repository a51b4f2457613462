use std::sync::Arc;

use axum::{
    response::{IntoResponse, Redirect, Response},
    Json,
};

use super::policy::{allowed_roles, Operation, Resource};
use super::storage::{Mutation, MutationOutcome, ProtectedStorage, StorageError};
use crate::core::error::{AppError, Result};
use crate::features::auth::gate::{AccessGate, Authorized};
use crate::features::auth::model::{RequestContext, RequestKind};
use crate::shared::types::ApiResponse;

/// Gate first, storage second, for every protected resource operation.
pub struct ResourceEnforcer {
    gate: Arc<AccessGate>,
    storage: Arc<dyn ProtectedStorage>,
}

impl ResourceEnforcer {
    pub fn new(gate: Arc<AccessGate>, storage: Arc<dyn ProtectedStorage>) -> Self {
        Self { gate, storage }
    }

    /// Gate a read. The caller runs the query inside a scoped transaction
    /// so the row policy applies as well.
    pub async fn authorize_read(
        &self,
        ctx: &RequestContext,
        resource: Resource,
    ) -> Result<Authorized> {
        self.gate
            .require_role(ctx, allowed_roles(resource, Operation::Read))
            .await
    }

    pub async fn enforce(
        &self,
        ctx: &RequestContext,
        mutation: Mutation,
    ) -> Result<MutationOutcome> {
        let resource = mutation.resource();
        let operation = mutation.operation();
        let target = mutation.target_id();
        let target = target.as_deref().unwrap_or("-");

        let authorized = self
            .gate
            .require_role(ctx, allowed_roles(resource, operation))
            .await?;

        match self.storage.apply(authorized.identity(), mutation).await {
            Ok(outcome) => {
                tracing::info!(
                    actor = %authorized.identity().id,
                    role = %authorized.role(),
                    resource = ?resource,
                    operation = ?operation,
                    id = %outcome.id,
                    "Protected operation applied"
                );
                Ok(outcome)
            }
            Err(StorageError::PolicyViolation(reason)) => {
                // Gate said yes, row policy said no
                tracing::error!(
                    actor = %authorized.identity().id,
                    role = %authorized.role(),
                    resource = ?resource,
                    operation = ?operation,
                    target = %target,
                    "Policy drift: storage rejected an operation the access gate approved: {}",
                    reason
                );
                Err(AppError::OperationFailed(reason))
            }
            Err(StorageError::NoRowsAffected) => {
                tracing::warn!(
                    actor = %authorized.identity().id,
                    role = %authorized.role(),
                    resource = ?resource,
                    operation = ?operation,
                    target = %target,
                    "Gated operation matched no rows: record does not exist"
                );
                Err(AppError::OperationFailed(
                    "No rows affected".to_string(),
                ))
            }
            Err(StorageError::Unavailable(e)) => Err(AppError::Database(e)),
            Err(StorageError::Failed(reason)) => Err(AppError::OperationFailed(reason)),
        }
    }
}

/// Success reply for a gated mutation: back to the list page for browser
/// callers, a JSON confirmation otherwise.
pub fn mutation_response(
    ctx: &RequestContext,
    outcome: MutationOutcome,
    list_page: &'static str,
) -> Response {
    match ctx.kind {
        RequestKind::Navigational => Redirect::to(list_page).into_response(),
        RequestKind::Api => Json(ApiResponse::success(
            Some(outcome),
            Some("Operation completed".to_string()),
            None,
        ))
        .into_response(),
    }
}
