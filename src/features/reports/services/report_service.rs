use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::access::begin_read;
use crate::features::auth::gate::Authorized;
use crate::features::auth::model::Role;
use crate::features::reports::models::Report;
use crate::shared::types::PaginationQuery;

pub struct ReportService {
    pool: PgPool,
}

impl ReportService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List reports. Patients get their own; the row policy enforces the
    /// same in storage.
    pub async fn list(
        &self,
        caller: &Authorized,
        patient_id: Option<String>,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<Report>, i64)> {
        let patient_id = patient_scope(caller, patient_id);
        let mut tx = begin_read(&self.pool, caller).await?;

        let reports = sqlx::query_as::<_, Report>(
            r#"
            SELECT id, paziente_id AS patient_id, tipo_esame_id AS exam_type_id,
                   titolo AS title, documento_url AS document_url, created_at
            FROM referti
            WHERE ($1::text IS NULL OR paziente_id = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&patient_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list reports: {:?}", e);
            AppError::Database(e)
        })?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM referti WHERE ($1::text IS NULL OR paziente_id = $1)",
        )
        .bind(&patient_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count reports: {:?}", e);
            AppError::Database(e)
        })?;

        tx.commit().await?;

        Ok((reports, total))
    }
}

/// Patient filter actually applied: patients are pinned to themselves.
fn patient_scope(caller: &Authorized, requested: Option<String>) -> Option<String> {
    match caller.role() {
        Role::Paziente => Some(caller.identity().id.clone()),
        Role::Admin | Role::Segretaria => requested,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::gate::AccessGate;
    use crate::features::auth::model::{RequestContext, RequestKind, RoleSet};
    use crate::features::auth::resolver::RoleResolver;
    use crate::shared::test_helpers::{identity, InMemoryProfileStore};
    use std::sync::Arc;

    async fn authorized(id: &str, role: Role) -> Authorized {
        let store = InMemoryProfileStore::default().with_profile(id, role, true);
        let gate = AccessGate::new(Arc::new(RoleResolver::new(Arc::new(store))));
        gate.require_role(
            &RequestContext::authenticated(identity(id), RequestKind::Api),
            RoleSet::of(&Role::ALL),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_patient_is_pinned_to_own_reports() {
        let patient = authorized("pz-1", Role::Paziente).await;
        assert_eq!(
            patient_scope(&patient, Some("pz-2".to_string())),
            Some("pz-1".to_string())
        );
        assert_eq!(patient_scope(&patient, None), Some("pz-1".to_string()));
    }

    #[tokio::test]
    async fn test_staff_filter_is_optional() {
        let staff = authorized("s1", Role::Segretaria).await;
        assert_eq!(patient_scope(&staff, None), None);
        assert_eq!(
            patient_scope(&staff, Some("pz-2".to_string())),
            Some("pz-2".to_string())
        );
    }
}
