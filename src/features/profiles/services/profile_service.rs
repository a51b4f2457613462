use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::access::begin_read;
use crate::features::auth::gate::Authorized;
use crate::features::auth::model::{Profile, Role};
use crate::shared::types::PaginationQuery;

/// Staff roles listed on the operators screen
pub const OPERATOR_ROLES: [Role; 2] = [Role::Admin, Role::Segretaria];

/// Reads of `profili`. The row policy narrows what each caller sees:
/// segretaria only gets patient rows.
pub struct ProfileService {
    pool: PgPool,
}

impl ProfileService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_by_roles(
        &self,
        caller: &Authorized,
        roles: &[Role],
        pagination: &PaginationQuery,
    ) -> Result<(Vec<Profile>, i64)> {
        let roles: Vec<String> = roles.iter().map(|r| r.as_str().to_string()).collect();
        let mut tx = begin_read(&self.pool, caller).await?;

        let profiles = sqlx::query_as::<_, Profile>(
            r#"
            SELECT id, nome AS first_name, cognome AS last_name, ruolo AS role, attivo AS active
            FROM profili
            WHERE ruolo::text = ANY($1)
            ORDER BY cognome, nome
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&roles)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list profiles: {:?}", e);
            AppError::Database(e)
        })?;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM profili WHERE ruolo::text = ANY($1)")
                .bind(&roles)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to count profiles: {:?}", e);
                    AppError::Database(e)
                })?;

        tx.commit().await?;

        Ok((profiles, total))
    }

    /// Single profile among `roles`
    pub async fn get(&self, caller: &Authorized, id: &str, roles: &[Role]) -> Result<Profile> {
        let role_names: Vec<String> = roles.iter().map(|r| r.as_str().to_string()).collect();
        let mut tx = begin_read(&self.pool, caller).await?;

        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT id, nome AS first_name, cognome AS last_name, ruolo AS role, attivo AS active
            FROM profili
            WHERE id = $1 AND ruolo::text = ANY($2)
            "#,
        )
        .bind(id)
        .bind(&role_names)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get profile: {:?}", e);
            AppError::Database(e)
        })?;

        tx.commit().await?;

        profile.ok_or_else(|| AppError::NotFound(format!("Profile '{}' not found", id)))
    }
}
