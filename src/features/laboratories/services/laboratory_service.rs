use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::access::begin_read;
use crate::features::auth::gate::Authorized;
use crate::features::laboratories::models::Laboratory;
use crate::shared::types::PaginationQuery;

/// Read side of laboratories. Writes go through the resource enforcer.
pub struct LaboratoryService {
    pool: PgPool,
}

impl LaboratoryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List laboratories visible to `caller`, with total count
    pub async fn list(
        &self,
        caller: &Authorized,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<Laboratory>, i64)> {
        let mut tx = begin_read(&self.pool, caller).await?;

        let laboratories = sqlx::query_as::<_, Laboratory>(
            r#"
            SELECT id, nome AS name, indirizzo AS address, telefono AS phone, created_at
            FROM laboratori
            ORDER BY nome
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list laboratories: {:?}", e);
            AppError::Database(e)
        })?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM laboratori")
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count laboratories: {:?}", e);
                AppError::Database(e)
            })?;

        tx.commit().await?;

        Ok((laboratories, total))
    }
}
