use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::access::begin_read;
use crate::features::auth::gate::Authorized;
use crate::features::exam_types::models::ExamType;
use crate::shared::types::PaginationQuery;

pub struct ExamTypeService {
    pool: PgPool,
}

impl ExamTypeService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List exam types, optionally narrowed to one laboratory
    pub async fn list(
        &self,
        caller: &Authorized,
        laboratory_id: Option<uuid::Uuid>,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<ExamType>, i64)> {
        let mut tx = begin_read(&self.pool, caller).await?;

        let exam_types = sqlx::query_as::<_, ExamType>(
            r#"
            SELECT t.id, t.nome AS name, t.descrizione AS description,
                   t.laboratorio_id AS laboratory_id, l.nome AS laboratory_name, t.created_at
            FROM tipi_esame t
            LEFT JOIN laboratori l ON l.id = t.laboratorio_id
            WHERE ($1::uuid IS NULL OR t.laboratorio_id = $1)
            ORDER BY t.nome
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(laboratory_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list exam types: {:?}", e);
            AppError::Database(e)
        })?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tipi_esame WHERE ($1::uuid IS NULL OR laboratorio_id = $1)",
        )
        .bind(laboratory_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count exam types: {:?}", e);
            AppError::Database(e)
        })?;

        tx.commit().await?;

        Ok((exam_types, total))
    }
}
