use async_trait::async_trait;
use serde::Serialize;
use sqlx::{PgPool, Postgres, Transaction};
use utoipa::ToSchema;
use uuid::Uuid;

use super::policy::{Operation, Resource};
use crate::core::database::{is_policy_violation, is_transient};
use crate::core::error::AppError;
use crate::features::auth::gate::Authorized;
use crate::features::auth::model::Identity;
use crate::features::exam_types::dtos::ExamTypeInput;
use crate::features::laboratories::dtos::LaboratoryInput;
use crate::features::profiles::dtos::ProfileUpdateDto;
use crate::features::reports::dtos::ReportInput;
use crate::shared::constants::{DB_CURRENT_USER_SETTING, DB_POLICY_ROLE};

/// Every write the portal can make to a protected table.
#[derive(Debug, Clone)]
pub enum Mutation {
    InsertLaboratory(LaboratoryInput),
    UpdateLaboratory(Uuid, LaboratoryInput),
    DeleteLaboratory(Uuid),
    InsertExamType(ExamTypeInput),
    UpdateExamType(Uuid, ExamTypeInput),
    DeleteExamType(Uuid),
    UpdateProfile(String, ProfileUpdateDto),
    InsertReport(ReportInput),
    DeleteReport(Uuid),
}

impl Mutation {
    pub fn resource(&self) -> Resource {
        match self {
            Mutation::InsertLaboratory(_)
            | Mutation::UpdateLaboratory(..)
            | Mutation::DeleteLaboratory(_) => Resource::Laboratory,
            Mutation::InsertExamType(_)
            | Mutation::UpdateExamType(..)
            | Mutation::DeleteExamType(_) => Resource::ExamType,
            Mutation::UpdateProfile(..) => Resource::Profile,
            Mutation::InsertReport(_) | Mutation::DeleteReport(_) => Resource::Report,
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            Mutation::InsertLaboratory(_)
            | Mutation::InsertExamType(_)
            | Mutation::InsertReport(_) => Operation::Insert,
            Mutation::UpdateLaboratory(..)
            | Mutation::UpdateExamType(..)
            | Mutation::UpdateProfile(..) => Operation::Update,
            Mutation::DeleteLaboratory(_)
            | Mutation::DeleteExamType(_)
            | Mutation::DeleteReport(_) => Operation::Delete,
        }
    }

    /// Key of the existing row an update or delete targets.
    pub fn target_id(&self) -> Option<String> {
        match self {
            Mutation::UpdateLaboratory(id, _)
            | Mutation::UpdateExamType(id, _)
            | Mutation::DeleteLaboratory(id)
            | Mutation::DeleteExamType(id)
            | Mutation::DeleteReport(id) => Some(id.to_string()),
            Mutation::UpdateProfile(id, _) => Some(id.clone()),
            Mutation::InsertLaboratory(_)
            | Mutation::InsertExamType(_)
            | Mutation::InsertReport(_) => None,
        }
    }
}

/// What a successful gated write touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MutationOutcome {
    pub resource: Resource,
    pub operation: Operation,
    pub id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The row policy rejected the statement, or hid an existing row from
    /// an update or delete.
    #[error("Row policy violation: {0}")]
    PolicyViolation(String),

    /// Update or delete matched nothing and the row does not exist.
    #[error("No rows affected")]
    NoRowsAffected,

    #[error("Storage unavailable: {0}")]
    Unavailable(sqlx::Error),

    #[error("Storage failure: {0}")]
    Failed(String),
}

/// Classify an update or delete that matched nothing under the row policy.
///
/// `USING` clauses hide rows instead of raising, so a row that exists but
/// was not visible to the caller is a policy rejection, not a missing row.
pub fn unmatched_row(resource: Resource, id: &str, row_exists: bool) -> StorageError {
    if row_exists {
        StorageError::PolicyViolation(format!(
            "row {} in \"{}\" is hidden by row-level security policy",
            id,
            resource.table()
        ))
    } else {
        StorageError::NoRowsAffected
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(e: sqlx::Error) -> Self {
        if is_policy_violation(&e) {
            StorageError::PolicyViolation(e.to_string())
        } else if is_transient(&e) {
            StorageError::Unavailable(e)
        } else {
            StorageError::Failed(e.to_string())
        }
    }
}

/// Storage side of the dual check. Implementations must enforce the row
/// policy themselves and must not trust that the gate ran.
#[async_trait]
pub trait ProtectedStorage: Send + Sync {
    async fn apply(
        &self,
        actor: &Identity,
        mutation: Mutation,
    ) -> Result<MutationOutcome, StorageError>;
}

/// Open a transaction in which row policies apply to `actor`.
///
/// Switches to the policy role and records the caller id for
/// `app_current_role()`. Both settings end with the transaction.
pub async fn begin_scoped(
    pool: &PgPool,
    actor: &Identity,
) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(&format!("SET LOCAL ROLE {}", DB_POLICY_ROLE))
        .execute(&mut *tx)
        .await?;

    sqlx::query("SELECT set_config($1, $2, true)")
        .bind(DB_CURRENT_USER_SETTING)
        .bind(&actor.id)
        .execute(&mut *tx)
        .await?;

    Ok(tx)
}

/// Scoped transaction for a read the gate already allowed.
pub async fn begin_read(
    pool: &PgPool,
    caller: &Authorized,
) -> crate::core::error::Result<Transaction<'static, Postgres>> {
    begin_scoped(pool, caller.identity()).await.map_err(|e| {
        tracing::error!("Failed to open scoped read transaction: {:?}", e);
        AppError::Database(e)
    })
}

pub struct PgProtectedStorage {
    pool: PgPool,
}

impl PgProtectedStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Look for `id` as the migrating role, which row policies do not apply to.
    async fn row_exists(
        tx: &mut Transaction<'static, Postgres>,
        resource: Resource,
        id: &str,
    ) -> Result<bool, StorageError> {
        sqlx::query("RESET ROLE").execute(&mut **tx).await?;

        let exists = sqlx::query_scalar::<_, bool>(&format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE id::text = $1)",
            resource.table()
        ))
        .bind(id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(exists)
    }

    async fn execute(
        tx: &mut Transaction<'static, Postgres>,
        mutation: Mutation,
    ) -> Result<String, StorageError> {
        let resource = mutation.resource();
        let affected = match mutation {
            Mutation::InsertLaboratory(input) => {
                let id = Uuid::now_v7();
                sqlx::query(
                    "INSERT INTO laboratori (id, nome, indirizzo, telefono) VALUES ($1, $2, $3, $4)",
                )
                .bind(id)
                .bind(&input.name)
                .bind(&input.address)
                .bind(&input.phone)
                .execute(&mut **tx)
                .await?;
                return Ok(id.to_string());
            }
            Mutation::UpdateLaboratory(id, input) => {
                let result = sqlx::query(
                    "UPDATE laboratori SET nome = $2, indirizzo = $3, telefono = $4 WHERE id = $1",
                )
                .bind(id)
                .bind(&input.name)
                .bind(&input.address)
                .bind(&input.phone)
                .execute(&mut **tx)
                .await?;
                (id.to_string(), result.rows_affected())
            }
            Mutation::DeleteLaboratory(id) => {
                let result = sqlx::query("DELETE FROM laboratori WHERE id = $1")
                    .bind(id)
                    .execute(&mut **tx)
                    .await?;
                (id.to_string(), result.rows_affected())
            }
            Mutation::InsertExamType(input) => {
                let id = Uuid::now_v7();
                sqlx::query(
                    "INSERT INTO tipi_esame (id, nome, descrizione, laboratorio_id) VALUES ($1, $2, $3, $4)",
                )
                .bind(id)
                .bind(&input.name)
                .bind(&input.description)
                .bind(input.laboratory_id)
                .execute(&mut **tx)
                .await?;
                return Ok(id.to_string());
            }
            Mutation::UpdateExamType(id, input) => {
                let result = sqlx::query(
                    "UPDATE tipi_esame SET nome = $2, descrizione = $3, laboratorio_id = $4 WHERE id = $1",
                )
                .bind(id)
                .bind(&input.name)
                .bind(&input.description)
                .bind(input.laboratory_id)
                .execute(&mut **tx)
                .await?;
                (id.to_string(), result.rows_affected())
            }
            Mutation::DeleteExamType(id) => {
                let result = sqlx::query("DELETE FROM tipi_esame WHERE id = $1")
                    .bind(id)
                    .execute(&mut **tx)
                    .await?;
                (id.to_string(), result.rows_affected())
            }
            Mutation::UpdateProfile(id, update) => {
                let result = sqlx::query(
                    r#"
                    UPDATE profili
                    SET nome = $2, cognome = $3, ruolo = $4, attivo = $5, updated_at = NOW()
                    WHERE id = $1
                    "#,
                )
                .bind(&id)
                .bind(&update.first_name)
                .bind(&update.last_name)
                .bind(update.role)
                .bind(update.active)
                .execute(&mut **tx)
                .await?;
                (id, result.rows_affected())
            }
            Mutation::InsertReport(input) => {
                let id = Uuid::now_v7();
                sqlx::query(
                    r#"
                    INSERT INTO referti (id, paziente_id, tipo_esame_id, titolo, documento_url)
                    VALUES ($1, $2, $3, $4, $5)
                    "#,
                )
                .bind(id)
                .bind(&input.patient_id)
                .bind(input.exam_type_id)
                .bind(&input.title)
                .bind(&input.document_url)
                .execute(&mut **tx)
                .await?;
                return Ok(id.to_string());
            }
            Mutation::DeleteReport(id) => {
                let result = sqlx::query("DELETE FROM referti WHERE id = $1")
                    .bind(id)
                    .execute(&mut **tx)
                    .await?;
                (id.to_string(), result.rows_affected())
            }
        };

        match affected {
            (id, 0) => {
                let exists = Self::row_exists(tx, resource, &id).await?;
                Err(unmatched_row(resource, &id, exists))
            }
            (id, _) => Ok(id),
        }
    }
}

#[async_trait]
impl ProtectedStorage for PgProtectedStorage {
    async fn apply(
        &self,
        actor: &Identity,
        mutation: Mutation,
    ) -> Result<MutationOutcome, StorageError> {
        let resource = mutation.resource();
        let operation = mutation.operation();

        let mut tx = begin_scoped(&self.pool, actor).await?;
        let id = Self::execute(&mut tx, mutation).await?;
        tx.commit().await?;

        Ok(MutationOutcome {
            resource,
            operation,
            id,
        })
    }
}
