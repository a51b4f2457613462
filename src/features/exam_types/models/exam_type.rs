use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for exam type (`tipi_esame`), joined with its laboratory name
#[derive(Debug, Clone, FromRow)]
pub struct ExamType {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub laboratory_id: Option<Uuid>,
    pub laboratory_name: Option<String>,
    pub created_at: DateTime<Utc>,
}
