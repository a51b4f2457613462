use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for clinical report (`referti`)
#[derive(Debug, Clone, FromRow)]
pub struct Report {
    pub id: Uuid,
    pub patient_id: String,
    pub exam_type_id: Option<Uuid>,
    pub title: String,
    pub document_url: String,
    pub created_at: DateTime<Utc>,
}
