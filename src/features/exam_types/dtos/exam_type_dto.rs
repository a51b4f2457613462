use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::exam_types::models::ExamType;

/// Request DTO for creating or replacing an exam type
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExamTypeInput {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(length(max = 2000, message = "Description must not exceed 2000 characters"))]
    pub description: Option<String>,

    /// Laboratory performing the exam, if any
    pub laboratory_id: Option<Uuid>,
}

/// Response DTO for exam type
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExamTypeResponseDto {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub laboratory_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub laboratory_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ExamType> for ExamTypeResponseDto {
    fn from(e: ExamType) -> Self {
        Self {
            id: e.id,
            name: e.name,
            description: e.description,
            laboratory_id: e.laboratory_id,
            laboratory_name: e.laboratory_name,
            created_at: e.created_at,
        }
    }
}
