use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::reports::models::Report;

/// Request DTO for publishing a report to a patient
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportInput {
    /// Identity ID of the patient
    #[validate(length(min = 1, max = 128, message = "Patient ID is required"))]
    pub patient_id: String,

    pub exam_type_id: Option<Uuid>,

    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    #[validate(url(message = "Document URL must be a valid URL"))]
    pub document_url: String,
}

/// Query params for listing reports
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ReportFilter {
    /// Staff only: narrow to one patient. Ignored for patients.
    pub patient_id: Option<String>,
}

/// Response DTO for report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponseDto {
    pub id: Uuid,
    pub patient_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exam_type_id: Option<Uuid>,
    pub title: String,
    pub document_url: String,
    pub created_at: DateTime<Utc>,
}

impl From<Report> for ReportResponseDto {
    fn from(r: Report) -> Self {
        Self {
            id: r.id,
            patient_id: r.patient_id,
            exam_type_id: r.exam_type_id,
            title: r.title,
            document_url: r.document_url,
            created_at: r.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_input_requires_document_url() {
        let input = ReportInput {
            patient_id: "pz-1".to_string(),
            exam_type_id: None,
            title: "Emocromo completo".to_string(),
            document_url: "https://files.clinica.test/referti/pz-1/emocromo.pdf".to_string(),
        };
        assert!(input.validate().is_ok());

        let bad = ReportInput {
            document_url: "emocromo.pdf".to_string(),
            ..input
        };
        assert!(bad.validate().is_err());
    }
}
