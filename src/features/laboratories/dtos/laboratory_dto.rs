use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::laboratories::models::Laboratory;

/// Request DTO for creating or replacing a laboratory
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LaboratoryInput {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(length(max = 500, message = "Address must not exceed 500 characters"))]
    pub address: Option<String>,

    #[validate(regex(
        path = "*crate::shared::validation::PHONE_REGEX",
        message = "Phone must contain digits with optional leading + and single separators"
    ))]
    pub phone: Option<String>,
}

/// Response DTO for laboratory
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LaboratoryResponseDto {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Laboratory> for LaboratoryResponseDto {
    fn from(l: Laboratory) -> Self {
        Self {
            id: l.id,
            name: l.name,
            address: l.address,
            phone: l.phone,
            created_at: l.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_laboratory_input_validation() {
        let valid = LaboratoryInput {
            name: "Laboratorio San Luca".to_string(),
            address: None,
            phone: Some("+39 06 1234567".to_string()),
        };
        assert!(valid.validate().is_ok());

        let empty_name = LaboratoryInput {
            name: String::new(),
            ..valid.clone()
        };
        assert!(empty_name.validate().is_err());

        let bad_phone = LaboratoryInput {
            phone: Some("call me".to_string()),
            ..valid
        };
        assert!(bad_phone.validate().is_err());
    }
}
