use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::auth::model::{Profile, Role};

/// Request DTO for updating a profile (admin only)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateDto {
    #[validate(
        length(min = 1, max = 128, message = "First name must be 1-128 characters"),
        regex(
            path = "*crate::shared::validation::PERSON_NAME_REGEX",
            message = "First name may contain only letters, spaces, apostrophes and hyphens"
        )
    )]
    pub first_name: String,

    #[validate(
        length(min = 1, max = 128, message = "Last name must be 1-128 characters"),
        regex(
            path = "*crate::shared::validation::PERSON_NAME_REGEX",
            message = "Last name may contain only letters, spaces, apostrophes and hyphens"
        )
    )]
    pub last_name: String,

    pub role: Role,

    /// Inactive profiles resolve to no role
    pub active: bool,
}

/// Response DTO for profile
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponseDto {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub active: bool,
}

impl From<Profile> for ProfileResponseDto {
    fn from(p: Profile) -> Self {
        Self {
            id: p.id,
            first_name: p.first_name,
            last_name: p.last_name,
            role: p.role,
            active: p.active,
        }
    }
}

/// Operator detail, with the contact email held by the identity provider
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OperatorDetailDto {
    #[serde(flatten)]
    pub profile: ProfileResponseDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_update_validation() {
        let dto: ProfileUpdateDto = serde_json::from_str(
            r#"{"firstName":"Giulia","lastName":"D'Amico","role":"segretaria","active":true}"#,
        )
        .unwrap();
        assert!(dto.validate().is_ok());
        assert_eq!(dto.role, Role::Segretaria);

        let bad = ProfileUpdateDto {
            first_name: "Giulia2".to_string(),
            ..dto
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let result = serde_json::from_str::<ProfileUpdateDto>(
            r#"{"firstName":"Giulia","lastName":"Neri","role":"medico","active":true}"#,
        );
        assert!(result.is_err());
    }
}
