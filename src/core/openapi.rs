use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::access::{MutationOutcome, Operation, Resource};
use crate::features::auth::model::{Identity, Profile, Role};
use crate::features::exam_types::{dtos as exam_types_dtos, handlers as exam_types_handlers};
use crate::features::laboratories::{dtos as laboratories_dtos, handlers as laboratories_handlers};
use crate::features::portal::{dtos as portal_dtos, handlers as portal_handlers};
use crate::features::profiles::{dtos as profiles_dtos, handlers as profiles_handlers};
use crate::features::reports::{dtos as reports_dtos, handlers as reports_handlers};
use crate::shared::types::{ApiResponse, FailureBody, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Portal
        portal_handlers::root,
        portal_handlers::unauthorized,
        portal_handlers::session_landing,
        portal_handlers::debug_session,
        // Laboratories
        laboratories_handlers::list_laboratories,
        laboratories_handlers::create_laboratory,
        laboratories_handlers::update_laboratory,
        laboratories_handlers::delete_laboratory,
        // Exam types
        exam_types_handlers::list_exam_types,
        exam_types_handlers::create_exam_type,
        exam_types_handlers::update_exam_type,
        exam_types_handlers::delete_exam_type,
        // Operators and patients
        profiles_handlers::list_operators,
        profiles_handlers::get_operator,
        profiles_handlers::update_operator,
        profiles_handlers::list_patients,
        // Reports
        reports_handlers::list_reports,
        reports_handlers::create_report,
        reports_handlers::delete_report,
    ),
    components(
        schemas(
            // Shared
            Meta,
            FailureBody,
            Role,
            Identity,
            Profile,
            Resource,
            Operation,
            MutationOutcome,
            ApiResponse<MutationOutcome>,
            // Portal
            portal_dtos::LandingDto,
            portal_dtos::DebugSessionDto,
            ApiResponse<portal_dtos::LandingDto>,
            ApiResponse<portal_dtos::DebugSessionDto>,
            // Laboratories
            laboratories_dtos::LaboratoryInput,
            laboratories_dtos::LaboratoryResponseDto,
            ApiResponse<Vec<laboratories_dtos::LaboratoryResponseDto>>,
            // Exam types
            exam_types_dtos::ExamTypeInput,
            exam_types_dtos::ExamTypeResponseDto,
            ApiResponse<Vec<exam_types_dtos::ExamTypeResponseDto>>,
            // Operators and patients
            profiles_dtos::ProfileUpdateDto,
            profiles_dtos::ProfileResponseDto,
            profiles_dtos::OperatorDetailDto,
            ApiResponse<Vec<profiles_dtos::ProfileResponseDto>>,
            ApiResponse<profiles_dtos::OperatorDetailDto>,
            // Reports
            reports_dtos::ReportInput,
            reports_dtos::ReportResponseDto,
            ApiResponse<Vec<reports_dtos::ReportResponseDto>>,
        )
    ),
    tags(
        (name = "portal", description = "Landing redirects, denial page and session diagnostics"),
        (name = "laboratori", description = "Laboratories (staff read, admin write)"),
        (name = "tipi-esame", description = "Exam types (staff read, admin write)"),
        (name = "operatori", description = "Operator profiles (admin only)"),
        (name = "pazienti", description = "Patient profiles (staff read)"),
        (name = "referti", description = "Clinical reports (staff write, patients read their own)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Clinica Portal API",
        version = "0.1.0",
        description = "Role-gated API of the clinical portal",
    )
)]
pub struct ApiDoc;

/// Bearer JWT, plus the session cookie browsers send instead
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("portal_session"))),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_gated_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/",
            "/unauthorized",
            "/api/laboratori",
            "/api/laboratori/{id}",
            "/api/operatori/{id}",
            "/api/referti",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
