use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::Response,
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::access::{
    mutation_response, Mutation, MutationOutcome, Resource, ResourceEnforcer,
};
use crate::features::auth::model::RequestContext;
use crate::features::reports::dtos::{ReportFilter, ReportInput, ReportResponseDto};
use crate::features::reports::services::ReportService;
use crate::shared::constants::REPORTS_PAGE_PATH;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

#[derive(Clone)]
pub struct ReportState {
    pub service: Arc<ReportService>,
    pub enforcer: Arc<ResourceEnforcer>,
}

/// List reports
///
/// Staff see every report, patients only their own.
#[utoipa::path(
    get,
    path = "/api/referti",
    params(ReportFilter, PaginationQuery),
    responses(
        (status = 200, description = "List of reports", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 401, description = "Unauthenticated")
    ),
    security(("bearer_auth" = [])),
    tag = "referti"
)]
pub async fn list_reports(
    ctx: RequestContext,
    State(state): State<ReportState>,
    Query(filter): Query<ReportFilter>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let caller = state
        .enforcer
        .authorize_read(&ctx, Resource::Report)
        .await?;

    let (reports, total) = state
        .service
        .list(&caller, filter.patient_id, &pagination)
        .await?;
    let dtos = reports.into_iter().map(|r| r.into()).collect();

    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Publish a report (admin, segretaria)
#[utoipa::path(
    post,
    path = "/api/referti",
    request_body = ReportInput,
    responses(
        (status = 200, description = "Report created", body = ApiResponse<MutationOutcome>),
        (status = 303, description = "Navigational caller sent back to the list page"),
        (status = 400, description = "Validation or storage failure"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Role not permitted")
    ),
    security(("bearer_auth" = [])),
    tag = "referti"
)]
pub async fn create_report(
    ctx: RequestContext,
    State(state): State<ReportState>,
    AppJson(input): AppJson<ReportInput>,
) -> Result<Response> {
    let outcome = state
        .enforcer
        .enforce(&ctx, Mutation::InsertReport(input))
        .await?;
    Ok(mutation_response(&ctx, outcome, REPORTS_PAGE_PATH))
}

/// Delete a report (admin, segretaria)
///
/// Also mounted as `POST /api/referti/{id}/delete` for form posts.
#[utoipa::path(
    delete,
    path = "/api/referti/{id}",
    params(("id" = Uuid, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Report deleted", body = ApiResponse<MutationOutcome>),
        (status = 303, description = "Navigational caller sent back to the list page"),
        (status = 400, description = "Storage failure"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Role not permitted")
    ),
    security(("bearer_auth" = [])),
    tag = "referti"
)]
pub async fn delete_report(
    ctx: RequestContext,
    State(state): State<ReportState>,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    let outcome = state
        .enforcer
        .enforce(&ctx, Mutation::DeleteReport(id))
        .await?;
    Ok(mutation_response(&ctx, outcome, REPORTS_PAGE_PATH))
}

#[cfg(test)]
mod tests {
    use crate::features::access::ResourceEnforcer;
    use crate::features::auth::model::Role;
    use crate::features::reports::{routes, ReportService};
    use crate::shared::test_helpers::{
        gate_for, lazy_pool, with_session, InMemoryProfileStore, PolicyEnforcingStorage,
        StaticIdentityProvider,
    };
    use axum::http::{header, HeaderValue, StatusCode};
    use axum_test::TestServer;
    use serde_json::json;
    use std::sync::Arc;
    use uuid::Uuid;

    fn setup() -> (TestServer, Arc<PolicyEnforcingStorage>) {
        let profiles = Arc::new(
            InMemoryProfileStore::default()
                .with_profile("s1", Role::Segretaria, true)
                .with_profile("p1", Role::Paziente, true),
        );
        let storage = Arc::new(PolicyEnforcingStorage::new(profiles.clone()));
        let enforcer = Arc::new(ResourceEnforcer::new(gate_for(profiles), storage.clone()));
        let provider = StaticIdentityProvider::default()
            .with("tok-staff", "s1")
            .with("tok-patient", "p1");

        let app = with_session(
            routes::routes(Arc::new(ReportService::new(lazy_pool())), enforcer),
            provider,
        );
        (TestServer::new(app).unwrap(), storage)
    }

    fn bearer(token: &str) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
    }

    fn report() -> serde_json::Value {
        json!({
            "patientId": "p1",
            "title": "Referto glicemia",
            "documentUrl": "https://referti.clinica.test/p1/glicemia.pdf"
        })
    }

    #[tokio::test]
    async fn test_staff_publishes_report() {
        let (server, storage) = setup();

        let response = server
            .post("/api/referti")
            .add_header(header::AUTHORIZATION, bearer("tok-staff"))
            .json(&report())
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["data"]["resource"], "report");
        assert_eq!(body["data"]["operation"], "insert");
        assert_eq!(storage.applied(), 1);
    }

    #[tokio::test]
    async fn test_patient_cannot_publish_or_withdraw() {
        let (server, storage) = setup();

        let response = server
            .post("/api/referti")
            .add_header(header::AUTHORIZATION, bearer("tok-patient"))
            .json(&report())
            .await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

        let response = server
            .delete(&format!("/api/referti/{}", Uuid::now_v7()))
            .add_header(header::AUTHORIZATION, bearer("tok-patient"))
            .await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

        let response = server.post("/api/referti").json(&report()).await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

        assert_eq!(storage.applied(), 0);
    }

    #[tokio::test]
    async fn test_form_delete_redirects_by_outcome() {
        let (server, storage) = setup();
        let path = format!("/api/referti/{}/delete", Uuid::now_v7());

        let response = server
            .post(&path)
            .add_header(header::ACCEPT, HeaderValue::from_static("text/html"))
            .add_header(header::AUTHORIZATION, bearer("tok-staff"))
            .await;
        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
        assert_eq!(response.header(header::LOCATION), "/segreteria/referti");

        let response = server
            .post(&path)
            .add_header(header::ACCEPT, HeaderValue::from_static("text/html"))
            .add_header(header::AUTHORIZATION, bearer("tok-patient"))
            .await;
        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
        assert_eq!(response.header(header::LOCATION), "/unauthorized");

        assert_eq!(storage.applied(), 1);
    }
}
