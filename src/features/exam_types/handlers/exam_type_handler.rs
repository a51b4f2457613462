use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::Response,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::access::{
    mutation_response, Mutation, MutationOutcome, Resource, ResourceEnforcer,
};
use crate::features::auth::model::RequestContext;
use crate::features::exam_types::dtos::{ExamTypeInput, ExamTypeResponseDto};
use crate::features::exam_types::services::ExamTypeService;
use crate::shared::constants::EXAM_TYPES_PAGE_PATH;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

#[derive(Clone)]
pub struct ExamTypeState {
    pub service: Arc<ExamTypeService>,
    pub enforcer: Arc<ResourceEnforcer>,
}

/// Query params for listing exam types
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ExamTypeFilter {
    /// Only exam types performed by this laboratory
    pub laboratory_id: Option<Uuid>,
}

/// List exam types (admin, segretaria)
#[utoipa::path(
    get,
    path = "/api/tipi-esame",
    params(ExamTypeFilter, PaginationQuery),
    responses(
        (status = 200, description = "List of exam types", body = ApiResponse<Vec<ExamTypeResponseDto>>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Role not permitted")
    ),
    security(("bearer_auth" = [])),
    tag = "tipi-esame"
)]
pub async fn list_exam_types(
    ctx: RequestContext,
    State(state): State<ExamTypeState>,
    Query(filter): Query<ExamTypeFilter>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<ExamTypeResponseDto>>>> {
    let caller = state
        .enforcer
        .authorize_read(&ctx, Resource::ExamType)
        .await?;

    let (exam_types, total) = state
        .service
        .list(&caller, filter.laboratory_id, &pagination)
        .await?;
    let dtos = exam_types.into_iter().map(|e| e.into()).collect();

    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Create an exam type (admin)
#[utoipa::path(
    post,
    path = "/api/tipi-esame",
    request_body = ExamTypeInput,
    responses(
        (status = 200, description = "Exam type created", body = ApiResponse<MutationOutcome>),
        (status = 303, description = "Navigational caller sent back to the list page"),
        (status = 400, description = "Validation or storage failure"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Role not permitted")
    ),
    security(("bearer_auth" = [])),
    tag = "tipi-esame"
)]
pub async fn create_exam_type(
    ctx: RequestContext,
    State(state): State<ExamTypeState>,
    AppJson(input): AppJson<ExamTypeInput>,
) -> Result<Response> {
    let outcome = state
        .enforcer
        .enforce(&ctx, Mutation::InsertExamType(input))
        .await?;
    Ok(mutation_response(&ctx, outcome, EXAM_TYPES_PAGE_PATH))
}

#[utoipa::path(
    put,
    path = "/api/tipi-esame/{id}",
    params(("id" = Uuid, Path, description = "Exam type ID")),
    request_body = ExamTypeInput,
    responses(
        (status = 200, description = "Exam type updated", body = ApiResponse<MutationOutcome>),
        (status = 400, description = "Validation or storage failure"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Role not permitted")
    ),
    security(("bearer_auth" = [])),
    tag = "tipi-esame"
)]
pub async fn update_exam_type(
    ctx: RequestContext,
    State(state): State<ExamTypeState>,
    Path(id): Path<Uuid>,
    AppJson(input): AppJson<ExamTypeInput>,
) -> Result<Response> {
    let outcome = state
        .enforcer
        .enforce(&ctx, Mutation::UpdateExamType(id, input))
        .await?;
    Ok(mutation_response(&ctx, outcome, EXAM_TYPES_PAGE_PATH))
}

#[utoipa::path(
    delete,
    path = "/api/tipi-esame/{id}",
    params(("id" = Uuid, Path, description = "Exam type ID")),
    responses(
        (status = 200, description = "Exam type deleted", body = ApiResponse<MutationOutcome>),
        (status = 303, description = "Navigational caller sent back to the list page"),
        (status = 400, description = "Storage failure"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Role not permitted")
    ),
    security(("bearer_auth" = [])),
    tag = "tipi-esame"
)]
pub async fn delete_exam_type(
    ctx: RequestContext,
    State(state): State<ExamTypeState>,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    let outcome = state
        .enforcer
        .enforce(&ctx, Mutation::DeleteExamType(id))
        .await?;
    Ok(mutation_response(&ctx, outcome, EXAM_TYPES_PAGE_PATH))
}
