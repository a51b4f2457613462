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
use crate::features::laboratories::dtos::{LaboratoryInput, LaboratoryResponseDto};
use crate::features::laboratories::services::LaboratoryService;
use crate::shared::constants::LABORATORIES_PAGE_PATH;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// State for laboratory handlers
#[derive(Clone)]
pub struct LaboratoryState {
    pub service: Arc<LaboratoryService>,
    pub enforcer: Arc<ResourceEnforcer>,
}

/// List laboratories (admin, segretaria)
#[utoipa::path(
    get,
    path = "/api/laboratori",
    params(PaginationQuery),
    responses(
        (status = 200, description = "List of laboratories", body = ApiResponse<Vec<LaboratoryResponseDto>>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Role not permitted")
    ),
    security(("bearer_auth" = [])),
    tag = "laboratori"
)]
pub async fn list_laboratories(
    ctx: RequestContext,
    State(state): State<LaboratoryState>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<LaboratoryResponseDto>>>> {
    let caller = state
        .enforcer
        .authorize_read(&ctx, Resource::Laboratory)
        .await?;

    let (laboratories, total) = state.service.list(&caller, &pagination).await?;
    let dtos = laboratories.into_iter().map(|l| l.into()).collect();

    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Create a laboratory (admin)
#[utoipa::path(
    post,
    path = "/api/laboratori",
    request_body = LaboratoryInput,
    responses(
        (status = 200, description = "Laboratory created", body = ApiResponse<MutationOutcome>),
        (status = 303, description = "Navigational caller sent back to the list page"),
        (status = 400, description = "Validation or storage failure"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Role not permitted")
    ),
    security(("bearer_auth" = [])),
    tag = "laboratori"
)]
pub async fn create_laboratory(
    ctx: RequestContext,
    State(state): State<LaboratoryState>,
    AppJson(input): AppJson<LaboratoryInput>,
) -> Result<Response> {
    let outcome = state
        .enforcer
        .enforce(&ctx, Mutation::InsertLaboratory(input))
        .await?;
    Ok(mutation_response(&ctx, outcome, LABORATORIES_PAGE_PATH))
}

/// Replace a laboratory's fields (admin)
#[utoipa::path(
    put,
    path = "/api/laboratori/{id}",
    params(("id" = Uuid, Path, description = "Laboratory ID")),
    request_body = LaboratoryInput,
    responses(
        (status = 200, description = "Laboratory updated", body = ApiResponse<MutationOutcome>),
        (status = 400, description = "Validation or storage failure"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Role not permitted")
    ),
    security(("bearer_auth" = [])),
    tag = "laboratori"
)]
pub async fn update_laboratory(
    ctx: RequestContext,
    State(state): State<LaboratoryState>,
    Path(id): Path<Uuid>,
    AppJson(input): AppJson<LaboratoryInput>,
) -> Result<Response> {
    let outcome = state
        .enforcer
        .enforce(&ctx, Mutation::UpdateLaboratory(id, input))
        .await?;
    Ok(mutation_response(&ctx, outcome, LABORATORIES_PAGE_PATH))
}

/// Delete a laboratory (admin)
///
/// Also mounted as `POST /api/laboratori/{id}/delete` for form posts.
#[utoipa::path(
    delete,
    path = "/api/laboratori/{id}",
    params(("id" = Uuid, Path, description = "Laboratory ID")),
    responses(
        (status = 200, description = "Laboratory deleted", body = ApiResponse<MutationOutcome>),
        (status = 303, description = "Navigational caller sent back to the list page"),
        (status = 400, description = "Storage failure"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Role not permitted")
    ),
    security(("bearer_auth" = [])),
    tag = "laboratori"
)]
pub async fn delete_laboratory(
    ctx: RequestContext,
    State(state): State<LaboratoryState>,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    let outcome = state
        .enforcer
        .enforce(&ctx, Mutation::DeleteLaboratory(id))
        .await?;
    Ok(mutation_response(&ctx, outcome, LABORATORIES_PAGE_PATH))
}
