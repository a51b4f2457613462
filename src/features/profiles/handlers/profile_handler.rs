use std::sync::Arc;

use axum::{
    extract::{FromRef, Path, Query, State},
    response::Response,
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::access::{
    mutation_response, Mutation, MutationOutcome, Resource, ResourceEnforcer,
};
use crate::features::auth::gate::AccessGate;
use crate::features::auth::guards::RequireAdmin;
use crate::features::auth::model::{RequestContext, Role};
use crate::features::logto::ElevatedIdentityBridge;
use crate::features::profiles::dtos::{OperatorDetailDto, ProfileResponseDto, ProfileUpdateDto};
use crate::features::profiles::services::{ProfileService, OPERATOR_ROLES};
use crate::shared::constants::OPERATORS_PAGE_PATH;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// State for profile handlers. `RequireAdmin` reads the gate from here.
#[derive(Clone, FromRef)]
pub struct ProfileState {
    pub service: Arc<ProfileService>,
    pub enforcer: Arc<ResourceEnforcer>,
    pub gate: Arc<AccessGate>,
    pub bridge: Arc<ElevatedIdentityBridge>,
}

/// List operators (admin)
#[utoipa::path(
    get,
    path = "/api/operatori",
    params(PaginationQuery),
    responses(
        (status = 200, description = "List of operators", body = ApiResponse<Vec<ProfileResponseDto>>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not an admin")
    ),
    security(("bearer_auth" = [])),
    tag = "operatori"
)]
pub async fn list_operators(
    RequireAdmin(grant): RequireAdmin,
    State(state): State<ProfileState>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<ProfileResponseDto>>>> {
    let (profiles, total) = state
        .service
        .list_by_roles(grant.authorized(), &OPERATOR_ROLES, &pagination)
        .await?;
    let dtos = profiles.into_iter().map(|p| p.into()).collect();

    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Get operator with contact email
///
/// The email comes from the identity provider's management API through the
/// elevated bridge.
#[utoipa::path(
    get,
    path = "/api/operatori/{id}",
    params(("id" = String, Path, description = "Identity ID")),
    responses(
        (status = 200, description = "Operator found", body = ApiResponse<OperatorDetailDto>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "Operator not found"),
        (status = 502, description = "Identity provider error")
    ),
    security(("bearer_auth" = [])),
    tag = "operatori"
)]
pub async fn get_operator(
    RequireAdmin(grant): RequireAdmin,
    State(state): State<ProfileState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<OperatorDetailDto>>> {
    let profile = state
        .service
        .get(grant.authorized(), &id, &OPERATOR_ROLES)
        .await?;
    let email = state.bridge.lookup_identity_contact(&grant, &id).await?;

    let dto = OperatorDetailDto {
        profile: profile.into(),
        email,
    };
    Ok(Json(ApiResponse::success(Some(dto), None, None)))
}

/// Update an operator's profile (admin)
#[utoipa::path(
    put,
    path = "/api/operatori/{id}",
    params(("id" = String, Path, description = "Identity ID")),
    request_body = ProfileUpdateDto,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<MutationOutcome>),
        (status = 303, description = "Navigational caller sent back to the list page"),
        (status = 400, description = "Validation or storage failure"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not an admin")
    ),
    security(("bearer_auth" = [])),
    tag = "operatori"
)]
pub async fn update_operator(
    ctx: RequestContext,
    State(state): State<ProfileState>,
    Path(id): Path<String>,
    AppJson(update): AppJson<ProfileUpdateDto>,
) -> Result<Response> {
    let outcome = state
        .enforcer
        .enforce(&ctx, Mutation::UpdateProfile(id, update))
        .await?;
    Ok(mutation_response(&ctx, outcome, OPERATORS_PAGE_PATH))
}

/// List patients (admin, segretaria)
#[utoipa::path(
    get,
    path = "/api/pazienti",
    params(PaginationQuery),
    responses(
        (status = 200, description = "List of patients", body = ApiResponse<Vec<ProfileResponseDto>>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Role not permitted")
    ),
    security(("bearer_auth" = [])),
    tag = "pazienti"
)]
pub async fn list_patients(
    ctx: RequestContext,
    State(state): State<ProfileState>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<ProfileResponseDto>>>> {
    let caller = state
        .enforcer
        .authorize_read(&ctx, Resource::Profile)
        .await?;

    let (profiles, total) = state
        .service
        .list_by_roles(&caller, &[Role::Paziente], &pagination)
        .await?;
    let dtos = profiles.into_iter().map(|p| p.into()).collect();

    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}
