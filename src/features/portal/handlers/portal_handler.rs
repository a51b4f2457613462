use std::sync::Arc;

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};

use crate::core::error::{AppError, Result};
use crate::features::auth::gate::AccessGate;
use crate::features::auth::model::RequestContext;
use crate::features::auth::router::{denial_page, landing_for, root_entry, DenialPageOutcome};
use crate::features::portal::dtos::{DebugSessionDto, LandingDto};
use crate::shared::types::ApiResponse;

const DENIAL_PAGE: &str = r#"<!DOCTYPE html>
<html lang="it">
<head><meta charset="utf-8"><title>Accesso non autorizzato</title></head>
<body>
<h1>Accesso non autorizzato</h1>
<p>Non hai i permessi per visualizzare questa pagina.</p>
<p><a href="/login">Accedi</a></p>
</body>
</html>
"#;

#[derive(Clone)]
pub struct PortalState {
    pub gate: Arc<AccessGate>,
    pub debug_surface_enabled: bool,
}

/// Root entry point: always a redirect to the caller's landing
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 303, description = "Redirect to the landing for the caller's role"),
        (status = 503, description = "Role could not be resolved")
    ),
    tag = "portal"
)]
pub async fn root(ctx: RequestContext, State(state): State<PortalState>) -> Result<Redirect> {
    let role = state
        .gate
        .resolver()
        .resolve_role(ctx.identity.as_ref())
        .await?;
    Ok(Redirect::to(root_entry(role).path()))
}

/// Denial page
///
/// Callers with a role leave for their own landing. Everyone else gets the
/// static page rendered in place.
#[utoipa::path(
    get,
    path = "/unauthorized",
    responses(
        (status = 200, description = "Denial page", content_type = "text/html"),
        (status = 303, description = "Redirect to the landing for the caller's role"),
        (status = 503, description = "Role could not be resolved")
    ),
    tag = "portal"
)]
pub async fn unauthorized(ctx: RequestContext, State(state): State<PortalState>) -> Result<Response> {
    let role = state
        .gate
        .resolver()
        .resolve_role(ctx.identity.as_ref())
        .await?;

    Ok(match denial_page(role) {
        DenialPageOutcome::Redirect(destination) => Redirect::to(destination.path()).into_response(),
        DenialPageOutcome::RenderDenial => Html(DENIAL_PAGE).into_response(),
    })
}

/// Landing destination for the current session
#[utoipa::path(
    get,
    path = "/api/session/landing",
    responses(
        (status = 200, description = "Resolved role and destination", body = ApiResponse<LandingDto>),
        (status = 503, description = "Role could not be resolved")
    ),
    tag = "portal"
)]
pub async fn session_landing(
    ctx: RequestContext,
    State(state): State<PortalState>,
) -> Result<Json<ApiResponse<LandingDto>>> {
    let role = state
        .gate
        .resolver()
        .resolve_role(ctx.identity.as_ref())
        .await?;

    let dto = LandingDto {
        role,
        destination: landing_for(role).path().to_string(),
    };
    Ok(Json(ApiResponse::success(Some(dto), None, None)))
}

/// Session diagnostics (only when `DEBUG_SURFACE_ENABLED=true`)
#[utoipa::path(
    get,
    path = "/api/debug/session",
    responses(
        (status = 200, description = "Identity, raw profile and resolved role", body = ApiResponse<DebugSessionDto>),
        (status = 404, description = "Debug surface disabled")
    ),
    tag = "portal"
)]
pub async fn debug_session(
    ctx: RequestContext,
    State(state): State<PortalState>,
) -> Result<Json<ApiResponse<DebugSessionDto>>> {
    if !state.debug_surface_enabled {
        return Err(AppError::NotFound("Not found".to_string()));
    }

    let resolution = state.gate.resolver().resolve(&ctx).await?;
    tracing::debug!(
        identity_id = ctx.identity.as_ref().map(|i| i.id.as_str()).unwrap_or("-"),
        "Debug session inspected"
    );

    let dto = DebugSessionDto {
        identity: ctx.identity,
        profile: resolution.profile,
        role: resolution.role,
    };
    Ok(Json(ApiResponse::success(Some(dto), None, None)))
}

#[cfg(test)]
mod tests {
    use crate::features::auth::model::Role;
    use crate::features::portal::routes;
    use crate::shared::test_helpers::{
        gate_for, with_session, InMemoryProfileStore, StaticIdentityProvider, TEST_COOKIE_NAME,
        TRANSIENT_TOKEN,
    };
    use axum::http::{header, HeaderValue, StatusCode};
    use axum_test::TestServer;
    use std::sync::Arc;

    fn server(profiles: InMemoryProfileStore, debug: bool) -> TestServer {
        let provider = StaticIdentityProvider::default()
            .with("tok-admin", "a1")
            .with("tok-staff", "s1")
            .with("tok-patient", "p1")
            .with("tok-orphan", "nobody")
            .with("tok-inactive", "s2");
        let app = with_session(routes::routes(gate_for(Arc::new(profiles)), debug), provider);
        TestServer::new(app).unwrap()
    }

    fn profiles() -> InMemoryProfileStore {
        InMemoryProfileStore::default()
            .with_profile("a1", Role::Admin, true)
            .with_profile("s1", Role::Segretaria, true)
            .with_profile("p1", Role::Paziente, true)
            .with_profile("s2", Role::Segretaria, false)
    }

    fn bearer(token: &str) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
    }

    #[tokio::test]
    async fn test_root_redirects_each_role_to_its_landing() {
        let server = server(profiles(), false);

        for (token, expected) in [
            ("tok-admin", "/admin"),
            ("tok-staff", "/segreteria/pazienti"),
            ("tok-patient", "/paziente/referti"),
            ("tok-orphan", "/login"),
            ("tok-inactive", "/login"),
        ] {
            let response = server
                .get("/")
                .add_header(header::AUTHORIZATION, bearer(token))
                .await;
            assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
            assert_eq!(response.header(header::LOCATION), expected, "token {}", token);
        }
    }

    #[tokio::test]
    async fn test_anonymous_root_then_denial_page_renders_in_place() {
        let server = server(profiles(), false);

        let response = server.get("/").await;
        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
        assert_eq!(response.header(header::LOCATION), "/login");

        let response = server.get("/unauthorized").await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert!(response.text().contains("Accesso non autorizzato"));
    }

    #[tokio::test]
    async fn test_denial_page_sends_roles_home() {
        let server = server(profiles(), false);

        let response = server
            .get("/unauthorized")
            .add_header(header::AUTHORIZATION, bearer("tok-admin"))
            .await;
        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
        assert_eq!(response.header(header::LOCATION), "/admin");

        // An identity without a profile has no role: rendered, never looped
        let response = server
            .get("/unauthorized")
            .add_header(header::AUTHORIZATION, bearer("tok-orphan"))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_session_cookie_is_accepted() {
        let server = server(profiles(), false);

        let response = server
            .get("/")
            .add_header(
                header::COOKIE,
                HeaderValue::from_str(&format!("{}=tok-patient", TEST_COOKIE_NAME)).unwrap(),
            )
            .await;
        assert_eq!(response.header(header::LOCATION), "/paziente/referti");
    }

    #[tokio::test]
    async fn test_provider_outage_is_503_not_login() {
        let server = server(profiles(), false);

        let response = server
            .get("/")
            .add_header(header::AUTHORIZATION, bearer(TRANSIENT_TOKEN))
            .await;
        assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_profile_store_outage_is_503() {
        let server = server(profiles().failing(), false);

        let response = server
            .get("/unauthorized")
            .add_header(header::AUTHORIZATION, bearer("tok-staff"))
            .await;
        assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_session_landing() {
        let server = server(profiles(), false);

        let response = server
            .get("/api/session/landing")
            .add_header(header::AUTHORIZATION, bearer("tok-staff"))
            .await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["data"]["role"], "segretaria");
        assert_eq!(body["data"]["destination"], "/segreteria/pazienti");

        let body: serde_json::Value = server.get("/api/session/landing").await.json();
        assert_eq!(body["data"]["role"], serde_json::Value::Null);
        assert_eq!(body["data"]["destination"], "/login");
    }

    #[tokio::test]
    async fn test_debug_surface_is_off_by_default() {
        let server = server(profiles(), false);

        let response = server
            .get("/api/debug/session")
            .add_header(header::AUTHORIZATION, bearer("tok-admin"))
            .await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_debug_surface_shows_inactive_profile_without_role() {
        let server = server(profiles(), true);

        let response = server
            .get("/api/debug/session")
            .add_header(header::AUTHORIZATION, bearer("tok-inactive"))
            .await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["data"]["identity"]["id"], "s2");
        assert_eq!(body["data"]["profile"]["role"], "segretaria");
        assert_eq!(body["data"]["profile"]["active"], false);
        assert_eq!(body["data"]["role"], serde_json::Value::Null);
    }
}
