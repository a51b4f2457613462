mod core;
mod features;
mod shared;

use crate::core::config::Config;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::access::{PgProtectedStorage, ResourceEnforcer};
use crate::features::auth;
use crate::features::auth::gate::AccessGate;
use crate::features::auth::resolver::{PgProfileStore, RoleResolver};
use crate::features::auth::session::SessionAccessor;
use crate::features::exam_types::{routes as exam_types_routes, ExamTypeService};
use crate::features::laboratories::{routes as laboratories_routes, LaboratoryService};
use crate::features::logto::{ElevatedIdentityBridge, LogtoIdentityDirectory, LogtoTokenManager};
use crate::features::portal::routes as portal_routes;
use crate::features::profiles::{routes as profiles_routes, ProfileService};
use crate::features::reports::{routes as reports_routes, ReportService};
use axum::{
    middleware::{from_fn, from_fn_with_state},
    Router,
};
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "System info: tokio_worker_threads={}, pid={}",
        worker_threads,
        std::process::id()
    );
    tracing::info!("Configuration loaded successfully");

    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    // Schema and row-level policies ship together
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    // Session accessor backed by Logto JWKS
    let jwks_client = Arc::new(auth::JwksClient::new(
        &config.auth.issuer,
        config.auth.jwks_cache_ttl,
    ));
    let jwt_validator = Arc::new(auth::JwtValidator::new(
        jwks_client,
        config.auth.issuer.clone(),
        config.auth.audience.clone(),
        config.auth.jwt_leeway,
    ));
    let session_accessor = Arc::new(SessionAccessor::new(
        jwt_validator,
        config.portal.session_cookie_name.clone(),
    ));
    tracing::info!(
        "Session accessor initialized (cookie: {})",
        config.portal.session_cookie_name
    );

    // Resolver, gate and enforcer
    let role_resolver = Arc::new(RoleResolver::new(Arc::new(PgProfileStore::new(
        pool.clone(),
    ))));
    let access_gate = Arc::new(AccessGate::new(role_resolver));
    let protected_storage = Arc::new(PgProtectedStorage::new(pool.clone()));
    let enforcer = Arc::new(ResourceEnforcer::new(
        Arc::clone(&access_gate),
        protected_storage,
    ));
    tracing::info!("Access gate and resource enforcer initialized");

    // Elevated bridge is the only holder of the management credential
    let logto_token_manager = Arc::new(LogtoTokenManager::new(config.logto_m2m.clone()));
    let identity_directory = Arc::new(LogtoIdentityDirectory::new(logto_token_manager));
    let identity_bridge = Arc::new(ElevatedIdentityBridge::new(identity_directory));
    tracing::info!("Elevated identity bridge initialized");

    let laboratory_service = Arc::new(LaboratoryService::new(pool.clone()));
    let exam_type_service = Arc::new(ExamTypeService::new(pool.clone()));
    let profile_service = Arc::new(ProfileService::new(pool.clone()));
    let report_service = Arc::new(ReportService::new(pool.clone()));
    tracing::info!("Resource services initialized");

    if config.portal.debug_surface_enabled {
        tracing::warn!("Debug session surface enabled at /api/debug/session");
    }

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    // Every route below sees a RequestContext built by the session middleware
    let portal = Router::new()
        .merge(portal_routes::routes(
            Arc::clone(&access_gate),
            config.portal.debug_surface_enabled,
        ))
        .merge(laboratories_routes::routes(
            laboratory_service,
            Arc::clone(&enforcer),
        ))
        .merge(exam_types_routes::routes(
            exam_type_service,
            Arc::clone(&enforcer),
        ))
        .merge(profiles_routes::routes(
            profile_service,
            Arc::clone(&enforcer),
            Arc::clone(&access_gate),
            identity_bridge,
        ))
        .merge(reports_routes::routes(report_service, Arc::clone(&enforcer)))
        .route_layer(from_fn_with_state(
            session_accessor,
            middleware::session_middleware,
        ));

    // Simple health check endpoint (no session required)
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    let app = Router::new()
        .merge(swagger)
        .merge(portal)
        .merge(health_route)
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
