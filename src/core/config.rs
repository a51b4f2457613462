use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub portal: PortalConfig,
    pub swagger: SwaggerConfig,
    pub logto_m2m: LogtoM2MConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

/// Identity provider settings used to verify session tokens
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub issuer: String,
    pub audience: String,
    pub jwks_cache_ttl: Duration,
    pub jwt_leeway: Duration,
}

/// Portal session and diagnostics settings
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// Cookie carrying the session token when no bearer header is sent
    pub session_cookie_name: String,
    /// Exposes `/api/debug/session`. Never enable in production.
    pub debug_surface_enabled: bool,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// Elevated Logto Machine-to-Machine credential.
/// Only the identity bridge may hold a token minted from this.
#[derive(Debug, Clone)]
pub struct LogtoM2MConfig {
    pub client_id: String,
    pub client_secret: String,
    pub resource: String,
    pub scope: String,
    pub token_url: String,
    pub api_base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            portal: PortalConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
            logto_m2m: LogtoM2MConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DB_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
        })
    }
}

impl AuthConfig {
    const DEFAULT_JWKS_CACHE_TTL_SECS: u64 = 3600; // 1 hour
    const DEFAULT_JWT_LEEWAY_SECS: u64 = 60; // 1 minute

    pub fn from_env() -> Result<Self, String> {
        let issuer = env::var("LOGTO_ISSUER")
            .map_err(|_| "LOGTO_ISSUER environment variable is required".to_string())?;

        let audience = env::var("LOGTO_AUDIENCE")
            .map_err(|_| "LOGTO_AUDIENCE environment variable is required".to_string())?;

        let jwks_cache_ttl_secs = env::var("JWKS_CACHE_TTL")
            .unwrap_or_else(|_| Self::DEFAULT_JWKS_CACHE_TTL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "JWKS_CACHE_TTL must be a valid number".to_string())?;

        let jwt_leeway_secs = env::var("JWT_LEEWAY")
            .unwrap_or_else(|_| Self::DEFAULT_JWT_LEEWAY_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "JWT_LEEWAY must be a valid number".to_string())?;

        Ok(Self {
            issuer,
            audience,
            jwks_cache_ttl: Duration::from_secs(jwks_cache_ttl_secs),
            jwt_leeway: Duration::from_secs(jwt_leeway_secs),
        })
    }
}

impl PortalConfig {
    const DEFAULT_SESSION_COOKIE_NAME: &'static str = "portal_session";

    pub fn from_env() -> Result<Self, String> {
        let session_cookie_name = env::var("SESSION_COOKIE_NAME")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| Self::DEFAULT_SESSION_COOKIE_NAME.to_string());

        let debug_surface_enabled = env::var("DEBUG_SURFACE_ENABLED")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .map_err(|_| "DEBUG_SURFACE_ENABLED must be true or false".to_string())?;

        Ok(Self {
            session_cookie_name,
            debug_surface_enabled,
        })
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: Self::DEFAULT_SESSION_COOKIE_NAME.to_string(),
            debug_surface_enabled: false,
        }
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Clinica Portal API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "API documentation for the clinical portal".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

impl LogtoM2MConfig {
    pub fn from_env() -> Result<Self, String> {
        let client_id = env::var("LOGTO_M2M_CLIENT_ID")
            .map_err(|_| "LOGTO_M2M_CLIENT_ID environment variable is required".to_string())?;

        let client_secret = env::var("LOGTO_M2M_CLIENT_SECRET")
            .map_err(|_| "LOGTO_M2M_CLIENT_SECRET environment variable is required".to_string())?;

        let resource = env::var("LOGTO_M2M_RESOURCE")
            .unwrap_or_else(|_| "https://default.logto.app/api".to_string());

        // Read-only user lookup is all the bridge needs
        let scope = env::var("LOGTO_M2M_SCOPE").unwrap_or_else(|_| "read:users".to_string());

        let issuer = env::var("LOGTO_ISSUER")
            .map_err(|_| "LOGTO_ISSUER environment variable is required".to_string())?;
        let token_url = format!("{}/token", issuer);

        // Management API lives at the tenant root, not under /oidc
        let api_base_url = issuer.trim_end_matches("/oidc").to_string();

        Ok(Self {
            client_id,
            client_secret,
            resource,
            scope,
            token_url,
            api_base_url,
        })
    }
}
