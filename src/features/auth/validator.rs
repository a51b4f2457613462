use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use super::jwks::JwksClient;
use super::model::Identity;
use super::session::IdentityProvider;
use crate::core::error::{AppError, Result};

/// Verifies Logto-issued RS256 access tokens against the tenant JWKS.
pub struct JwtValidator {
    jwks_client: Arc<JwksClient>,
    issuer: String,
    audience: String,
    leeway: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    kind: Option<String>,
}

impl JwtValidator {
    pub fn new(
        jwks_client: Arc<JwksClient>,
        issuer: String,
        audience: String,
        leeway: Duration,
    ) -> Self {
        Self {
            jwks_client,
            issuer,
            audience,
            leeway: leeway.as_secs(),
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.leeway = self.leeway;
        validation.validate_nbf = true;
        validation
    }
}

#[async_trait]
impl IdentityProvider for JwtValidator {
    async fn verify(&self, token: &str) -> Result<Option<Identity>> {
        let header = match decode_header(token) {
            Ok(header) => header,
            Err(e) => {
                tracing::debug!("Rejecting malformed session token: {}", e);
                return Ok(None);
            }
        };

        if header.alg != Algorithm::RS256 {
            tracing::debug!("Rejecting token signed with {:?}", header.alg);
            return Ok(None);
        }

        let Some(kid) = header.kid else {
            tracing::debug!("Rejecting token without kid");
            return Ok(None);
        };

        let decoding_key = match self.jwks_client.get_key(&kid).await {
            Ok(key) => key,
            Err(e) if e.is_transient() => {
                return Err(AppError::TransientResolution(format!(
                    "Identity provider unavailable: {}",
                    e
                )));
            }
            Err(e) => {
                tracing::debug!("Rejecting token: {}", e);
                return Ok(None);
            }
        };

        let claims = match decode::<Claims>(token, &decoding_key, &self.validation()) {
            Ok(data) => data.claims,
            Err(e) => {
                // Expired, wrong audience, bad signature: all plain "no session"
                tracing::debug!("Rejecting session token: {}", e);
                return Ok(None);
            }
        };

        // Token exchange tokens may omit `kind`
        if matches!(claims.kind.as_deref(), Some(kind) if kind != "AccessToken") {
            tracing::debug!("Rejecting non-access token");
            return Ok(None);
        }

        Ok(Some(Identity {
            id: claims.sub,
            email: claims.email,
        }))
    }
}
