use jsonwebtoken::DecodingKey;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Deserialize)]
struct JwksResponse {
    keys: Vec<Jwk>,
}

#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    kid: String,
    kty: String,
    #[serde(default)]
    n: Option<String>,
    #[serde(default)]
    e: Option<String>,
}

struct JwksCache {
    keys: HashMap<String, DecodingKey>,
    last_fetched: Instant,
}

/// Signing keys published by the identity provider, cached for `cache_ttl`.
pub struct JwksClient {
    jwks_url: String,
    client: reqwest::Client,
    cache: Arc<RwLock<Option<JwksCache>>>,
    cache_ttl: Duration,
}

impl JwksClient {
    pub fn new(issuer_url: &str, cache_ttl: Duration) -> Self {
        Self {
            jwks_url: format!("{}/jwks", issuer_url.trim_end_matches('/')),
            client: reqwest::Client::new(),
            cache: Arc::new(RwLock::new(None)),
            cache_ttl,
        }
    }

    pub async fn get_key(&self, kid: &str) -> Result<DecodingKey, JwksError> {
        {
            let cache = self.cache.read().await;
            if let Some(ref cached) = *cache {
                if cached.last_fetched.elapsed() < self.cache_ttl {
                    if let Some(key) = cached.keys.get(kid) {
                        return Ok(key.clone());
                    }
                }
            }
        }

        // Miss or stale: a rotated key shows up after one refetch
        self.fetch_jwks().await?;

        let cache = self.cache.read().await;
        cache
            .as_ref()
            .and_then(|cached| cached.keys.get(kid).cloned())
            .ok_or_else(|| JwksError::KeyNotFound(kid.to_string()))
    }

    async fn fetch_jwks(&self) -> Result<(), JwksError> {
        tracing::debug!("Fetching JWKS from {}", self.jwks_url);

        let response = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| JwksError::FetchError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(JwksError::FetchError(format!(
                "Failed to fetch JWKS: HTTP {}",
                response.status()
            )));
        }

        let jwks: JwksResponse = response
            .json()
            .await
            .map_err(|e| JwksError::ParseError(e.to_string()))?;

        let mut keys = HashMap::new();

        for jwk in jwks.keys.into_iter().filter(|k| k.kty == "RSA") {
            let (Some(n), Some(e)) = (jwk.n.as_deref(), jwk.e.as_deref()) else {
                return Err(JwksError::KeyConversionError(format!(
                    "RSA key {} is missing modulus or exponent",
                    jwk.kid
                )));
            };
            let decoding_key = DecodingKey::from_rsa_components(n, e)
                .map_err(|e| JwksError::KeyConversionError(e.to_string()))?;
            keys.insert(jwk.kid, decoding_key);
        }

        let mut cache = self.cache.write().await;
        *cache = Some(JwksCache {
            keys,
            last_fetched: Instant::now(),
        });

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwksError {
    #[error("Failed to fetch JWKS: {0}")]
    FetchError(String),

    #[error("Failed to parse JWKS: {0}")]
    ParseError(String),

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Failed to convert key: {0}")]
    KeyConversionError(String),
}

impl JwksError {
    /// Whether the provider itself failed, as opposed to the token naming a
    /// key the provider does not publish.
    pub fn is_transient(&self) -> bool {
        !matches!(self, JwksError::KeyNotFound(_))
    }
}
