use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::sync::Mutex;

use crate::core::config::LogtoM2MConfig;

/// Client-credentials token from the Logto token endpoint
#[derive(Debug, Clone, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    access_token: String,
    expires_in: Duration,
    fetched_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self, margin: Duration) -> bool {
        still_valid(self.fetched_at.elapsed(), self.expires_in, margin)
    }
}

fn still_valid(age: Duration, expires_in: Duration, margin: Duration) -> bool {
    age + margin < expires_in
}

/// Holds the management API credential and a cached access token.
///
/// The cache sits behind one async mutex, so concurrent callers wait for a
/// single refresh instead of each fetching their own token.
pub struct LogtoTokenManager {
    config: LogtoM2MConfig,
    client: reqwest::Client,
    cache: Mutex<Option<CachedToken>>,
    /// Refresh this long before expiry
    refresh_margin: Duration,
}

impl LogtoTokenManager {
    pub fn new(config: LogtoM2MConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
            cache: Mutex::new(None),
            refresh_margin: Duration::from_secs(60),
        }
    }

    pub async fn access_token(&self) -> Result<String, TokenError> {
        let mut cache = self.cache.lock().await;

        if let Some(cached) = cache.as_ref().filter(|c| c.is_fresh(self.refresh_margin)) {
            tracing::debug!(
                "Using cached management token (expires in {} seconds)",
                cached
                    .expires_in
                    .saturating_sub(cached.fetched_at.elapsed())
                    .as_secs()
            );
            return Ok(cached.access_token.clone());
        }

        let token = self.fetch_token().await?;
        let access_token = token.access_token.clone();
        *cache = Some(CachedToken {
            access_token: token.access_token,
            expires_in: Duration::from_secs(token.expires_in),
            fetched_at: Instant::now(),
        });

        Ok(access_token)
    }

    async fn fetch_token(&self) -> Result<TokenResponse, TokenError> {
        tracing::debug!("Fetching management token from {}", self.config.token_url);

        let response = self
            .client
            .post(&self.config.token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", &self.config.client_id),
                ("client_secret", &self.config.client_secret),
                ("scope", &self.config.scope),
                ("resource", &self.config.resource),
            ])
            .send()
            .await
            .map_err(|e| TokenError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TokenError::Rejected(format!("HTTP {} - {}", status, body)));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| TokenError::ParseError(e.to_string()))?;

        tracing::info!(
            "Fetched management token, expires in {} seconds",
            token.expires_in
        );

        Ok(token)
    }

    pub fn api_base_url(&self) -> &str {
        &self.config.api_base_url
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token endpoint unreachable: {0}")]
    Unreachable(String),

    #[error("Token request rejected: {0}")]
    Rejected(String),

    #[error("Failed to parse token response: {0}")]
    ParseError(String),
}
