use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use super::token_manager::LogtoTokenManager;
use crate::core::error::{AppError, Result};

/// Lookup of identities held by the identity provider.
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    /// Primary email of `identity_id`. `None` when the identity does not
    /// exist or has no email.
    async fn primary_email(&self, identity_id: &str) -> Result<Option<String>>;
}

/// Subset of the Management API user record we read
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LogtoUser {
    #[serde(default)]
    primary_email: Option<String>,
}

/// Logto Management API (`GET /api/users/{id}`)
pub struct LogtoIdentityDirectory {
    token_manager: Arc<LogtoTokenManager>,
    http_client: reqwest::Client,
}

impl LogtoIdentityDirectory {
    pub fn new(token_manager: Arc<LogtoTokenManager>) -> Self {
        Self {
            token_manager,
            http_client: reqwest::Client::new(),
        }
    }

    fn user_url(&self, identity_id: &str) -> String {
        format!(
            "{}/api/users/{}",
            self.token_manager.api_base_url().trim_end_matches('/'),
            urlencoding::encode(identity_id)
        )
    }
}

#[async_trait]
impl IdentityDirectory for LogtoIdentityDirectory {
    async fn primary_email(&self, identity_id: &str) -> Result<Option<String>> {
        let token = self.token_manager.access_token().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Management token unavailable: {}", e))
        })?;

        let response = self
            .http_client
            .get(self.user_url(identity_id))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("Management API unreachable: {}", e))
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => return Ok(None),
            status if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                return Err(AppError::ExternalServiceError(format!(
                    "Management API returned HTTP {}: {}",
                    status, body
                )));
            }
            _ => {}
        }

        let user: LogtoUser = response.json().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Failed to parse Logto user: {}", e))
        })?;

        Ok(user.primary_email.filter(|e| !e.is_empty()))
    }
}
