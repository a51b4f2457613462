//! Session accessor: turns request credentials into an [`Identity`].
//!
//! Credentials are pulled out of the request once, explicitly, and handed
//! to [`SessionAccessor::current_identity`]. Nothing here reads ambient
//! state or writes session state.

use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use std::sync::Arc;

use super::model::Identity;
use crate::core::error::Result;

/// External identity provider.
///
/// `Ok(None)` means the credential is missing, expired or invalid.
/// `Err` means the provider could not be asked.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Option<Identity>>;
}

/// Raw session credential found on a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCredentials {
    None,
    Token(String),
}

impl SessionCredentials {
    /// Bearer header wins over the session cookie.
    pub fn from_headers(headers: &HeaderMap, cookie_name: &str) -> Self {
        let bearer = headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty());

        if let Some(token) = bearer {
            return SessionCredentials::Token(token.to_string());
        }

        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|h| h.to_str().ok())
            .flat_map(|h| h.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, value)| *name == cookie_name && !value.is_empty())
            .map(|(_, value)| SessionCredentials::Token(value.to_string()))
            .unwrap_or(SessionCredentials::None)
    }
}

pub struct SessionAccessor {
    provider: Arc<dyn IdentityProvider>,
    cookie_name: String,
}

impl SessionAccessor {
    pub fn new(provider: Arc<dyn IdentityProvider>, cookie_name: String) -> Self {
        Self {
            provider,
            cookie_name,
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub async fn current_identity(
        &self,
        credentials: &SessionCredentials,
    ) -> Result<Option<Identity>> {
        match credentials {
            SessionCredentials::None => Ok(None),
            SessionCredentials::Token(token) => self.provider.verify(token).await,
        }
    }
}
