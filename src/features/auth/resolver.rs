use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use super::model::{Identity, Profile, RequestContext, Role};
use crate::core::database::is_transient;
use crate::core::error::{AppError, Result};

/// Read access to profile rows.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn find_profile(&self, identity_id: &str) -> Result<Option<Profile>>;
}

/// Profile lookup on the shared pool. Runs as the service role so it sees
/// every row; this is the same lookup `app_current_role()` performs in SQL.
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn find_profile(&self, identity_id: &str) -> Result<Option<Profile>> {
        sqlx::query_as::<_, Profile>(
            r#"
            SELECT id, nome AS first_name, cognome AS last_name, ruolo AS role, attivo AS active
            FROM profili
            WHERE id = $1
            "#,
        )
        .bind(identity_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_transient(&e) {
                AppError::TransientResolution(format!("Profile store unavailable: {}", e))
            } else {
                tracing::error!("Failed to look up profile: {:?}", e);
                AppError::Database(e)
            }
        })
    }
}

/// Everything the resolver saw, for the debug surface.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub profile: Option<Profile>,
    pub role: Option<Role>,
}

pub struct RoleResolver {
    profiles: Arc<dyn ProfileStore>,
}

impl RoleResolver {
    pub fn new(profiles: Arc<dyn ProfileStore>) -> Self {
        Self { profiles }
    }

    /// Map an identity to its single active role.
    ///
    /// Safe with no identity: returns `None` without touching the store.
    /// Missing or inactive profiles resolve to `None`; there is no fallback
    /// to a lesser role.
    pub async fn resolve_role(&self, identity: Option<&Identity>) -> Result<Option<Role>> {
        Ok(self.resolve_identity(identity).await?.role)
    }

    pub async fn resolve(&self, ctx: &RequestContext) -> Result<Resolution> {
        self.resolve_identity(ctx.identity.as_ref()).await
    }

    async fn resolve_identity(&self, identity: Option<&Identity>) -> Result<Resolution> {
        let Some(identity) = identity else {
            return Ok(Resolution {
                profile: None,
                role: None,
            });
        };

        let profile = self.profiles.find_profile(&identity.id).await?;
        let role = profile.as_ref().filter(|p| p.active).map(|p| p.role);

        if let Some(p) = profile.as_ref().filter(|p| !p.active) {
            tracing::debug!(identity_id = %identity.id, stored_role = %p.role, "Profile inactive, no role");
        }

        Ok(Resolution { profile, role })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{identity, InMemoryProfileStore};

    #[tokio::test]
    async fn test_no_identity_skips_lookup() {
        let store = Arc::new(InMemoryProfileStore::default());
        let resolver = RoleResolver::new(store.clone());

        assert_eq!(resolver.resolve_role(None).await.unwrap(), None);
        assert_eq!(store.lookups(), 0);
    }

    #[tokio::test]
    async fn test_missing_profile_resolves_to_none() {
        let resolver = RoleResolver::new(Arc::new(InMemoryProfileStore::default()));
        let u2 = identity("u2");

        assert_eq!(resolver.resolve_role(Some(&u2)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_inactive_profile_resolves_to_none_for_every_role() {
        for role in Role::ALL {
            let store = InMemoryProfileStore::default().with_profile("u1", role, false);
            let resolver = RoleResolver::new(Arc::new(store));

            assert_eq!(
                resolver.resolve_role(Some(&identity("u1"))).await.unwrap(),
                None,
                "inactive {} must not resolve",
                role
            );
        }
    }

    #[tokio::test]
    async fn test_active_profile_resolves_its_role() {
        let store = InMemoryProfileStore::default().with_profile("u1", Role::Paziente, true);
        let resolver = RoleResolver::new(Arc::new(store));

        assert_eq!(
            resolver.resolve_role(Some(&identity("u1"))).await.unwrap(),
            Some(Role::Paziente)
        );
    }

    #[tokio::test]
    async fn test_store_outage_is_not_no_role() {
        let store = InMemoryProfileStore::default().failing();
        let resolver = RoleResolver::new(Arc::new(store));

        let result = resolver.resolve_role(Some(&identity("u1"))).await;
        assert!(matches!(result, Err(AppError::TransientResolution(_))));
    }

    #[tokio::test]
    async fn test_resolution_exposes_raw_profile() {
        let store = InMemoryProfileStore::default().with_profile("a1", Role::Admin, false);
        let resolver = RoleResolver::new(Arc::new(store));
        let ctx = RequestContext::authenticated(
            identity("a1"),
            crate::features::auth::model::RequestKind::Api,
        );

        let resolution = resolver.resolve(&ctx).await.unwrap();
        assert_eq!(resolution.profile.map(|p| p.role), Some(Role::Admin));
        assert_eq!(resolution.role, None);
    }
}
