//! Access gate.
//!
//! [`decide`] is the whole policy: a pure function of the resolved role and
//! the allowed set. [`AccessGate`] wires it to the resolver and turns a
//! denial into [`AppError::AccessDenied`]; the response layer decides
//! whether that becomes a redirect or a status code.

use std::sync::Arc;

use super::model::{
    AccessDecision, Denial, DenyReason, Identity, RequestContext, Role, RoleSet,
};
use super::resolver::RoleResolver;
use crate::core::error::{AppError, Result};

const ADMIN_ONLY: RoleSet = RoleSet::of(&[Role::Admin]);

pub fn decide(role: Option<Role>, allowed: RoleSet) -> AccessDecision {
    match role {
        None => AccessDecision::Deny(DenyReason::Unauthenticated),
        Some(role) if allowed.contains(role) => AccessDecision::Allow(role),
        Some(role) => AccessDecision::Deny(DenyReason::RoleNotPermitted(role)),
    }
}

/// Proof that the gate allowed the caller in this request.
#[derive(Debug, Clone)]
pub struct Authorized {
    identity: Identity,
    role: Role,
}

impl Authorized {
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

/// Proof that the caller passed `require_role({admin})` in this request.
/// Only the gate can mint one.
#[derive(Debug)]
pub struct AdminGrant {
    authorized: Authorized,
}

impl AdminGrant {
    pub fn identity(&self) -> &Identity {
        self.authorized.identity()
    }

    pub fn authorized(&self) -> &Authorized {
        &self.authorized
    }
}

pub struct AccessGate {
    resolver: Arc<RoleResolver>,
}

impl AccessGate {
    pub fn new(resolver: Arc<RoleResolver>) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &RoleResolver {
        &self.resolver
    }

    /// Non-strict form for conditional UI. Transient failures still error.
    pub async fn check(&self, ctx: &RequestContext, allowed: RoleSet) -> Result<AccessDecision> {
        let role = self.resolver.resolve_role(ctx.identity.as_ref()).await?;
        Ok(decide(role, allowed))
    }

    /// Strict form. Nothing guarded runs unless this returns `Ok`.
    pub async fn require_role(&self, ctx: &RequestContext, allowed: RoleSet) -> Result<Authorized> {
        let decision = match self.check(ctx, allowed).await {
            Ok(decision) => decision,
            Err(e) => {
                tracing::error!(
                    identity_id = ctx.identity.as_ref().map(|i| i.id.as_str()).unwrap_or("-"),
                    allowed = %allowed,
                    "Role resolution failed, denying: {}",
                    e
                );
                return Err(e);
            }
        };

        match (decision, ctx.identity.as_ref()) {
            (AccessDecision::Allow(role), Some(identity)) => Ok(Authorized {
                identity: identity.clone(),
                role,
            }),
            (AccessDecision::Deny(reason), _) => {
                tracing::info!(
                    identity_id = ctx.identity.as_ref().map(|i| i.id.as_str()).unwrap_or("-"),
                    allowed = %allowed,
                    reason = %reason,
                    "Access denied"
                );
                Err(AppError::AccessDenied(Denial {
                    kind: ctx.kind,
                    reason,
                }))
            }
            // A role never resolves without an identity
            (AccessDecision::Allow(_), None) => Err(AppError::Internal(
                "Role resolved without an identity".to_string(),
            )),
        }
    }

    pub async fn require_admin(&self, ctx: &RequestContext) -> Result<AdminGrant> {
        let authorized = self.require_role(ctx, ADMIN_ONLY).await?;
        Ok(AdminGrant { authorized })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::RequestKind;
    use crate::shared::test_helpers::{identity, InMemoryProfileStore};

    fn gate(store: InMemoryProfileStore) -> AccessGate {
        AccessGate::new(Arc::new(RoleResolver::new(Arc::new(store))))
    }

    fn non_empty_role_sets() -> Vec<RoleSet> {
        let mut sets = Vec::new();
        for mask in 1u8..8 {
            let roles: Vec<Role> = Role::ALL
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, r)| *r)
                .collect();
            sets.push(RoleSet::of(&roles));
        }
        sets
    }

    #[test]
    fn test_decide_matrix() {
        let staff = RoleSet::of(&[Role::Admin, Role::Segretaria]);
        assert_eq!(decide(Some(Role::Admin), staff), AccessDecision::Allow(Role::Admin));
        assert_eq!(
            decide(Some(Role::Paziente), staff),
            AccessDecision::Deny(DenyReason::RoleNotPermitted(Role::Paziente))
        );
        assert_eq!(
            decide(None, staff),
            AccessDecision::Deny(DenyReason::Unauthenticated)
        );
        for role in Role::ALL {
            assert!(!decide(Some(role), RoleSet::EMPTY).is_allowed());
        }
    }

    #[tokio::test]
    async fn test_identity_without_profile_denied_for_every_role_set() {
        let gate = gate(InMemoryProfileStore::default());
        let ctx = RequestContext::authenticated(identity("u2"), RequestKind::Api);

        for allowed in non_empty_role_sets() {
            let result = gate.require_role(&ctx, allowed).await;
            assert!(
                matches!(
                    result,
                    Err(AppError::AccessDenied(Denial {
                        reason: DenyReason::Unauthenticated,
                        ..
                    }))
                ),
                "{} must deny",
                allowed
            );
        }
    }

    #[tokio::test]
    async fn test_patient_scenario() {
        let gate = gate(InMemoryProfileStore::default().with_profile("u1", Role::Paziente, true));
        let ctx = RequestContext::authenticated(identity("u1"), RequestKind::Navigational);

        let denied = gate.require_role(&ctx, RoleSet::of(&[Role::Admin])).await;
        assert!(matches!(
            denied,
            Err(AppError::AccessDenied(Denial {
                kind: RequestKind::Navigational,
                reason: DenyReason::RoleNotPermitted(Role::Paziente),
            }))
        ));

        let allowed = gate
            .require_role(&ctx, RoleSet::of(&[Role::Paziente]))
            .await
            .unwrap();
        assert_eq!(allowed.role(), Role::Paziente);
        assert_eq!(allowed.identity().id, "u1");
    }

    #[tokio::test]
    async fn test_same_inputs_same_decision() {
        let gate = gate(InMemoryProfileStore::default().with_profile("s1", Role::Segretaria, true));
        let ctx = RequestContext::authenticated(identity("s1"), RequestKind::Api);
        let allowed = RoleSet::of(&[Role::Admin, Role::Segretaria]);

        let first = gate.check(&ctx, allowed).await.unwrap();
        let second = gate.check(&ctx, allowed).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first, AccessDecision::Allow(Role::Segretaria));
    }

    #[tokio::test]
    async fn test_inactive_admin_is_not_admin() {
        let gate = gate(InMemoryProfileStore::default().with_profile("a1", Role::Admin, false));
        let ctx = RequestContext::authenticated(identity("a1"), RequestKind::Api);

        assert!(gate.require_admin(&ctx).await.is_err());
    }

    #[tokio::test]
    async fn test_outage_is_error_not_denial() {
        let gate = gate(InMemoryProfileStore::default().failing());
        let ctx = RequestContext::authenticated(identity("a1"), RequestKind::Api);

        let result = gate.require_role(&ctx, ADMIN_ONLY).await;
        assert!(matches!(result, Err(AppError::TransientResolution(_))));
    }

    #[tokio::test]
    async fn test_admin_grant_carries_identity() {
        let gate = gate(InMemoryProfileStore::default().with_profile("a1", Role::Admin, true));
        let ctx = RequestContext::authenticated(identity("a1"), RequestKind::Api);

        let grant = gate.require_admin(&ctx).await.unwrap();
        assert_eq!(grant.identity().id, "a1");
    }
}
