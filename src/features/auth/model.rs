use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;

/// Authenticated caller as vouched for by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Identity {
    /// Stable provider subject (`sub`)
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Application role stored on the profile row. Closed set; roles are
/// disjoint capability sets, there is no implied ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "ruolo_utente", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Segretaria,
    Paziente,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Segretaria, Role::Paziente];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Segretaria => "segretaria",
            Role::Paziente => "paziente",
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Role::Admin => 1 << 0,
            Role::Segretaria => 1 << 1,
            Role::Paziente => 1 << 2,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "segretaria" => Ok(Role::Segretaria),
            "paziente" => Ok(Role::Paziente),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// Set of roles allowed to perform an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoleSet(u8);

impl RoleSet {
    pub const EMPTY: RoleSet = RoleSet(0);

    pub const fn of(roles: &[Role]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < roles.len() {
            bits |= roles[i].bit();
            i += 1;
        }
        RoleSet(bits)
    }

    pub const fn contains(&self, role: Role) -> bool {
        self.0 & role.bit() != 0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        Role::ALL.into_iter().filter(|r| self.contains(*r))
    }
}

impl std::fmt::Display for RoleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.iter().map(|r| r.as_str()).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}

/// Profile row keyed by identity id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Profile {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub active: bool,
}

/// How the caller expects to be answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Browser navigation; denials redirect.
    Navigational,
    /// Programmatic caller; denials are status codes.
    Api,
}

impl RequestKind {
    pub fn classify(path: &str, accept: Option<&str>) -> Self {
        if !path.starts_with("/api/") {
            return RequestKind::Navigational;
        }

        match accept {
            Some(accept) if accept.contains("text/html") => RequestKind::Navigational,
            _ => RequestKind::Api,
        }
    }
}

/// Per-request session state, built once by the session middleware and
/// passed explicitly into the resolver and the gate.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub identity: Option<Identity>,
    pub kind: RequestKind,
}

impl RequestContext {
    pub fn anonymous(kind: RequestKind) -> Self {
        Self {
            identity: None,
            kind,
        }
    }

    pub fn authenticated(identity: Identity, kind: RequestKind) -> Self {
        Self {
            identity: Some(identity),
            kind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No role could be resolved (no identity, no profile, inactive profile)
    Unauthenticated,
    RoleNotPermitted(Role),
}

impl std::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DenyReason::Unauthenticated => f.write_str("no resolved role"),
            DenyReason::RoleNotPermitted(role) => write!(f, "role '{}' not permitted", role),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow(Role),
    Deny(DenyReason),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow(_))
    }
}

/// A denial together with the shape of the request that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Denial {
    pub kind: RequestKind,
    pub reason: DenyReason,
}

impl std::fmt::Display for Denial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_set_membership() {
        let staff = RoleSet::of(&[Role::Admin, Role::Segretaria]);
        assert!(staff.contains(Role::Admin));
        assert!(staff.contains(Role::Segretaria));
        assert!(!staff.contains(Role::Paziente));
        assert!(RoleSet::EMPTY.is_empty());
        assert_eq!(staff.to_string(), "{admin, segretaria}");
    }

    #[test]
    fn test_request_kind_classification() {
        assert_eq!(RequestKind::classify("/", None), RequestKind::Navigational);
        assert_eq!(
            RequestKind::classify("/unauthorized", Some("application/json")),
            RequestKind::Navigational
        );
        assert_eq!(RequestKind::classify("/api/laboratori", None), RequestKind::Api);
        assert_eq!(
            RequestKind::classify("/api/laboratori/1/delete", Some("text/html,application/xhtml+xml")),
            RequestKind::Navigational
        );
    }
}
