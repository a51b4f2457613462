//! Allowed roles per protected resource and operation.
//!
//! This table is one half of a pair. The other half is the row-level
//! policy set in `migrations/20260101000100_row_security.sql`. Both must
//! list the same roles for the same (table, command); the test below reads
//! the migration and fails when they drift.

use serde::Serialize;
use utoipa::ToSchema;

use crate::features::auth::model::{Role, RoleSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Laboratory,
    ExamType,
    Profile,
    Report,
}

impl Resource {
    pub const ALL: [Resource; 4] = [
        Resource::Laboratory,
        Resource::ExamType,
        Resource::Profile,
        Resource::Report,
    ];

    pub fn table(&self) -> &'static str {
        match self {
            Resource::Laboratory => "laboratori",
            Resource::ExamType => "tipi_esame",
            Resource::Profile => "profili",
            Resource::Report => "referti",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Read,
    Insert,
    Update,
    Delete,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Read,
        Operation::Insert,
        Operation::Update,
        Operation::Delete,
    ];

    pub fn sql_command(&self) -> &'static str {
        match self {
            Operation::Read => "SELECT",
            Operation::Insert => "INSERT",
            Operation::Update => "UPDATE",
            Operation::Delete => "DELETE",
        }
    }
}

const STAFF: RoleSet = RoleSet::of(&[Role::Admin, Role::Segretaria]);
const ADMIN: RoleSet = RoleSet::of(&[Role::Admin]);
const EVERYONE: RoleSet = RoleSet::of(&[Role::Admin, Role::Segretaria, Role::Paziente]);

/// Roles the access gate lets through. An empty set means the operation is
/// never performed through this service.
pub fn allowed_roles(resource: Resource, operation: Operation) -> RoleSet {
    use Operation::*;

    match (resource, operation) {
        (Resource::Laboratory, Read) => STAFF,
        (Resource::Laboratory, Insert | Update | Delete) => ADMIN,

        (Resource::ExamType, Read) => STAFF,
        (Resource::ExamType, Insert | Update | Delete) => ADMIN,

        // Profiles are provisioned and removed with the owning account
        (Resource::Profile, Read) => STAFF,
        (Resource::Profile, Update) => ADMIN,
        (Resource::Profile, Insert | Delete) => RoleSet::EMPTY,

        // Patients see their own reports; the row policy narrows it
        (Resource::Report, Read) => EVERYONE,
        (Resource::Report, Insert | Delete) => STAFF,
        (Resource::Report, Update) => RoleSet::EMPTY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazy_static::lazy_static;
    use regex::Regex;
    use std::collections::HashMap;

    const ROW_SECURITY_SQL: &str =
        include_str!("../../../migrations/20260101000100_row_security.sql");

    lazy_static! {
        static ref POLICY_HEADER: Regex = Regex::new(
            r"CREATE POLICY\s+(\w+)\s+ON\s+(\w+)\s+FOR\s+(SELECT|INSERT|UPDATE|DELETE)\s+TO\s+portal_user"
        )
        .unwrap();
        static ref ROLE_LIST: Regex = Regex::new(r"app_current_role\(\)\s+IN\s+\(([^)]*)\)").unwrap();
    }

    fn parse_roles(list: &str) -> RoleSet {
        let roles: Vec<Role> = list
            .split(',')
            .map(|r| r.trim().trim_matches('\'').parse::<Role>().unwrap())
            .collect();
        RoleSet::of(&roles)
    }

    /// (table, command) -> roles, as declared in SQL
    fn sql_policies() -> HashMap<(String, String), RoleSet> {
        let mut policies = HashMap::new();

        for statement in ROW_SECURITY_SQL.split(';') {
            let Some(header) = POLICY_HEADER.captures(statement) else {
                continue;
            };
            let name = header[1].to_string();
            let table = header[2].to_string();
            let command = header[3].to_string();

            let lists: Vec<RoleSet> = ROLE_LIST
                .captures_iter(statement)
                .map(|c| parse_roles(&c[1]))
                .collect();
            assert!(!lists.is_empty(), "policy {} has no role list", name);
            assert!(
                lists.windows(2).all(|w| w[0] == w[1]),
                "policy {} uses different role lists in USING and WITH CHECK",
                name
            );

            let previous = policies.insert((table, command), lists[0]);
            assert!(previous.is_none(), "duplicate policy for {}", name);
        }

        policies
    }

    #[test]
    fn test_gate_table_and_row_policies_agree() {
        let mut sql = sql_policies();

        for resource in Resource::ALL {
            for operation in Operation::ALL {
                let key = (
                    resource.table().to_string(),
                    operation.sql_command().to_string(),
                );
                let gate = allowed_roles(resource, operation);

                match sql.remove(&key) {
                    Some(storage) => assert_eq!(
                        gate, storage,
                        "{:?}/{:?}: gate allows {} but row policy allows {}",
                        resource, operation, gate, storage
                    ),
                    None => assert!(
                        gate.is_empty(),
                        "{:?}/{:?}: gate allows {} but no row policy exists",
                        resource,
                        operation,
                        gate
                    ),
                }
            }
        }

        assert!(sql.is_empty(), "row policies with no gate entry: {:?}", sql.keys());
    }

    #[test]
    fn test_admin_covers_staff_maintenance() {
        for resource in [Resource::Laboratory, Resource::ExamType, Resource::Profile] {
            let read = allowed_roles(resource, Operation::Read);
            assert!(read.contains(Role::Admin) && read.contains(Role::Segretaria));
            assert!(!read.contains(Role::Paziente));
        }
    }

    #[test]
    fn test_profiles_are_never_created_or_deleted_here() {
        assert!(allowed_roles(Resource::Profile, Operation::Insert).is_empty());
        assert!(allowed_roles(Resource::Profile, Operation::Delete).is_empty());
    }
}
