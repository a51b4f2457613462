//! Resource access enforcement.
//!
//! Every protected operation is checked twice: by the access gate against
//! [`policy::allowed_roles`], and by Postgres row-level policies that
//! mirror the same table. Either check alone is enough to deny.

pub mod enforcer;
pub mod policy;
pub mod storage;

pub use enforcer::{mutation_response, ResourceEnforcer};
pub use policy::{Operation, Resource};
pub use storage::{begin_read, Mutation, MutationOutcome, PgProtectedStorage};
