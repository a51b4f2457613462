//! Session, role resolution and the access gate.
//!
//! Per request: [`session::SessionAccessor`] (run by the session
//! middleware) produces a [`model::RequestContext`], the
//! [`resolver::RoleResolver`] maps its identity to a role and the
//! [`gate::AccessGate`] decides. [`router`] picks landing pages from the
//! same resolved role.

mod jwks;
mod validator;

pub mod gate;
pub mod guards;
pub mod model;
pub mod resolver;
pub mod router;
pub mod session;

pub use jwks::JwksClient;
pub use validator::JwtValidator;
