//! Profiles (`profili`): operators screen for admins, patient list for
//! staff. Profiles are created and removed with the owning account, never
//! here.

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use services::ProfileService;
