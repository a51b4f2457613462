//! Navigation entry points: root redirect, denial page, landing lookup and
//! the opt-in session debug surface.

pub mod dtos;
pub mod handlers;
pub mod routes;
