//! Clinical reports (`referti`). Staff publish and withdraw, patients read
//! their own.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::ReportService;
