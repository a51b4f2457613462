//! Laboratories (`laboratori`). Staff read, admin maintains.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::LaboratoryService;
