pub mod access;
pub mod auth;
pub mod exam_types;
pub mod laboratories;
pub mod logto;
pub mod portal;
pub mod profiles;
pub mod reports;
