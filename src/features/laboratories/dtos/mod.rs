mod laboratory_dto;

pub use laboratory_dto::{LaboratoryInput, LaboratoryResponseDto};
