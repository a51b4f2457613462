mod laboratory_service;

pub use laboratory_service::LaboratoryService;
