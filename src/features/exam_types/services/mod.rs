mod exam_type_service;

pub use exam_type_service::ExamTypeService;
