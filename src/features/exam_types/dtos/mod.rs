mod exam_type_dto;

pub use exam_type_dto::{ExamTypeInput, ExamTypeResponseDto};
