mod exam_type;

pub use exam_type::ExamType;
