pub mod exam_type_handler;

pub use exam_type_handler::{
    __path_create_exam_type, __path_delete_exam_type, __path_list_exam_types,
    __path_update_exam_type, create_exam_type, delete_exam_type, list_exam_types,
    update_exam_type, ExamTypeState,
};
