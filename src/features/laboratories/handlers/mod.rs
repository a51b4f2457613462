pub mod laboratory_handler;

pub use laboratory_handler::{
    __path_create_laboratory, __path_delete_laboratory, __path_list_laboratories,
    __path_update_laboratory, create_laboratory, delete_laboratory, list_laboratories,
    update_laboratory, LaboratoryState,
};
