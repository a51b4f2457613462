pub mod profile_handler;

pub use profile_handler::{
    __path_get_operator, __path_list_operators, __path_list_patients, __path_update_operator,
    get_operator, list_operators, list_patients, update_operator, ProfileState,
};
