pub mod portal_handler;

pub use portal_handler::{
    __path_debug_session, __path_root, __path_session_landing, __path_unauthorized,
    debug_session, root, session_landing, unauthorized, PortalState,
};
