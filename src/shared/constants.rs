/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// NAVIGATION
// =============================================================================

/// Fixed destination for navigational access denials
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

/// Identity provider sign-in entry point
pub const LOGIN_PATH: &str = "/login";

pub const ADMIN_LANDING_PATH: &str = "/admin";

pub const STAFF_LANDING_PATH: &str = "/segreteria/pazienti";

pub const PATIENT_LANDING_PATH: &str = "/paziente/referti";

// List pages navigational callers return to after a successful mutation
pub const LABORATORIES_PAGE_PATH: &str = "/admin/laboratori";
pub const EXAM_TYPES_PAGE_PATH: &str = "/admin/tipi-esame";
pub const OPERATORS_PAGE_PATH: &str = "/admin/operatori";
pub const REPORTS_PAGE_PATH: &str = "/segreteria/referti";

// =============================================================================
// DATABASE SESSION
// =============================================================================

/// Postgres role every guarded statement runs as. Row policies target it.
pub const DB_POLICY_ROLE: &str = "portal_user";

/// Session setting `app_current_role()` reads the caller's id from
pub const DB_CURRENT_USER_SETTING: &str = "app.current_user_id";
