//! Role-based landing decisions.
//!
//! The root entry point and the denial page treat an unresolved role
//! differently: root sends it to login, the denial page renders in place.
//! Resolved roles always leave the denial page for their own landing, so
//! the page can never redirect to itself.

use super::model::Role;
use crate::shared::constants::{
    ADMIN_LANDING_PATH, LOGIN_PATH, PATIENT_LANDING_PATH, STAFF_LANDING_PATH,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    AdminOverview,
    StaffPatientList,
    PatientReports,
    Login,
}

impl Destination {
    pub fn path(&self) -> &'static str {
        match self {
            Destination::AdminOverview => ADMIN_LANDING_PATH,
            Destination::StaffPatientList => STAFF_LANDING_PATH,
            Destination::PatientReports => PATIENT_LANDING_PATH,
            Destination::Login => LOGIN_PATH,
        }
    }
}

pub fn landing_for(role: Option<Role>) -> Destination {
    match role {
        Some(Role::Admin) => Destination::AdminOverview,
        Some(Role::Segretaria) => Destination::StaffPatientList,
        Some(Role::Paziente) => Destination::PatientReports,
        None => Destination::Login,
    }
}

/// What the root entry point does.
pub fn root_entry(role: Option<Role>) -> Destination {
    landing_for(role)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialPageOutcome {
    Redirect(Destination),
    RenderDenial,
}

/// What the denial page does.
pub fn denial_page(role: Option<Role>) -> DenialPageOutcome {
    match role {
        Some(role) => DenialPageOutcome::Redirect(landing_for(Some(role))),
        None => DenialPageOutcome::RenderDenial,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::constants::UNAUTHORIZED_PATH;

    #[test]
    fn test_landing_table() {
        assert_eq!(landing_for(Some(Role::Admin)).path(), "/admin");
        assert_eq!(landing_for(Some(Role::Segretaria)).path(), "/segreteria/pazienti");
        assert_eq!(landing_for(Some(Role::Paziente)).path(), "/paziente/referti");
        assert_eq!(landing_for(None).path(), "/login");
    }

    #[test]
    fn test_root_sends_unresolved_to_login() {
        assert_eq!(root_entry(None), Destination::Login);
    }

    #[test]
    fn test_denial_page_never_loops() {
        assert_eq!(
            denial_page(Some(Role::Admin)),
            DenialPageOutcome::Redirect(Destination::AdminOverview)
        );
        assert_eq!(denial_page(None), DenialPageOutcome::RenderDenial);

        for role in Role::ALL {
            match denial_page(Some(role)) {
                DenialPageOutcome::Redirect(dest) => {
                    assert_ne!(dest.path(), UNAUTHORIZED_PATH);
                    assert_ne!(dest, Destination::Login);
                }
                DenialPageOutcome::RenderDenial => panic!("{} must be redirected", role),
            }
        }
    }
}
