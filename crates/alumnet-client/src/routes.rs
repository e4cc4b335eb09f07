//! Post-authentication routing targets.

use alumnet_core::models::role::Role;
use alumnet_core::models::user::AccountStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    StudentDashboard,
    AlumniDashboard,
    InstitutionDashboard,
    /// Restricted waiting view for alumni awaiting approval.
    PendingApproval,
}

impl Route {
    /// Where a freshly authenticated session lands. Pending alumni go
    /// to the waiting page, never the dashboard.
    pub fn for_session(role: Role, status: AccountStatus) -> Route {
        match (role, status) {
            (Role::Alumni, AccountStatus::Pending) => Route::PendingApproval,
            (Role::Student, _) => Route::StudentDashboard,
            (Role::Alumni, _) => Route::AlumniDashboard,
            (Role::Institution, _) => Route::InstitutionDashboard,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::StudentDashboard => "/studentpart/dashboard",
            Route::AlumniDashboard => "/alumnipart/dashboard",
            Route::InstitutionDashboard => "/institutionpart/dashboard",
            Route::PendingApproval => "/pending-approval",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_alumni_route_to_the_waiting_page() {
        assert_eq!(
            Route::for_session(Role::Alumni, AccountStatus::Pending),
            Route::PendingApproval
        );
    }

    #[test]
    fn verified_sessions_route_to_their_dashboard() {
        assert_eq!(
            Route::for_session(Role::Student, AccountStatus::Verified),
            Route::StudentDashboard
        );
        assert_eq!(
            Route::for_session(Role::Alumni, AccountStatus::Verified),
            Route::AlumniDashboard
        );
        assert_eq!(
            Route::for_session(Role::Institution, AccountStatus::Verified),
            Route::InstitutionDashboard
        );
    }
}
