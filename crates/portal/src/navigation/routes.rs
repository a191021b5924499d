//! Route table.

use hris_core::Role;

pub const LOGIN: &str = "/Auth/login";
pub const REGISTER: &str = "/Auth/register";
pub const FORGOT_PASSWORD: &str = "/Auth/forgot";
/// Shown after a reset link is sent; offers to resend it.
pub const CHECK_EMAIL: &str = "/Auth/check-email";
pub const DASHBOARD: &str = "/dashboard";
pub const PROFILE: &str = "/dashboard/profile";

pub const SUPERADMIN_HOME: &str = "/dashboard/superadmin";
pub const SUPERADMIN_SUBSCRIPTIONS: &str = "/dashboard/superadmin/subscriptions";
pub const SUPERADMIN_LOGS: &str = "/dashboard/superadmin/logs";

pub const ADMIN_HOME: &str = "/dashboard/admin";
pub const ADMIN_USERS: &str = "/dashboard/admin/users";
pub const ADMIN_ATTENDANCES: &str = "/dashboard/admin/attendances";
pub const ADMIN_LEAVES: &str = "/dashboard/admin/leaves";
pub const ADMIN_PAYROLL: &str = "/dashboard/admin/payroll";
pub const ADMIN_SUBSCRIPTION: &str = "/dashboard/admin/subscription";

pub const EMPLOYEE_HOME: &str = "/dashboard/employee";
pub const EMPLOYEE_ATTENDANCE: &str = "/dashboard/employee/attendance";
pub const EMPLOYEE_PAYROLL: &str = "/dashboard/employee/payroll";

/// Route a role lands on after login.
#[must_use]
pub const fn landing_route(role: Role) -> &'static str {
    match role {
        Role::SuperAdmin => SUPERADMIN_HOME,
        Role::Admin => ADMIN_HOME,
        Role::Employee => EMPLOYEE_HOME,
    }
}

/// Where `/dashboard` sends a visitor. Unrecognised roles get the employee
/// dashboard.
#[must_use]
pub const fn dashboard_redirect(role: Option<Role>) -> &'static str {
    match role {
        Some(role) => landing_route(role),
        None => EMPLOYEE_HOME,
    }
}
