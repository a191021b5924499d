//! Role-specific sidebar menus.

use hris_core::Role;
use tracing::warn;

use super::routes;

/// Billing badge appears at or below this many days left.
pub const BILLING_WARNING_DAYS: i64 = 7;
/// Billing badge turns critical at or below this many days left.
pub const BILLING_CRITICAL_DAYS: i64 = 3;

/// Icon shown for a menu item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Grid,
    Activity,
    Shield,
    Users,
    Clock,
    Briefcase,
    Dollar,
    CreditCard,
}

/// One sidebar entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub key: &'static str,
    pub icon: Icon,
    pub label: &'static str,
    pub route: &'static str,
    /// Numeric badge. `None` when hidden or zero.
    pub count: Option<u32>,
    /// Dot badge.
    pub badge: bool,
    /// Draws attention even when the item is not active.
    pub critical: bool,
}

impl MenuItem {
    const fn plain(key: &'static str, icon: Icon, label: &'static str, route: &'static str) -> Self {
        Self {
            key,
            icon,
            label,
            route,
            count: None,
            badge: false,
            critical: false,
        }
    }

    /// Whether this item is highlighted for `path`.
    ///
    /// The role's home route only matches exactly; every other route also
    /// matches its sub-pages.
    #[must_use]
    pub fn is_active(&self, role: Role, path: &str) -> bool {
        if self.route == routes::landing_route(role) {
            path == self.route
        } else {
            path.starts_with(self.route)
        }
    }

    /// Text for the numeric badge.
    #[must_use]
    pub fn count_label(&self) -> Option<String> {
        self.count.map(count_label)
    }
}

/// Render a badge count, capping the display at `9+`.
#[must_use]
pub fn count_label(count: u32) -> String {
    if count > 9 {
        "9+".to_string()
    } else {
        count.to_string()
    }
}

/// Inputs for the badges on the menu.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BadgeState {
    /// Pending leave requests reported by the last poll.
    pub pending_leaves: u32,
    /// Whether the pending-leave count is currently shown.
    pub show_leave_count: bool,
    /// Days until the subscription ends, if known.
    pub days_left: Option<i64>,
    /// Employee payslip notification.
    pub show_payslip_badge: bool,
}

impl BadgeState {
    #[must_use]
    pub fn billing_badge(&self) -> bool {
        self.days_left.is_some_and(|d| d <= BILLING_WARNING_DAYS)
    }

    #[must_use]
    pub fn billing_critical(&self) -> bool {
        self.days_left.is_some_and(|d| d <= BILLING_CRITICAL_DAYS)
    }

    fn leave_count(&self) -> Option<u32> {
        (self.show_leave_count && self.pending_leaves > 0).then_some(self.pending_leaves)
    }
}

/// The fixed, ordered menu for a role.
#[must_use]
pub fn menu_for(role: Role, badges: &BadgeState) -> Vec<MenuItem> {
    match role {
        Role::SuperAdmin => vec![
            MenuItem::plain("stats", Icon::Grid, "Global Stats", routes::SUPERADMIN_HOME),
            MenuItem::plain(
                "subs",
                Icon::Activity,
                "Subscriptions",
                routes::SUPERADMIN_SUBSCRIPTIONS,
            ),
            MenuItem::plain("logs", Icon::Shield, "System Logs", routes::SUPERADMIN_LOGS),
        ],
        Role::Admin => vec![
            MenuItem::plain("dash", Icon::Grid, "Dashboard", routes::ADMIN_HOME),
            MenuItem::plain("users", Icon::Users, "Employees", routes::ADMIN_USERS),
            MenuItem::plain(
                "att",
                Icon::Clock,
                "Attendance Recap",
                routes::ADMIN_ATTENDANCES,
            ),
            MenuItem {
                count: badges.leave_count(),
                ..MenuItem::plain("leave", Icon::Briefcase, "Leave Requests", routes::ADMIN_LEAVES)
            },
            MenuItem::plain("pay", Icon::Dollar, "Payroll", routes::ADMIN_PAYROLL),
            MenuItem {
                badge: badges.billing_badge(),
                critical: badges.billing_critical(),
                ..MenuItem::plain(
                    "billing",
                    Icon::CreditCard,
                    "Billing & Plan",
                    routes::ADMIN_SUBSCRIPTION,
                )
            },
        ],
        Role::Employee => vec![
            MenuItem::plain("dash", Icon::Grid, "My Dashboard", routes::EMPLOYEE_HOME),
            MenuItem::plain(
                "att",
                Icon::Clock,
                "Clock In/Out",
                routes::EMPLOYEE_ATTENDANCE,
            ),
            MenuItem {
                badge: badges.show_payslip_badge,
                ..MenuItem::plain("pay", Icon::Dollar, "My Payslip", routes::EMPLOYEE_PAYROLL)
            },
        ],
    }
}

/// Menu for a role string as found in storage. Unrecognised roles get no
/// menu at all.
#[must_use]
pub fn menu_for_stored(stored: &str, badges: &BadgeState) -> Vec<MenuItem> {
    match stored.parse::<Role>() {
        Ok(role) => menu_for(role, badges),
        Err(e) => {
            warn!(error = %e, "Rendering empty menu");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(items: &[MenuItem]) -> Vec<&'static str> {
        items.iter().map(|i| i.key).collect()
    }

    #[test]
    fn test_fixed_menus() {
        let badges = BadgeState::default();
        assert_eq!(keys(&menu_for(Role::SuperAdmin, &badges)), ["stats", "subs", "logs"]);
        assert_eq!(
            keys(&menu_for(Role::Admin, &badges)),
            ["dash", "users", "att", "leave", "pay", "billing"]
        );
        assert_eq!(keys(&menu_for(Role::Employee, &badges)), ["dash", "att", "pay"]);
    }

    #[test]
    fn test_stored_role_is_normalised() {
        let badges = BadgeState::default();
        assert_eq!(menu_for_stored(" ADMIN ", &badges).len(), 6);
        assert!(menu_for_stored("manager", &badges).is_empty());
        assert!(menu_for_stored("", &badges).is_empty());
    }

    #[test]
    fn test_leave_count_hidden_until_shown() {
        let mut badges = BadgeState {
            pending_leaves: 4,
            ..BadgeState::default()
        };
        let leave = |b: &BadgeState| menu_for(Role::Admin, b)[3].count;
        assert_eq!(leave(&badges), None);
        badges.show_leave_count = true;
        assert_eq!(leave(&badges), Some(4));
        badges.pending_leaves = 0;
        assert_eq!(leave(&badges), None);
    }

    #[test]
    fn test_billing_thresholds() {
        let billing = |days| {
            let items = menu_for(
                Role::Admin,
                &BadgeState {
                    days_left: days,
                    ..BadgeState::default()
                },
            );
            (items[5].badge, items[5].critical)
        };
        assert_eq!(billing(None), (false, false));
        assert_eq!(billing(Some(30)), (false, false));
        assert_eq!(billing(Some(7)), (true, false));
        assert_eq!(billing(Some(3)), (true, true));
        assert_eq!(billing(Some(-2)), (true, true));
    }

    #[test]
    fn test_count_label() {
        assert_eq!(count_label(3), "3");
        assert_eq!(count_label(9), "9");
        assert_eq!(count_label(10), "9+");
    }

    #[test]
    fn test_active_matching() {
        let items = menu_for(Role::Admin, &BadgeState::default());
        let dash = &items[0];
        let leave = &items[3];

        assert!(dash.is_active(Role::Admin, "/dashboard/admin"));
        assert!(!dash.is_active(Role::Admin, "/dashboard/admin/leaves"));
        assert!(leave.is_active(Role::Admin, "/dashboard/admin/leaves/12"));
    }
}
