//! Header search box: keyword to route.

use hris_core::Role;

use super::routes;

type Rule = (&'static [&'static str], &'static str);

const ADMIN_RULES: &[Rule] = &[
    (&["user", "karyawan", "pegawai", "employee"], routes::ADMIN_USERS),
    (&["absen", "attendance", "recap", "hadir"], routes::ADMIN_ATTENDANCES),
    (&["cuti", "leave", "izin"], routes::ADMIN_LEAVES),
    (&["gaji", "payroll", "slip"], routes::ADMIN_PAYROLL),
    (&["bill", "langganan", "paket", "subs"], routes::ADMIN_SUBSCRIPTION),
    (&["dash"], routes::ADMIN_HOME),
];

const EMPLOYEE_RULES: &[Rule] = &[
    (&["absen", "clock", "hadir"], routes::EMPLOYEE_ATTENDANCE),
    (&["gaji", "payroll", "slip"], routes::EMPLOYEE_PAYROLL),
    (&["dash", "utama"], routes::EMPLOYEE_HOME),
];

const SUPERADMIN_RULES: &[Rule] = &[
    (&["subs", "langganan", "paket"], routes::SUPERADMIN_SUBSCRIPTIONS),
    (&["log", "audit", "sistem"], routes::SUPERADMIN_LOGS),
];

/// Route for a free-text query, or `None` to stay on the current page.
///
/// Rules are tried in order and the first keyword contained in the query
/// wins. Superadmin queries that match nothing go to the superadmin home.
#[must_use]
pub fn search_route(role: Role, query: &str) -> Option<&'static str> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return None;
    }

    let rules = match role {
        Role::Admin => ADMIN_RULES,
        Role::Employee => EMPLOYEE_RULES,
        Role::SuperAdmin => SUPERADMIN_RULES,
    };

    let matched = rules
        .iter()
        .find(|(words, _)| words.iter().any(|w| query.contains(w)))
        .map(|(_, route)| *route);

    match role {
        Role::SuperAdmin => Some(matched.unwrap_or(routes::SUPERADMIN_HOME)),
        Role::Admin | Role::Employee => matched,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_keywords() {
        assert_eq!(search_route(Role::Admin, "Cuti bulan ini"), Some(routes::ADMIN_LEAVES));
        assert_eq!(search_route(Role::Admin, "leave"), Some(routes::ADMIN_LEAVES));
        assert_eq!(search_route(Role::Admin, "data karyawan"), Some(routes::ADMIN_USERS));
        assert_eq!(search_route(Role::Admin, "slip gaji"), Some(routes::ADMIN_PAYROLL));
        assert_eq!(search_route(Role::Admin, "paket"), Some(routes::ADMIN_SUBSCRIPTION));
    }

    #[test]
    fn test_first_rule_wins() {
        // "employee" is listed before "attendance".
        assert_eq!(
            search_route(Role::Admin, "employee attendance"),
            Some(routes::ADMIN_USERS)
        );
    }

    #[test]
    fn test_no_match_stays_put() {
        assert_eq!(search_route(Role::Admin, "weather"), None);
        assert_eq!(search_route(Role::Employee, "leave"), None);
        assert_eq!(search_route(Role::Employee, "   "), None);
    }

    #[test]
    fn test_superadmin_falls_back_to_home() {
        assert_eq!(
            search_route(Role::SuperAdmin, "audit trail"),
            Some(routes::SUPERADMIN_LOGS)
        );
        assert_eq!(search_route(Role::SuperAdmin, "anything"), Some(routes::SUPERADMIN_HOME));
        assert_eq!(search_route(Role::SuperAdmin, ""), None);
    }
}
