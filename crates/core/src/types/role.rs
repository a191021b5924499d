//! User roles.
//!
//! Every account belongs to exactly one role. The role decides the landing
//! route, the sidebar menu and which parts of the header are shown.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A stored role string that does not name any known role.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown role: {0:?}")]
pub struct UnknownRole(pub String);

/// Account role, from least to most privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular employee of a tenant company.
    Employee,
    /// HR administrator of a tenant company.
    Admin,
    /// Platform operator managing all tenants.
    #[serde(rename = "superadmin")]
    SuperAdmin,
}

impl Role {
    /// All roles, in menu order of the dashboard switcher.
    pub const ALL: [Self; 3] = [Self::Employee, Self::Admin, Self::SuperAdmin];

    /// The wire/storage spelling of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Admin => "admin",
            Self::SuperAdmin => "superadmin",
        }
    }

    /// Whether this role sees the notification bell in the header.
    #[must_use]
    pub const fn has_notifications(self) -> bool {
        !matches!(self, Self::SuperAdmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = UnknownRole;

    /// Parse a stored role. Surrounding whitespace and case are ignored,
    /// since older sessions were written with inconsistent casing.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "employee" => Ok(Self::Employee),
            "admin" => Ok(Self::Admin),
            "superadmin" => Ok(Self::SuperAdmin),
            _ => Err(UnknownRole(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_and_whitespace_insensitive() {
        assert_eq!(" Admin ".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("SUPERADMIN".parse::<Role>().unwrap(), Role::SuperAdmin);
        assert_eq!("employee".parse::<Role>().unwrap(), Role::Employee);
    }

    #[test]
    fn test_parse_unknown_role() {
        let err = "super_admin".parse::<Role>().unwrap_err();
        assert_eq!(err, UnknownRole("super_admin".to_string()));
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn test_display_matches_wire_format() {
        for role in Role::ALL {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{role}\""));
        }
    }

    #[test]
    fn test_superadmin_has_no_notifications() {
        assert!(Role::Employee.has_notifications());
        assert!(Role::Admin.has_notifications());
        assert!(!Role::SuperAdmin.has_notifications());
    }
}
