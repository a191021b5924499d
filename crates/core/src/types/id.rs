//! Newtype IDs for backend records.
//!
//! The backend hands out numeric primary keys. Wrapping them keeps a leave
//! request ID from being passed where a payroll ID is expected.

/// Define a type-safe ID wrapper around `i64`.
///
/// The generated type is `Copy`, serializes transparently as a JSON number
/// and displays as the bare number, so it can be spliced into URL paths.
///
/// # Example
///
/// ```rust
/// # use hris_core::define_id;
/// define_id!(ShiftId);
/// define_id!(BadgeId);
///
/// let shift = ShiftId::new(7);
/// assert_eq!(format!("/shifts/{shift}"), "/shifts/7");
///
/// // Different types, so this won't compile:
/// // let _: BadgeId = shift;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw backend ID.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// The raw backend ID.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(UserId);
define_id!(CompanyId);
define_id!(NotificationId);
define_id!(AttendanceId);
define_id!(LeaveId);
define_id!(PayrollId);
define_id!(PositionId);
define_id!(PlanId);
define_id!(TransactionId);
define_id!(AuditLogId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_is_transparent_in_json() {
        let id: LeaveId = serde_json::from_str("42").unwrap();
        assert_eq!(id, LeaveId::new(42));
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
    }

    #[test]
    fn test_id_display_is_bare_number() {
        assert_eq!(PayrollId::new(9).to_string(), "9");
    }
}
