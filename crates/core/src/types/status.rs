//! Status enums for backend records.
//!
//! The backend spells statuses in `PascalCase`. Enums that the backend has
//! been seen to extend carry an `Other` catch-all so new values don't break
//! deserialization of a whole list.

use serde::{Deserialize, Serialize};

/// Review state of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LeaveStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// Kind of leave being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeaveType {
    Annual,
    Sick,
    #[serde(other)]
    Other,
}

impl LeaveType {
    /// Form-field spelling sent in multipart leave requests.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Annual => "Annual",
            Self::Sick => "Sick",
            Self::Other => "Other",
        }
    }
}

/// Decision an admin can take on a pending leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeaveDecision {
    Approved,
    Rejected,
}

/// Payroll lifecycle: generated as draft, calculated into review,
/// approved in bulk, then paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PayrollStatus {
    #[default]
    Draft,
    Review,
    Approved,
    Paid,
}

/// Attendance outcome for one employee-day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    OnTime,
    Late,
    Sick,
    Permit,
    AnnualLeave,
    Absent,
    #[serde(other)]
    Other,
}

impl AttendanceStatus {
    /// Whether the status is an excused absence rather than a clock-in.
    #[must_use]
    pub const fn is_excused(self) -> bool {
        matches!(self, Self::Sick | Self::Permit | Self::AnnualLeave)
    }
}

/// Direction of a clock event. The backend uses the Indonesian words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClockAction {
    /// Clock in.
    #[serde(rename = "Masuk")]
    In,
    /// Clock out.
    #[serde(rename = "Pulang")]
    Out,
}

impl ClockAction {
    /// Form-field spelling sent in multipart check-in requests.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::In => "Masuk",
            Self::Out => "Pulang",
        }
    }
}

/// Payment state of a subscription transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionStatus {
    Pending,
    Success,
    Paid,
    Failed,
    #[serde(other)]
    Other,
}

impl TransactionStatus {
    /// Whether a superadmin may still verify the payment manually.
    #[must_use]
    pub const fn is_verifiable(self) -> bool {
        matches!(self, Self::Pending | Self::Failed)
    }
}

/// Subscription state recorded in the session at login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    Active,
    Expired,
}

impl SubscriptionStatus {
    /// Storage spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Expired => "EXPIRED",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_action_wire_names() {
        assert_eq!(serde_json::to_string(&ClockAction::In).unwrap(), "\"Masuk\"");
        assert_eq!(ClockAction::Out.as_str(), "Pulang");
    }

    #[test]
    fn test_unknown_attendance_status_is_other() {
        let status: AttendanceStatus = serde_json::from_str("\"WorkFromHome\"").unwrap();
        assert_eq!(status, AttendanceStatus::Other);
        assert!(AttendanceStatus::Sick.is_excused());
        assert!(!AttendanceStatus::Late.is_excused());
    }

    #[test]
    fn test_transaction_verifiable() {
        assert!(TransactionStatus::Pending.is_verifiable());
        assert!(TransactionStatus::Failed.is_verifiable());
        assert!(!TransactionStatus::Paid.is_verifiable());
    }

    #[test]
    fn test_subscription_status_storage_spelling() {
        assert_eq!(
            serde_json::to_string(&SubscriptionStatus::Expired).unwrap(),
            format!("\"{}\"", SubscriptionStatus::Expired.as_str())
        );
    }
}
