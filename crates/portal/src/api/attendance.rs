//! `/attendance` endpoints.

use chrono::{DateTime, NaiveDate, Utc};
use hris_core::{AttendanceId, AttendanceStatus, ClockAction};
use reqwest::Method;
use reqwest::multipart::Form;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{ApiClient, Upload, UserRef, message};
use crate::error::PortalError;

/// One employee-day as seen by an admin.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: AttendanceId,
    pub status: AttendanceStatus,
    #[serde(default)]
    pub clock_in: Option<DateTime<Utc>>,
    #[serde(default)]
    pub clock_out: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user: Option<UserRef>,
    /// Locked once payroll for the period has been generated.
    #[serde(default, rename = "is_payroll_processed")]
    pub payroll_processed: bool,
}

/// One row of the employee's own history, pre-formatted by the backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: AttendanceId,
    #[serde(default)]
    pub raw_date: Option<String>,
    #[serde(default)]
    pub date_display: Option<String>,
    #[serde(default)]
    pub clock_in: Option<String>,
    #[serde(default)]
    pub clock_out: Option<String>,
    pub status: String,
    #[serde(default)]
    pub work_hours_display: Option<String>,
}

/// Today's clock events for the signed-in employee.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayAttendance {
    #[serde(default)]
    pub clock_in: Option<DateTime<Utc>>,
    #[serde(default)]
    pub clock_out: Option<DateTime<Utc>>,
}

impl TodayAttendance {
    /// The action the check-clock form should offer next, or `None` when
    /// the day is complete.
    #[must_use]
    pub const fn next_action(&self) -> Option<ClockAction> {
        match (self.clock_in, self.clock_out) {
            (None, _) => Some(ClockAction::In),
            (Some(_), None) => Some(ClockAction::Out),
            (Some(_), Some(_)) => None,
        }
    }
}

/// Admin override of a day's status.
#[derive(Debug, Clone, Serialize)]
pub struct ManualCorrection {
    pub status: AttendanceStatus,
    pub reason: String,
}

/// A geotagged clock event with a selfie.
#[derive(Debug, Clone)]
pub struct CheckIn {
    pub action: ClockAction,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub device_name: String,
    pub photo: Upload,
}

impl ApiClient {
    /// All attendance for the company on `date`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn attendance_on(&self, date: NaiveDate) -> Result<Vec<AttendanceRecord>, PortalError> {
        self.get_query(
            "/attendance/all",
            &[("date", date.format("%Y-%m-%d").to_string())],
        )
        .await
    }

    /// The signed-in employee's history.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn my_attendance(&self) -> Result<Vec<HistoryEntry>, PortalError> {
        self.get("/attendance/my-history").await
    }

    /// Today's clock events. A day with no record yet reads as empty.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn today_attendance(&self) -> Result<TodayAttendance, PortalError> {
        let today: Option<TodayAttendance> = self.get("/attendance/today").await?;
        Ok(today.unwrap_or_default())
    }

    /// Override a day's status. A reason is mandatory.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank reason, or an API error.
    #[instrument(skip(self, correction), fields(attendance_id = %id))]
    pub async fn correct_attendance(
        &self,
        id: AttendanceId,
        correction: &ManualCorrection,
    ) -> Result<Option<String>, PortalError> {
        if correction.reason.trim().is_empty() {
            return Err(PortalError::validation("A reason for the correction is required."));
        }
        let path = format!("/attendance/manual/{id}");
        Ok(message(
            &self.send_json(Method::PATCH, &path, correction).await?,
        ))
    }

    /// Record a clock-in or clock-out.
    ///
    /// # Errors
    ///
    /// Returns error if the backend rejects the location or the request fails.
    #[instrument(skip(self, check), fields(action = check.action.as_str()))]
    pub async fn check_clock(&self, check: CheckIn) -> Result<Option<String>, PortalError> {
        let form = Form::new()
            .text("tipeAbsensi", check.action.as_str())
            .text("latitude", check.latitude.to_string())
            .text("longitude", check.longitude.to_string())
            .text("addressDetail", check.address)
            .text("deviceName", check.device_name)
            .part("attendance_photo", check.photo.into_part()?);
        Ok(message(
            &self
                .send_multipart(Method::POST, "/attendance/check", form)
                .await?,
        ))
    }
}
