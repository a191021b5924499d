//! `/leaves` endpoints.

use chrono::NaiveDate;
use hris_core::{LeaveDecision, LeaveId, LeaveStatus, LeaveType};
use reqwest::Method;
use reqwest::multipart::Form;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{ApiClient, Upload, UserRef, message};
use crate::error::PortalError;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    pub id: LeaveId,
    #[serde(rename = "type")]
    pub leave_type: LeaveType,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub reason: Option<String>,
    pub status: LeaveStatus,
    #[serde(default, rename = "days_taken")]
    pub days_taken: Option<u32>,
    #[serde(default, rename = "rejected_reason")]
    pub rejected_reason: Option<String>,
    /// Uploaded evidence filename.
    #[serde(default)]
    pub evidence: Option<String>,
    #[serde(default)]
    pub user: Option<UserRef>,
}

/// Counts for the admin leave dashboard and sidebar badge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct LeaveSummary {
    #[serde(default)]
    pub pending: u32,
    #[serde(default)]
    pub approved: u32,
}

/// An employee's leave application.
#[derive(Debug, Clone)]
pub struct LeaveApplication {
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub evidence: Option<Upload>,
}

#[derive(Serialize)]
struct Review<'a> {
    status: LeaveDecision,
    rejected_reason: Option<&'a str>,
}

impl ApiClient {
    /// Leave requests visible to the caller (all for admins, own for
    /// employees).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn leaves(&self) -> Result<Vec<LeaveRequest>, PortalError> {
        self.get("/leaves").await
    }

    /// # Errors
    ///
    /// Returns a validation error if the end date precedes the start date,
    /// or an API error.
    #[instrument(skip(self, application), fields(kind = application.leave_type.as_str()))]
    pub async fn request_leave(
        &self,
        application: LeaveApplication,
    ) -> Result<Option<String>, PortalError> {
        if application.end_date < application.start_date {
            return Err(PortalError::validation(
                "The end date cannot be before the start date.",
            ));
        }

        let mut form = Form::new()
            .text("type", application.leave_type.as_str())
            .text("startDate", application.start_date.to_string())
            .text("endDate", application.end_date.to_string())
            .text("reason", application.reason);
        if let Some(evidence) = application.evidence {
            form = form.part("evidence", evidence.into_part()?);
        }

        Ok(message(
            &self
                .send_multipart(Method::POST, "/leaves/request", form)
                .await?,
        ))
    }

    /// Approve or reject a pending request.
    ///
    /// # Errors
    ///
    /// Returns a validation error when rejecting without a reason, or an
    /// API error (an expired subscription is refused server-side).
    #[instrument(skip(self, rejected_reason), fields(leave_id = %id))]
    pub async fn review_leave(
        &self,
        id: LeaveId,
        decision: LeaveDecision,
        rejected_reason: Option<&str>,
    ) -> Result<Option<String>, PortalError> {
        let rejected_reason = rejected_reason.map(str::trim).filter(|r| !r.is_empty());
        if decision == LeaveDecision::Rejected && rejected_reason.is_none() {
            return Err(PortalError::validation("A rejection reason is required."));
        }

        let path = format!("/leaves/review/{id}");
        let body = Review {
            status: decision,
            rejected_reason,
        };
        Ok(message(&self.send_json(Method::PATCH, &path, &body).await?))
    }

    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn leave_summary(&self) -> Result<LeaveSummary, PortalError> {
        self.get("/leaves/stats/summary").await
    }
}
