//! `/payroll` endpoints.
//!
//! The backend computes every amount. Amounts are carried as [`Decimal`]
//! so they survive the round trip without float rounding.

use hris_core::{PayrollId, PayrollStatus};
use reqwest::Method;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use super::{ApiClient, UserRef, message};
use crate::error::PortalError;

/// One employee's payslip for a period.
#[derive(Debug, Clone, Deserialize)]
pub struct PayrollRecord {
    pub id: PayrollId,
    pub month: u32,
    pub year: i32,
    pub status: PayrollStatus,
    #[serde(default)]
    pub basic_salary: Decimal,
    #[serde(default)]
    pub allowances: Decimal,
    #[serde(default)]
    pub deductions: Decimal,
    #[serde(default)]
    pub net_salary: Decimal,
    #[serde(default)]
    pub total_attendance: Option<u32>,
    #[serde(default)]
    pub total_late_mins: Option<u32>,
    #[serde(default)]
    pub user: Option<UserRef>,
}

impl PayrollRecord {
    /// Gross pay before deductions.
    #[must_use]
    pub fn gross(&self) -> Decimal {
        self.basic_salary + self.allowances
    }
}

/// Payroll period, 1-based month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Period {
    pub month: u32,
    pub year: i32,
}

impl Period {
    /// # Errors
    ///
    /// Returns a validation error for a month outside 1..=12.
    pub fn new(month: u32, year: i32) -> Result<Self, PortalError> {
        if (1..=12).contains(&month) {
            Ok(Self { month, year })
        } else {
            Err(PortalError::validation("Month must be between 1 and 12."))
        }
    }

    fn query(self) -> [(&'static str, String); 2] {
        [("month", self.month.to_string()), ("year", self.year.to_string())]
    }
}

impl ApiClient {
    /// All payslips for a period.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn payroll_list(&self, period: Period) -> Result<Vec<PayrollRecord>, PortalError> {
        self.get_query("/payroll/list", &period.query()).await
    }

    /// The signed-in employee's payslips.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn my_payroll(&self) -> Result<Vec<PayrollRecord>, PortalError> {
        self.get("/payroll/me").await
    }

    /// # Errors
    ///
    /// Returns error if the payslip does not exist or the request fails.
    #[instrument(skip(self), fields(payroll_id = %id))]
    pub async fn payroll(&self, id: PayrollId) -> Result<PayrollRecord, PortalError> {
        self.get(&format!("/payroll/{id}")).await
    }

    /// Create draft payslips for every employee for a period.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn generate_payroll(&self, period: Period) -> Result<Option<String>, PortalError> {
        Ok(message(
            &self
                .send_json(Method::POST, "/payroll/generate", &period)
                .await?,
        ))
    }

    /// Recalculate one draft from attendance data.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self), fields(payroll_id = %id))]
    pub async fn calculate_payroll(&self, id: PayrollId) -> Result<Option<String>, PortalError> {
        let path = format!("/payroll/calculate/{id}");
        Ok(message(&self.send_empty(Method::PATCH, &path).await?))
    }

    /// Approve every reviewed payslip in a period.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn approve_all_payroll(&self, period: Period) -> Result<Option<String>, PortalError> {
        Ok(message(
            &self
                .send_json(Method::POST, "/payroll/approve-all", &period)
                .await?,
        ))
    }

    /// Mark approved payslips as paid.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty selection, or an API error.
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn bulk_pay(&self, ids: &[PayrollId]) -> Result<Option<String>, PortalError> {
        if ids.is_empty() {
            return Err(PortalError::validation("Select at least one payslip."));
        }
        let body = json!({ "payrollIds": ids });
        Ok(message(
            &self
                .send_json(Method::POST, "/payroll/bulk-payment", &body)
                .await?,
        ))
    }

    /// Move one payslip to a different status.
    ///
    /// # Errors
    ///
    /// Returns error if the transition is refused or the request fails.
    #[instrument(skip(self), fields(payroll_id = %id))]
    pub async fn set_payroll_status(
        &self,
        id: PayrollId,
        status: PayrollStatus,
    ) -> Result<(), PortalError> {
        let path = format!("/payroll/{id}");
        self.send_json(Method::PATCH, &path, &json!({ "status": status }))
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self), fields(payroll_id = %id))]
    pub async fn delete_payroll(&self, id: PayrollId) -> Result<(), PortalError> {
        self.send_empty(Method::DELETE, &format!("/payroll/{id}"))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use serde_json::json;

    use super::*;

    #[test]
    fn test_amounts_accept_strings_and_numbers() {
        let record: PayrollRecord = serde_json::from_value(json!({
            "id": 1,
            "month": 2,
            "year": 2025,
            "status": "Review",
            "basic_salary": "5000000.00",
            "allowances": 750000,
            "deductions": "125000.50",
            "net_salary": "5624999.50"
        }))
        .unwrap();
        assert_eq!(record.gross(), Decimal::from_str("5750000").unwrap());
        assert_eq!(record.gross() - record.deductions, record.net_salary);
        assert_eq!(record.status, PayrollStatus::Review);
    }

    #[test]
    fn test_period_validation() {
        assert!(Period::new(0, 2025).is_err());
        assert!(Period::new(13, 2025).is_err());
        assert_eq!(
            serde_json::to_value(Period::new(12, 2025).unwrap()).unwrap(),
            json!({ "month": 12, "year": 2025 })
        );
    }
}
