//! `/subscription` endpoints: the tenant's own plan and billing.

use chrono::{DateTime, Utc};
use hris_core::{PlanId, TransactionId, TransactionStatus};
use reqwest::Method;
use reqwest::multipart::Form;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use super::{ApiClient, Upload, message};
use crate::error::PortalError;

/// A plan in the public catalogue.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: PlanId,
    pub name: String,
    pub price: Decimal,
    pub max_employees: u32,
    pub duration_days: u32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
}

const fn active_by_default() -> bool {
    true
}

/// The tenant's current plan and usage.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyPlan {
    #[serde(default)]
    pub plan_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub days_left: Option<i64>,
    #[serde(default)]
    pub max_employees: Option<u32>,
    #[serde(default)]
    pub active_employees: Option<u32>,
}

impl MyPlan {
    /// Seats still available under the plan.
    #[must_use]
    pub fn seats_left(&self) -> Option<u32> {
        Some(self.max_employees?.saturating_sub(self.active_employees.unwrap_or(0)))
    }
}

/// A payment for a plan.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionTransaction {
    pub id: TransactionId,
    #[serde(default)]
    pub invoice_id: Option<String>,
    #[serde(default)]
    pub reference_id: Option<String>,
    #[serde(default)]
    pub plan_name: Option<String>,
    pub amount: Decimal,
    pub status: TransactionStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Present in the superadmin billing view.
    #[serde(default)]
    pub company: Option<CompanyName>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompanyName {
    pub name: String,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn my_plan(&self) -> Result<Option<MyPlan>, PortalError> {
        self.get("/subscription/my-plan").await
    }

    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn plans(&self) -> Result<Vec<Plan>, PortalError> {
        self.get("/subscription/plans").await
    }

    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn billing_history(&self) -> Result<Vec<SubscriptionTransaction>, PortalError> {
        self.get("/subscription/my-history").await
    }

    /// Pay for a plan by bank transfer, attaching the receipt.
    ///
    /// # Errors
    ///
    /// Returns error if the upload is rejected or the request fails.
    #[instrument(skip(self, proof), fields(plan_id = %plan_id))]
    pub async fn checkout_manual(
        &self,
        plan_id: PlanId,
        proof: Upload,
    ) -> Result<Option<String>, PortalError> {
        let form = Form::new()
            .text("planId", plan_id.to_string())
            .part("proofOfPayment", proof.into_part()?);
        Ok(message(
            &self
                .send_multipart(Method::POST, "/subscription/checkout-manual", form)
                .await?,
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_seats_left() {
        let plan: MyPlan = serde_json::from_value(json!({
            "planName": "Pro",
            "maxEmployees": 50,
            "activeEmployees": 52
        }))
        .unwrap();
        assert_eq!(plan.seats_left(), Some(0));
    }

    #[test]
    fn test_unknown_transaction_status() {
        let tx: SubscriptionTransaction = serde_json::from_value(json!({
            "id": 8,
            "amount": "299000",
            "status": "Refunded"
        }))
        .unwrap();
        assert_eq!(tx.status, TransactionStatus::Other);
        assert!(!tx.status.is_verifiable());
    }
}
