//! `/superadmin` endpoints: platform metrics, tenants, plan catalogue and
//! manual payment verification.

use hris_core::{CompanyId, PlanId, TransactionId};
use reqwest::Method;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::subscription::{Plan, SubscriptionTransaction};
use super::{ApiClient, message};
use crate::error::PortalError;

/// Platform-wide dashboard figures.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformMetrics {
    #[serde(default)]
    pub total_revenue: Decimal,
    #[serde(default)]
    pub total_tenants: u32,
    #[serde(default)]
    pub total_users: u32,
    #[serde(default)]
    pub plan_distribution: Vec<PlanShare>,
    #[serde(default)]
    pub recent_tenants: Vec<RecentTenant>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlanShare {
    pub name: String,
    #[serde(default)]
    pub value: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecentTenant {
    pub id: CompanyId,
    pub name: String,
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// A tenant company.
#[derive(Debug, Clone, Deserialize)]
pub struct Tenant {
    pub id: CompanyId,
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub subscription: Option<TenantSubscription>,
    #[serde(default, rename = "_count")]
    pub count: Option<TenantCount>,
}

impl Tenant {
    #[must_use]
    pub fn employees(&self) -> u32 {
        self.count.map_or(0, |c| c.users)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantSubscription {
    #[serde(default)]
    pub plan_name: Option<String>,
    #[serde(default)]
    pub max_employees: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TenantCount {
    pub users: u32,
}

/// Create (no `id`) or update (with `id`) a catalogue plan.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanUpsert {
    pub id: Option<PlanId>,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub max_employees: u32,
    pub duration_days: u32,
    pub description: String,
    pub is_active: bool,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn platform_metrics(&self) -> Result<PlatformMetrics, PortalError> {
        self.get("/superadmin/metrics").await
    }

    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn tenants(&self) -> Result<Vec<Tenant>, PortalError> {
        self.get("/superadmin/tenants").await
    }

    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn master_plans(&self) -> Result<Vec<Plan>, PortalError> {
        self.get("/superadmin/master-plans").await
    }

    /// # Errors
    ///
    /// Returns a validation error when the name or price is missing, or an
    /// API error.
    #[instrument(skip(self, plan), fields(name = %plan.name, id = ?plan.id))]
    pub async fn upsert_master_plan(&self, plan: &PlanUpsert) -> Result<Option<String>, PortalError> {
        if plan.name.trim().is_empty() || plan.price.is_zero() {
            return Err(PortalError::validation("Plan name and price are required."));
        }
        Ok(message(
            &self
                .send_json(Method::POST, "/superadmin/master-plans", plan)
                .await?,
        ))
    }

    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self), fields(plan_id = %id))]
    pub async fn delete_master_plan(&self, id: PlanId) -> Result<(), PortalError> {
        self.send_empty(Method::DELETE, &format!("/superadmin/master-plans/{id}"))
            .await?;
        Ok(())
    }

    /// Suspend a tenant's subscription. The company and its data stay.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self), fields(company_id = %id))]
    pub async fn suspend_tenant(&self, id: CompanyId) -> Result<Option<String>, PortalError> {
        let path = format!("/superadmin/tenants/{id}/terminate");
        Ok(message(&self.send_empty(Method::DELETE, &path).await?))
    }

    /// Delete a tenant and all of its data.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self), fields(company_id = %id))]
    pub async fn delete_tenant(&self, id: CompanyId) -> Result<Option<String>, PortalError> {
        let path = format!("/superadmin/tenants/{id}");
        Ok(message(&self.send_empty(Method::DELETE, &path).await?))
    }

    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn billing_transactions(&self) -> Result<Vec<SubscriptionTransaction>, PortalError> {
        self.get("/superadmin/billing/transactions").await
    }

    /// Verify a bank-transfer payment and activate the plan.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self), fields(transaction_id = %id))]
    pub async fn activate_manual(&self, id: TransactionId) -> Result<Option<String>, PortalError> {
        let path = format!("/superadmin/billing/activate-manual/{id}");
        Ok(message(&self.send_empty(Method::POST, &path).await?))
    }
}
