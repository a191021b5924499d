//! `/positions` endpoints.

use hris_core::PositionId;
use reqwest::Method;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{ApiClient, message};
use crate::error::PortalError;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: PositionId,
    pub position_name: String,
    #[serde(default)]
    pub base_salary: Decimal,
    #[serde(default)]
    pub allowance: Decimal,
    #[serde(default, rename = "_count")]
    pub count: Option<PositionCount>,
}

impl Position {
    /// Employees currently holding the position.
    #[must_use]
    pub fn headcount(&self) -> u32 {
        self.count.map_or(0, |c| c.users)
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PositionCount {
    pub users: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPosition {
    pub position_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub base_salary: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub allowance: Decimal,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn positions(&self) -> Result<Vec<Position>, PortalError> {
        self.get("/positions").await
    }

    /// # Errors
    ///
    /// Returns a validation error for a blank name or negative amounts, or
    /// an API error.
    #[instrument(skip(self, position), fields(name = %position.position_name))]
    pub async fn create_position(&self, position: &NewPosition) -> Result<Option<String>, PortalError> {
        if position.position_name.trim().is_empty() {
            return Err(PortalError::validation("Position name is required."));
        }
        if position.base_salary.is_sign_negative() || position.allowance.is_sign_negative() {
            return Err(PortalError::validation("Salary amounts cannot be negative."));
        }
        Ok(message(
            &self.send_json(Method::POST, "/positions", position).await?,
        ))
    }

    /// # Errors
    ///
    /// Returns error if the position is still assigned or the request fails.
    #[instrument(skip(self), fields(position_id = %id))]
    pub async fn delete_position(&self, id: PositionId) -> Result<(), PortalError> {
        self.send_empty(Method::DELETE, &format!("/positions/{id}"))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_headcount() {
        let p: Position = serde_json::from_value(json!({
            "id": 1,
            "positionName": "Staff",
            "baseSalary": 4000000,
            "allowance": 500000,
            "_count": { "users": 6 }
        }))
        .unwrap();
        assert_eq!(p.headcount(), 6);

        let empty: Position =
            serde_json::from_value(json!({ "id": 2, "positionName": "Intern" })).unwrap();
        assert_eq!(empty.headcount(), 0);
    }
}
