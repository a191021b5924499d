//! `/company/settings` endpoints: office geofence and working hours.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use super::{ApiClient, message};
use crate::error::PortalError;

const DEFAULT_OFFICE_NAME: &str = "Head Office";
const DEFAULT_RADIUS_METERS: u32 = 100;
const DEFAULT_CLOCK_IN_TIME: &str = "08:00";

/// Company attendance settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySettings {
    #[serde(default)]
    pub office_setting: Option<LocationSettings>,
    /// Standard clock-in time, `HH:MM`.
    #[serde(default)]
    pub clock_in_time: Option<String>,
}

impl CompanySettings {
    /// Office location with the form defaults filled in.
    #[must_use]
    pub fn office_or_default(&self) -> LocationSettings {
        self.office_setting.clone().unwrap_or_default()
    }

    #[must_use]
    pub fn clock_in_time_or_default(&self) -> TimeSettings {
        TimeSettings {
            clock_in_time: self
                .clock_in_time
                .clone()
                .unwrap_or_else(|| DEFAULT_CLOCK_IN_TIME.to_string()),
        }
    }
}

/// Office geofence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSettings {
    pub office_name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Allowed distance from the office, in meters.
    pub radius: u32,
}

impl Default for LocationSettings {
    fn default() -> Self {
        Self {
            office_name: DEFAULT_OFFICE_NAME.to_string(),
            latitude: 0.0,
            longitude: 0.0,
            radius: DEFAULT_RADIUS_METERS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSettings {
    pub clock_in_time: String,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn company_settings(&self) -> Result<CompanySettings, PortalError> {
        let settings: Option<CompanySettings> = self.get("/company/settings").await?;
        Ok(settings.unwrap_or_default())
    }

    /// Replace all attendance settings at once.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self, settings))]
    pub async fn update_company_settings(
        &self,
        settings: &CompanySettings,
    ) -> Result<Option<String>, PortalError> {
        Ok(message(
            &self
                .send_json(Method::PUT, "/company/settings", settings)
                .await?,
        ))
    }

    /// # Errors
    ///
    /// Returns a validation error for a zero radius, or an API error.
    #[instrument(skip(self, location), fields(office = %location.office_name))]
    pub async fn update_office_location(
        &self,
        location: &LocationSettings,
    ) -> Result<Option<String>, PortalError> {
        if location.radius == 0 {
            return Err(PortalError::validation("Radius must be greater than zero."));
        }
        Ok(message(
            &self
                .send_json(Method::PUT, "/company/settings/location", location)
                .await?,
        ))
    }

    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn update_clock_in_time(&self, clock_in_time: &str) -> Result<Option<String>, PortalError> {
        let body = json!({ "clockInTime": clock_in_time });
        Ok(message(
            &self
                .send_json(Method::PUT, "/company/settings/time", &body)
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
    fn test_defaults_when_unset() {
        let settings: CompanySettings = serde_json::from_value(json!({})).unwrap();
        assert_eq!(settings.office_or_default().radius, 100);
        assert_eq!(settings.clock_in_time_or_default().clock_in_time, "08:00");
    }

    #[test]
    fn test_location_wire_names() {
        let value = serde_json::to_value(LocationSettings::default()).unwrap();
        assert!(value.get("officeName").is_some());
        assert_eq!(value["radius"], 100);
    }
}
