//! `/auth` endpoints.

use chrono::{DateTime, Utc};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use super::{ApiClient, message, opt_string_or_number, whole};
use crate::error::PortalError;

/// Result of a successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: AuthUser,
}

/// The account returned alongside a login token.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Raw role string. Parsed when the session is read.
    pub role: String,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub company_id: Option<String>,
    #[serde(default)]
    pub is_expired: bool,
    #[serde(default, rename = "profile_image")]
    pub profile_image: Option<String>,
}

/// Self-registration of a new tenant.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub company_name: String,
    pub password: String,
}

/// `GET /auth/me`.
#[derive(Debug, Clone, Deserialize)]
pub struct Me {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<CompanySummary>,
}

impl Me {
    /// When the tenant's subscription ends, if known.
    #[must_use]
    pub fn subscription_end(&self) -> Option<DateTime<Utc>> {
        self.company
            .as_ref()?
            .subscription
            .as_ref()?
            .end_date
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompanySummary {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub subscription: Option<SubscriptionSummary>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionSummary {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

impl ApiClient {
    /// Exchange email and password for a session token.
    ///
    /// # Errors
    ///
    /// Returns error if the credentials are rejected or the request fails.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<LoginResponse, PortalError> {
        let body = json!({ "email": email, "password": password.expose_secret() });
        whole(self.send_json(Method::POST, "/auth/login", &body).await?)
    }

    /// Exchange a Google ID token for a session token.
    ///
    /// # Errors
    ///
    /// Returns error if the account is unknown or the request fails.
    #[instrument(skip_all)]
    pub async fn google_login(&self, id_token: &SecretString) -> Result<LoginResponse, PortalError> {
        let body = json!({ "idToken": id_token.expose_secret() });
        whole(self.send_json(Method::POST, "/auth/google", &body).await?)
    }

    /// Register a new company and its first admin.
    ///
    /// # Errors
    ///
    /// Returns error if validation fails server-side or the request fails.
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: &Registration) -> Result<Option<String>, PortalError> {
        let body = self
            .send_json(Method::POST, "/auth/register", registration)
            .await?;
        Ok(message(&body))
    }

    /// Ask for a password reset link.
    ///
    /// # Errors
    ///
    /// Returns error if the address is unknown or the request fails.
    #[instrument(skip(self))]
    pub async fn forgot_password(&self, email: &str) -> Result<Option<String>, PortalError> {
        let body = self
            .send_json(Method::POST, "/auth/forgot-password", &json!({ "email": email }))
            .await?;
        Ok(message(&body))
    }

    /// Set a new password using the token from a reset link.
    ///
    /// # Errors
    ///
    /// Returns error if the token is invalid or expired.
    #[instrument(skip_all)]
    pub async fn reset_password(
        &self,
        token: &str,
        password: &SecretString,
    ) -> Result<Option<String>, PortalError> {
        let body = json!({
            "password": password.expose_secret(),
            "confirmPassword": password.expose_secret(),
        });
        let path = format!("/auth/reset-password/{token}");
        Ok(message(&self.send_json(Method::POST, &path, &body).await?))
    }

    /// The signed-in account with its company and subscription.
    ///
    /// # Errors
    ///
    /// Returns error if the token is rejected or the request fails.
    #[instrument(skip(self))]
    pub async fn me(&self) -> Result<Me, PortalError> {
        self.get("/auth/me").await
    }
}
