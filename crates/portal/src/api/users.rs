//! `/users` endpoints: own profile and notifications.

use chrono::{DateTime, Utc};
use hris_core::NotificationId;
use reqwest::Method;
use reqwest::multipart::Form;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use super::{ApiClient, PositionRef, Upload, data};
use crate::error::PortalError;

/// Multipart field the backend expects the photo under.
pub const PHOTO_FIELD: &str = "profile_image";

/// The signed-in user's profile.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "employeeId")]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub nik: Option<String>,
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(default)]
    pub bank_account: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub position: Option<PositionRef>,
}

/// Editable profile fields. Unset fields are left alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_account: Option<String>,
}

/// A header notification. Admins receive the company audit feed here,
/// employees their own notices.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct PhotoUploaded {
    filename: String,
}

impl ApiClient {
    /// `GET /users/profile`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn profile(&self) -> Result<Profile, PortalError> {
        self.get("/users/profile").await
    }

    /// `PATCH /users/me`. Returns the updated profile.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self, update))]
    pub async fn update_me(&self, update: &ProfileUpdate) -> Result<Profile, PortalError> {
        data(self.send_json(Method::PATCH, "/users/me", update).await?)
    }

    /// Upload a new profile photo. Returns the stored filename.
    ///
    /// # Errors
    ///
    /// Returns error if the upload is rejected or the request fails.
    #[instrument(skip(self, photo), fields(file = %photo.file_name, size = photo.bytes.len()))]
    pub async fn upload_photo(&self, photo: Upload) -> Result<String, PortalError> {
        let form = Form::new().part(PHOTO_FIELD, photo.into_part()?);
        let body = self
            .send_multipart(Method::POST, "/users/me/photo", form)
            .await?;
        let uploaded: PhotoUploaded = serde_json::from_value(body)?;
        Ok(uploaded.filename)
    }

    /// `PATCH /users/me/password`.
    ///
    /// # Errors
    ///
    /// Returns error if the old password is wrong or the request fails.
    #[instrument(skip_all)]
    pub async fn change_password(
        &self,
        old_password: &SecretString,
        new_password: &SecretString,
    ) -> Result<(), PortalError> {
        let body = json!({
            "oldPassword": old_password.expose_secret(),
            "newPassword": new_password.expose_secret(),
        });
        self.send_json(Method::PATCH, "/users/me/password", &body)
            .await?;
        Ok(())
    }

    /// `GET /users/notifications`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn notifications(&self) -> Result<Vec<Notification>, PortalError> {
        self.get("/users/notifications").await
    }

    /// `PATCH /users/notifications/read`: mark every notification read.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn mark_notifications_read(&self) -> Result<(), PortalError> {
        self.send_empty(Method::PATCH, "/users/notifications/read")
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
    fn test_profile_update_skips_unset_fields() {
        let update = ProfileUpdate {
            name: Some("Rina".to_string()),
            ..ProfileUpdate::default()
        };
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({ "name": "Rina" }));
    }

    #[test]
    fn test_notification_defaults_unread() {
        let n: Notification = serde_json::from_value(json!({
            "id": 3,
            "title": "Cuti disetujui",
            "message": "Pengajuan cuti Anda disetujui",
            "created_at": "2025-01-05T08:00:00Z"
        }))
        .unwrap();
        assert!(!n.is_read);
        assert_eq!(n.id.get(), 3);
    }
}
