//! Self-service profile edits.
//!
//! Successful edits are written back to the session, which publishes the
//! change so every header on the bus shows the new name or photo.

use secrecy::{ExposeSecret, SecretString};
use tracing::{info, instrument};

use crate::api::users::{Profile, ProfileUpdate};
use crate::api::{ApiClient, Upload};
use crate::error::{FlowError, PortalError};

pub const UPDATE_FALLBACK: &str = "Could not update the profile.";
pub const PHOTO_FALLBACK: &str = "Could not upload the photo.";
pub const PASSWORD_FALLBACK: &str = "Could not change the password.";

#[derive(Debug, Clone)]
pub struct ProfileFlow {
    api: ApiClient,
}

impl ProfileFlow {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Edits need a signed-in session; fails before any request otherwise.
    fn require_session(&self, fallback: &str) -> Result<(), FlowError> {
        match self.api.session().is_authenticated() {
            Ok(true) => Ok(()),
            Ok(false) => Err(FlowError::new(PortalError::SignedOut, fallback)),
            Err(e) => Err(FlowError::new(e.into(), fallback)),
        }
    }

    /// Save profile fields and refresh the displayed name.
    ///
    /// # Errors
    ///
    /// Returns [`SIGNED_OUT_MESSAGE`](crate::error::SIGNED_OUT_MESSAGE)
    /// without a session, otherwise the server message or [`UPDATE_FALLBACK`].
    #[instrument(skip(self, update))]
    pub async fn update(&self, update: &ProfileUpdate) -> Result<Profile, FlowError> {
        if update
            .name
            .as_deref()
            .is_some_and(|name| name.trim().is_empty())
        {
            return Err(FlowError::invalid("Name cannot be empty."));
        }
        self.require_session(UPDATE_FALLBACK)?;

        let profile = self
            .api
            .update_me(update)
            .await
            .map_err(|e| FlowError::new(e, UPDATE_FALLBACK))?;
        self.api
            .session()
            .update_identity(Some(profile.name.clone()), None)
            .map_err(|e| FlowError::new(e.into(), UPDATE_FALLBACK))?;
        info!("Profile updated");
        Ok(profile)
    }

    /// Upload a new photo and refresh the displayed avatar.
    ///
    /// # Errors
    ///
    /// Returns the server message or [`PHOTO_FALLBACK`].
    #[instrument(skip(self, photo), fields(file = %photo.file_name))]
    pub async fn upload_photo(&self, photo: Upload) -> Result<String, FlowError> {
        if photo.bytes.is_empty() {
            return Err(FlowError::invalid("Choose a photo to upload."));
        }
        self.require_session(PHOTO_FALLBACK)?;

        let filename = self
            .api
            .upload_photo(photo)
            .await
            .map_err(|e| FlowError::new(e, PHOTO_FALLBACK))?;
        self.api
            .session()
            .update_identity(None, Some(filename.clone()))
            .map_err(|e| FlowError::new(e.into(), PHOTO_FALLBACK))?;
        info!(%filename, "Profile photo replaced");
        Ok(filename)
    }

    /// # Errors
    ///
    /// Returns a validation message when the confirmation differs,
    /// otherwise the server message or [`PASSWORD_FALLBACK`].
    #[instrument(skip_all)]
    pub async fn change_password(
        &self,
        old_password: &SecretString,
        new_password: &SecretString,
        confirm: &SecretString,
    ) -> Result<(), FlowError> {
        if new_password.expose_secret() != confirm.expose_secret() {
            return Err(FlowError::invalid("Password confirmation does not match."));
        }
        if new_password.expose_secret().is_empty() {
            return Err(FlowError::invalid("New password is required."));
        }
        self.require_session(PASSWORD_FALLBACK)?;

        self.api
            .change_password(old_password, new_password)
            .await
            .map_err(|e| FlowError::new(e, PASSWORD_FALLBACK))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::PortalConfig;
    use crate::error::SIGNED_OUT_MESSAGE;
    use crate::session::SessionStore;

    fn offline_flow() -> ProfileFlow {
        let config = PortalConfig::for_api_url("http://127.0.0.1:9/api").unwrap();
        ProfileFlow::new(ApiClient::new(&config, SessionStore::in_memory()).unwrap())
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected() {
        let err = offline_flow()
            .update(&ProfileUpdate {
                name: Some("  ".to_string()),
                ..ProfileUpdate::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err.message, "Name cannot be empty.");
    }

    #[tokio::test]
    async fn test_password_confirmation() {
        let s = |v: &str| SecretString::from(v.to_string());
        let err = offline_flow()
            .change_password(&s("old"), &s("new-pass"), &s("new-pas"))
            .await
            .unwrap_err();
        assert_eq!(err.message, "Password confirmation does not match.");
    }

    #[tokio::test]
    async fn test_empty_photo_is_rejected() {
        let err = offline_flow()
            .upload_photo(Upload::new("me.jpg", "image/jpeg", Vec::new()))
            .await
            .unwrap_err();
        assert_eq!(err.message, "Choose a photo to upload.");
    }

    #[tokio::test]
    async fn test_edits_need_a_session() {
        let flow = offline_flow();
        let err = flow
            .update(&ProfileUpdate {
                name: Some("Sari".to_string()),
                ..ProfileUpdate::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err.message, SIGNED_OUT_MESSAGE);
        assert!(matches!(err.cause, PortalError::SignedOut));

        let err = flow
            .upload_photo(Upload::new("me.png", "image/png", vec![1, 2, 3]))
            .await
            .unwrap_err();
        assert_eq!(err.message, SIGNED_OUT_MESSAGE);

        let s = |v: &str| SecretString::from(v.to_string());
        let err = flow
            .change_password(&s("old"), &s("new-pass"), &s("new-pass"))
            .await
            .unwrap_err();
        assert_eq!(err.message, SIGNED_OUT_MESSAGE);
    }
}
