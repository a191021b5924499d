//! Login, registration, password recovery and logout.

use hris_core::{Email, Role, SubscriptionStatus};
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, instrument, warn};

use crate::api::ApiClient;
use crate::api::auth::{LoginResponse, Registration};
use crate::error::{FlowError, PortalError};
use crate::navigation::{landing_route, routes};
use crate::session::NewSession;

pub const LOGIN_FALLBACK: &str = "Incorrect email or password.";
pub const GOOGLE_FALLBACK: &str = "This Google account is not registered.";
pub const REGISTER_FALLBACK: &str = "Registration failed.";
pub const FORGOT_FALLBACK: &str = "Failed to send the reset link.";
pub const RESEND_FALLBACK: &str = "Failed to resend email.";
pub const RESEND_SUCCESS: &str = "Email resent successfully! Please check your inbox.";
pub const RESET_FALLBACK: &str = "Failed to reset the password.";
pub const LOGOUT_FALLBACK: &str = "Could not clear the session.";

/// Shortest password the reset form accepts.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Email/password login form.
#[derive(Debug, Clone)]
pub struct LoginForm {
    pub email: String,
    pub password: SecretString,
    /// Keep the email for pre-filling the next login.
    pub remember: bool,
}

/// Self-registration form.
#[derive(Debug, Clone)]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company_name: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
}

/// Authentication flows. Each returns the route to go to next.
#[derive(Debug, Clone)]
pub struct AuthFlow {
    api: ApiClient,
}

impl AuthFlow {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns the server's message verbatim when it gave one, otherwise
    /// [`LOGIN_FALLBACK`]. The session is untouched on failure.
    #[instrument(skip(self, form), fields(remember = form.remember))]
    pub async fn login(&self, form: &LoginForm) -> Result<&'static str, FlowError> {
        let email = parse_email(&form.email)?;
        if form.password.expose_secret().is_empty() {
            return Err(FlowError::invalid("Password is required."));
        }

        let response = self
            .api
            .login(email.as_str(), &form.password)
            .await
            .map_err(|e| {
                warn!(error = %e, "Login rejected");
                FlowError::new(e, LOGIN_FALLBACK)
            })?;

        let remember = form.remember.then_some(email.as_str());
        self.establish(response, remember, LOGIN_FALLBACK)
    }

    /// Sign in with a Google ID token.
    ///
    /// # Errors
    ///
    /// Returns the server's message or [`GOOGLE_FALLBACK`].
    #[instrument(skip_all)]
    pub async fn google_login(&self, id_token: &SecretString) -> Result<&'static str, FlowError> {
        let response = self.api.google_login(id_token).await.map_err(|e| {
            warn!(error = %e, "Google login rejected");
            FlowError::new(e, GOOGLE_FALLBACK)
        })?;
        let remembered = self
            .api
            .session()
            .remembered_email()
            .map_err(|e| FlowError::new(e.into(), GOOGLE_FALLBACK))?;
        self.establish(response, remembered.as_deref(), GOOGLE_FALLBACK)
    }

    fn establish(
        &self,
        response: LoginResponse,
        remember_email: Option<&str>,
        fallback: &str,
    ) -> Result<&'static str, FlowError> {
        let user = response.user;
        let destination = user
            .role
            .parse::<Role>()
            .map_or(routes::DASHBOARD, landing_route);
        let subscription = if user.is_expired {
            SubscriptionStatus::Expired
        } else {
            SubscriptionStatus::Active
        };

        self.api
            .session()
            .establish(
                NewSession {
                    token: response.token,
                    role: user.role,
                    name: user.name,
                    profile_image: user.profile_image,
                    company_id: user.company_id,
                    subscription,
                },
                remember_email,
            )
            .map_err(|e| FlowError::new(e.into(), fallback))?;

        info!(destination, "Signed in");
        Ok(destination)
    }

    /// Register a company. On success the visitor goes to the login page.
    ///
    /// # Errors
    ///
    /// Returns a validation message when the passwords differ, otherwise the
    /// first validator message, the server message or [`REGISTER_FALLBACK`].
    #[instrument(skip(self, form))]
    pub async fn register(&self, form: &RegisterForm) -> Result<&'static str, FlowError> {
        if form.password.expose_secret() != form.confirm_password.expose_secret() {
            return Err(FlowError::invalid("Passwords do not match."));
        }
        let email = parse_email(&form.email)?;

        let registration = Registration {
            name: format!("{} {}", form.first_name, form.last_name)
                .trim()
                .to_string(),
            email: email.into_inner(),
            company_name: form.company_name.trim().to_string(),
            password: form.password.expose_secret().to_string(),
        };

        self.api
            .register(&registration)
            .await
            .map_err(|e| FlowError::new(e, REGISTER_FALLBACK))?;
        info!("Company registered");
        Ok(routes::LOGIN)
    }

    /// Request a reset link and remember where it was sent. On success the
    /// visitor goes to the check-email page.
    ///
    /// # Errors
    ///
    /// Returns the server message or [`FORGOT_FALLBACK`].
    #[instrument(skip(self))]
    pub async fn forgot_password(&self, email: &str) -> Result<&'static str, FlowError> {
        let email = parse_email(email)?;
        self.send_reset_link(email.as_str(), FORGOT_FALLBACK).await?;
        self.api
            .session()
            .set_reset_email(Some(email.as_str()))
            .map_err(|e| FlowError::new(e.into(), FORGOT_FALLBACK))?;
        Ok(routes::CHECK_EMAIL)
    }

    /// Send the reset link again to the address it last went to.
    ///
    /// Without a stored reset email there is nothing to resend and the
    /// visitor goes back to the forgot-password page, no request made.
    ///
    /// # Errors
    ///
    /// Returns the server message or [`RESEND_FALLBACK`].
    #[instrument(skip(self))]
    pub async fn resend_reset_link(&self) -> Result<&'static str, FlowError> {
        let email = self
            .api
            .session()
            .reset_email()
            .map_err(|e| FlowError::new(e.into(), RESEND_FALLBACK))?;
        let Some(email) = email else {
            return Ok(routes::FORGOT_PASSWORD);
        };
        self.send_reset_link(&email, RESEND_FALLBACK).await?;
        Ok(routes::CHECK_EMAIL)
    }

    async fn send_reset_link(&self, email: &str, fallback: &str) -> Result<(), FlowError> {
        let message = self
            .api
            .forgot_password(email)
            .await
            .map_err(|e| FlowError::new(e, fallback))?;
        info!(server_message = message.as_deref().unwrap_or_default(), "Reset link sent");
        Ok(())
    }

    /// Set a new password from a reset link.
    ///
    /// # Errors
    ///
    /// Returns a validation message for a short or unconfirmed password,
    /// otherwise the server message or [`RESET_FALLBACK`].
    #[instrument(skip_all)]
    pub async fn reset_password(
        &self,
        token: &str,
        password: &SecretString,
        confirm: &SecretString,
    ) -> Result<&'static str, FlowError> {
        if password.expose_secret().chars().count() < MIN_PASSWORD_LEN {
            return Err(FlowError::invalid(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters."
            )));
        }
        if password.expose_secret() != confirm.expose_secret() {
            return Err(FlowError::invalid("Passwords do not match."));
        }

        self.api
            .reset_password(token, password)
            .await
            .map_err(|e| FlowError::new(e, RESET_FALLBACK))?;
        self.api
            .session()
            .set_reset_email(None)
            .map_err(|e| FlowError::new(e.into(), RESET_FALLBACK))?;
        Ok(routes::LOGIN)
    }

    /// Wipe the session and return the login route.
    ///
    /// # Errors
    ///
    /// Returns [`LOGOUT_FALLBACK`] if storage cannot be cleared.
    pub fn logout(&self) -> Result<&'static str, FlowError> {
        self.api
            .session()
            .clear()
            .map_err(|e| FlowError::new(PortalError::from(e), LOGOUT_FALLBACK))?;
        Ok(routes::LOGIN)
    }
}

fn parse_email(raw: &str) -> Result<Email, FlowError> {
    Email::parse(raw).map_err(|e| {
        FlowError::invalid(match e {
            hris_core::EmailError::Empty => "Email is required.".to_string(),
            other => format!("Invalid email: {other}."),
        })
    })
}
