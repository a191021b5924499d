//! Sign-in, registration and password reset.
//!
//! Secrets never go on the command line; they are read from stdin so they
//! stay out of shell history and process listings.

use hris_portal::navigation::routes;
use hris_portal::services::auth::RESEND_SUCCESS;
use hris_portal::services::{AuthFlow, LoginForm, RegisterForm};
use hris_portal::{ApiClient, PortalConfig, PortalError};

use super::{CommandError, read_secrets};

/// Sign in and report where the portal would land.
pub async fn login(api: &ApiClient, email: String, remember: bool) -> Result<(), CommandError> {
    let password = read_secrets("password", 1).await?.remove(0);
    let form = LoginForm {
        email,
        password,
        remember,
    };

    let route = AuthFlow::new(api.clone()).login(&form).await?;
    let name = api
        .session()
        .current()?
        .map(|s| s.name)
        .unwrap_or_default();
    tracing::info!("Welcome back, {name}. Landing on {route}");
    Ok(())
}

/// Exchange a Google ID token for a session. Needs `HRIS_GOOGLE_CLIENT_ID`.
pub async fn google_login(api: &ApiClient, config: &PortalConfig) -> Result<(), CommandError> {
    let client_id = config
        .require_google_client_id()
        .map_err(PortalError::from)?;
    tracing::info!("Paste an ID token issued for client {client_id}");
    let id_token = read_secrets("Google ID token", 1).await?.remove(0);
    let route = AuthFlow::new(api.clone()).google_login(&id_token).await?;
    tracing::info!("Signed in with Google. Landing on {route}");
    Ok(())
}

/// Register a new company and its first admin.
pub async fn register(
    api: &ApiClient,
    first_name: String,
    last_name: String,
    email: String,
    company_name: String,
) -> Result<(), CommandError> {
    let mut secrets = read_secrets("password and confirmation", 2).await?;
    let confirm_password = secrets.remove(1);
    let password = secrets.remove(0);
    let form = RegisterForm {
        first_name,
        last_name,
        email,
        company_name,
        password,
        confirm_password,
    };

    let route = AuthFlow::new(api.clone()).register(&form).await?;
    tracing::info!("Registration complete. Sign in at {route}");
    Ok(())
}

pub fn logout(api: &ApiClient) -> Result<(), CommandError> {
    let route = AuthFlow::new(api.clone()).logout()?;
    tracing::info!("Signed out. Next stop: {route}");
    Ok(())
}

/// Send a reset link. Without `--email`, resends to the address the last
/// link went to.
pub async fn forgot_password(api: &ApiClient, email: Option<String>) -> Result<(), CommandError> {
    let flow = AuthFlow::new(api.clone());
    let Some(email) = email else {
        let route = flow.resend_reset_link().await?;
        if route == routes::FORGOT_PASSWORD {
            return Err(CommandError::MissingInput("--email"));
        }
        tracing::info!("{RESEND_SUCCESS} Next stop: {route}");
        return Ok(());
    };

    let route = flow.forgot_password(&email).await?;
    tracing::info!("Reset link sent to {email}. Next stop: {route}");
    Ok(())
}

pub async fn reset_password(api: &ApiClient, token: &str) -> Result<(), CommandError> {
    let mut secrets = read_secrets("new password and confirmation", 2).await?;
    let confirm = secrets.remove(1);
    let password = secrets.remove(0);

    let route = AuthFlow::new(api.clone())
        .reset_password(token, &password, &confirm)
        .await?;
    tracing::info!("Password updated. Sign in at {route}");
    Ok(())
}
