//! Typed client for the HRIS backend REST API.
//!
//! Every response body has the shape `{ success, data?, message? }`. A
//! request counts as failed when the status is not 2xx or the body says
//! `success: false`. The failure message is the first `errors[].msg`
//! produced by the backend's validators, or else `message`.
//!
//! The bearer token is read from the [`SessionStore`] on each request, so a
//! login or logout in any tab takes effect on the next call.
//!
//! # Modules
//!
//! Endpoints are grouped by backend router: [`auth`], [`users`],
//! [`attendance`], [`company`], [`leaves`], [`payroll`], [`positions`],
//! [`subscription`], [`superadmin`] and [`audit`].

pub mod attendance;
pub mod audit;
pub mod auth;
pub mod company;
pub mod leaves;
pub mod payroll;
pub mod positions;
pub mod subscription;
pub mod superadmin;
pub mod users;

use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::PortalConfig;
use crate::error::PortalError;
use crate::session::SessionStore;

/// HRIS backend client.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    /// Create a client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &PortalConfig, session: SessionStore) -> Result<Self, PortalError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.api_url.as_str().trim_end_matches('/').to_string(),
                session,
            }),
        })
    }

    /// Session store the client reads its token from.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.inner.base_url);
        self.inner.http.request(method, url)
    }

    /// GET and decode `data`.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, PortalError> {
        data(self.execute(self.request(Method::GET, path)).await?)
    }

    /// GET with query parameters and decode `data`.
    pub(crate) async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, PortalError> {
        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(query)
            .finish();
        self.get(&format!("{path}?{encoded}")).await
    }

    /// Send a JSON body and return the whole response envelope.
    pub(crate) async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Value, PortalError> {
        self.execute(self.request(method, path).json(body)).await
    }

    /// Send a request without a body and return the whole envelope.
    pub(crate) async fn send_empty(&self, method: Method, path: &str) -> Result<Value, PortalError> {
        self.execute(self.request(method, path)).await
    }

    /// Send a multipart form and return the whole envelope.
    pub(crate) async fn send_multipart(
        &self,
        method: Method,
        path: &str,
        form: Form,
    ) -> Result<Value, PortalError> {
        self.execute(self.request(method, path).multipart(form))
            .await
    }

    /// Attach the bearer token, send, and unwrap the response envelope.
    async fn execute(&self, request: RequestBuilder) -> Result<Value, PortalError> {
        let request = match self.inner.session.token()? {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        debug!(status = status.as_u16(), len = bytes.len(), "Response received");

        let body: Value = if bytes.is_empty() && status.is_success() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).map_err(|_| PortalError::InvalidResponse {
                status: status.as_u16(),
            })?
        };

        let declined = body.get("success").and_then(Value::as_bool) == Some(false);
        if !status.is_success() || declined {
            return Err(PortalError::Api {
                status: status.as_u16(),
                message: failure_message(&body),
            });
        }

        Ok(body)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

/// Pick the message out of a failed response body.
///
/// Validator error arrays take precedence over the plain `message`.
fn failure_message(body: &Value) -> String {
    body.get("errors")
        .and_then(Value::as_array)
        .and_then(|errors| errors.first())
        .and_then(|first| first.get("msg"))
        .and_then(Value::as_str)
        .or_else(|| body.get("message").and_then(Value::as_str))
        .unwrap_or_default()
        .to_string()
}

/// Decode the `data` member of a response envelope.
pub(crate) fn data<T: DeserializeOwned>(mut body: Value) -> Result<T, PortalError> {
    let data = body.get_mut("data").map_or(Value::Null, Value::take);
    Ok(serde_json::from_value(data)?)
}

/// Decode the whole envelope (for endpoints that put results at top level).
pub(crate) fn whole<T: DeserializeOwned>(body: Value) -> Result<T, PortalError> {
    Ok(serde_json::from_value(body)?)
}

/// The `message` of a successful response, if any.
pub(crate) fn message(body: &Value) -> Option<String> {
    body.get("message").and_then(Value::as_str).map(str::to_owned)
}

/// A file to send in a multipart form.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    #[must_use]
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// # Errors
    ///
    /// Returns a validation error when `mime` is not a valid media type.
    pub(crate) fn into_part(self) -> Result<Part, PortalError> {
        let mime = self.mime;
        Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&mime)
            .map_err(|_| PortalError::validation(format!("Unsupported file type {mime:?}.")))
    }
}

/// Accept an ID that may arrive as a JSON string or number.
pub(crate) fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(s)) if !s.is_empty() => Some(s),
        Some(Raw::Int(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Minimal user reference embedded in other records.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRef {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default, rename = "employeeId")]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub position: Option<PositionRef>,
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(default)]
    pub bank_account: Option<String>,
}

/// Position name embedded in other records.
#[derive(Debug, Clone, Deserialize)]
pub struct PositionRef {
    #[serde(rename = "positionName")]
    pub position_name: String,
}
