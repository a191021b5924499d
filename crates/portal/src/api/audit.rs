//! `/audit` endpoints.

use chrono::{DateTime, Utc};
use hris_core::{AuditLogId, Role};
use serde::Deserialize;
use tracing::instrument;

use super::ApiClient;
use crate::error::PortalError;

#[derive(Debug, Clone, Deserialize)]
pub struct AuditLog {
    pub id: AuditLogId,
    pub action: String,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub user: Option<AuditActor>,
    #[serde(default)]
    pub company: Option<super::subscription::CompanyName>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuditActor {
    pub name: String,
    pub role: String,
}

/// Which audit feed a role reads.
#[must_use]
pub const fn audit_scope(role: Role) -> &'static str {
    match role {
        Role::SuperAdmin => "system",
        Role::Admin | Role::Employee => "me",
    }
}

impl ApiClient {
    /// Audit entries for the caller's scope, filtered by free text.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn audit_logs(&self, role: Role, search: &str) -> Result<Vec<AuditLog>, PortalError> {
        let path = format!("/audit/{}", audit_scope(role));
        self.get_query(&path, &[("search", search.to_string())])
            .await
    }
}
