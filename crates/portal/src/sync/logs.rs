//! Audit log search with stale-response fencing.

use hris_core::Role;
use tracing::{instrument, warn};

use crate::api::ApiClient;
use crate::api::audit::AuditLog;
use crate::error::PortalError;
use crate::fence::Latest;

/// Search-as-you-type over the audit feed. Only the response to the most
/// recently issued query is ever shown.
#[derive(Debug)]
pub struct LogSearch {
    api: ApiClient,
    shown: Latest<(String, Vec<AuditLog>)>,
}

impl LogSearch {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self {
            api,
            shown: Latest::new(),
        }
    }

    /// Run a query. Returns whether its result is now displayed; `false`
    /// means a newer query was issued while this one was in flight.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails. A failed query leaves the
    /// previous result on display.
    #[instrument(skip(self))]
    pub async fn search(&self, role: Role, query: &str) -> Result<bool, PortalError> {
        let ticket = self.shown.issue();
        let logs = self.api.audit_logs(role, query).await.inspect_err(|e| {
            warn!(error = %e, "Audit search failed");
        })?;
        Ok(self.shown.apply(ticket, (query.to_string(), logs)))
    }

    /// Query and entries currently displayed.
    #[must_use]
    pub fn shown(&self) -> Option<(String, Vec<AuditLog>)> {
        self.shown.get()
    }
}
