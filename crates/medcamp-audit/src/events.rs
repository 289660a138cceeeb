use std::fmt;

use serde::Serialize;
use tracing::info;

/// One state transition, attributed to the principal that made it.
///
/// Action and resource names come from [`crate::actions`]. Events go to the
/// structured log stream next to the request log; nothing is persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    pub action: &'static str,
    pub resource_type: &'static str,
    pub resource_id: String,
    /// Email of the acting principal.
    pub actor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AuditEvent {
    pub fn new(
        action: &'static str,
        resource_type: &'static str,
        resource_id: impl Into<String>,
        actor: impl Into<String>,
    ) -> Self {
        Self {
            action,
            resource_type,
            resource_id: resource_id.into(),
            actor: actor.into(),
            details: None,
        }
    }

    /// Attach transition details. `null` leaves the event without details.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = (!details.is_null()).then_some(details);
        self
    }

    pub fn emit(&self) {
        match &self.details {
            Some(details) => info!(
                audit.action = self.action,
                audit.resource = %self,
                audit.actor = %self.actor,
                audit.details = %details,
                "audit event"
            ),
            None => info!(
                audit.action = self.action,
                audit.resource = %self,
                audit.actor = %self.actor,
                "audit event"
            ),
        }
    }
}

/// `<resource_type>/<resource_id>`
impl fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.resource_type, self.resource_id)
    }
}
