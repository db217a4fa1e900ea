use serde::Serialize;
use tracing::{info, warn};

/// A structured audit event for a user-visible action on a requisition.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub action: String,
    pub resource_type: String,
    pub resource_id: String,
    pub user_id: String,
    pub details: Option<serde_json::Value>,
}

impl AuditEvent {
    pub fn new(
        action: impl Into<String>,
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            action: action.into(),
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
            user_id: user_id.into(),
            details: None,
        }
    }

    /// Shorthand for an event on a requisition document.
    pub fn requisition(
        action: impl Into<String>,
        resource_id: impl ToString,
        user_id: impl Into<String>,
    ) -> Self {
        Self::new(action, "requisition", resource_id.to_string(), user_id)
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Emit this audit event via tracing.
    pub fn emit(&self) {
        let details = self
            .details
            .as_ref()
            .map(|d| d.to_string())
            .unwrap_or_default();
        info!(
            audit.action = %self.action,
            audit.resource_type = %self.resource_type,
            audit.resource_id = %self.resource_id,
            audit.user_id = %self.user_id,
            audit.details = %details,
            "audit event"
        );
    }
}

/// Operational diagnostics that are not tied to a completed action.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A persistence attempt failed and another will follow.
    RetryScheduled {
        operation: String,
        attempt: u32,
        max_attempts: u32,
        delay_ms: u64,
        error: String,
    },
    /// All persistence attempts failed.
    AttemptsExhausted {
        operation: String,
        attempts: u32,
        error: String,
    },
    /// Best-effort connectivity toggle failed.
    NetworkToggleFailed { phase: String, error: String },
    /// A form step refused to advance.
    StepRejected { step: String, error_count: usize },
    /// A stored document was left out of a listing.
    DocumentSkipped { key: String, reason: String },
}

impl Diagnostic {
    pub fn emit(&self) {
        match self {
            Diagnostic::RetryScheduled {
                operation,
                attempt,
                max_attempts,
                delay_ms,
                error,
            } => warn!(
                diag.kind = "retry_scheduled",
                operation = %operation,
                attempt,
                max_attempts,
                delay_ms,
                error = %error,
                "persistence attempt failed, retrying"
            ),
            Diagnostic::AttemptsExhausted {
                operation,
                attempts,
                error,
            } => warn!(
                diag.kind = "attempts_exhausted",
                operation = %operation,
                attempts,
                error = %error,
                "persistence attempts exhausted"
            ),
            Diagnostic::NetworkToggleFailed { phase, error } => warn!(
                diag.kind = "network_toggle_failed",
                phase = %phase,
                error = %error,
                "connectivity toggle failed"
            ),
            Diagnostic::StepRejected { step, error_count } => info!(
                diag.kind = "step_rejected",
                step = %step,
                error_count,
                "form step rejected"
            ),
            Diagnostic::DocumentSkipped { key, reason } => warn!(
                diag.kind = "document_skipped",
                key = %key,
                reason = %reason,
                "stored document skipped"
            ),
        }
    }
}
