use std::time::Duration;

use labreq_audit::events::{AuditEvent, Diagnostic};
use labreq_core::models::requisition::Requisition;
use labreq_core::models::stored::{RequisitionUpdate, StoredRequisition};
use labreq_core::store_keys;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::StorageError;
use crate::store::DocumentStore;

/// Bounded retry applied to `create`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Wait after the first failed attempt; doubles after each further failure.
    pub base_delay: Duration,
    /// Pause between disabling and re-enabling connectivity after a
    /// network failure.
    pub network_pause: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
            network_pause: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Wait after failed attempt `attempt` (1-based): `base * 2^(attempt - 1)`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1 << exp)
    }
}

/// Just enough of a stored document to decide ownership.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Owner {
    user_id: String,
}

fn skipped(key: &str, reason: &str) {
    Diagnostic::DocumentSkipped {
        key: key.to_string(),
        reason: reason.to_string(),
    }
    .emit();
}

/// The requisition collection, one JSON document per record.
pub struct RequisitionRepository<S> {
    store: S,
    policy: RetryPolicy,
}

impl<S: DocumentStore> RequisitionRepository<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Persist a new draft owned by `user_id`.
    ///
    /// Each attempt re-enables connectivity, writes the document and reads it
    /// back. Network failures cycle connectivity before the backoff wait.
    /// One id is generated per call, so a retried write replaces rather than
    /// duplicates.
    pub async fn create(
        &self,
        user_id: &str,
        form_data: Requisition,
    ) -> Result<StoredRequisition, StorageError> {
        if user_id.trim().is_empty() {
            return Err(StorageError::MissingUserId);
        }

        let mut doc = StoredRequisition::draft(user_id, form_data);
        let max_attempts = self.policy.max_attempts.max(1);
        let mut last_error = String::new();

        for attempt in 1..=max_attempts {
            let now = jiff::Timestamp::now();
            doc.created_at = now;
            doc.updated_at = now;

            tracing::debug!(id = %doc.id, attempt, "creating requisition");
            match self.write_verified(&doc).await {
                Ok(stored) => {
                    AuditEvent::requisition("requisition.created", stored.id, &stored.user_id)
                        .with_details(serde_json::json!({ "attempts": attempt }))
                        .emit();
                    return Ok(stored);
                }
                Err(e) => {
                    last_error = e.to_string();
                    if e.is_network() {
                        self.cycle_network().await;
                    }
                    if attempt < max_attempts {
                        let delay = self.policy.backoff(attempt);
                        Diagnostic::RetryScheduled {
                            operation: "create".into(),
                            attempt,
                            max_attempts,
                            delay_ms: delay.as_millis() as u64,
                            error: last_error.clone(),
                        }
                        .emit();
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Diagnostic::AttemptsExhausted {
            operation: "create".into(),
            attempts: max_attempts,
            error: last_error.clone(),
        }
        .emit();

        Err(StorageError::RetriesExhausted {
            attempts: max_attempts,
            last_error,
        })
    }

    /// Fetch a record. Absent records are `None`, not an error.
    pub async fn get(&self, id: Uuid) -> Result<Option<StoredRequisition>, StorageError> {
        let key = store_keys::requisition(id);
        match self.store.get(&key).await {
            Ok(body) => Ok(Some(serde_json::from_slice(&body)?)),
            Err(StorageError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// All records owned by `user_id`, newest first.
    ///
    /// The owner is read before the full record, so a malformed document
    /// owned by someone else never fails the listing. Documents whose owner
    /// cannot be read are skipped with a diagnostic.
    pub async fn list(&self, user_id: &str) -> Result<Vec<StoredRequisition>, StorageError> {
        let keys = self.store.list(store_keys::REQUISITIONS_PREFIX).await?;

        let mut records = Vec::new();
        for key in &keys {
            if store_keys::requisition_id(key).is_none() {
                skipped(key, "not a requisition key");
                continue;
            }
            let body = match self.store.get(key).await {
                Ok(body) => body,
                // Deleted between list and get.
                Err(StorageError::NotFound { .. }) => continue,
                Err(e) => return Err(e),
            };
            let owner = match serde_json::from_slice::<Owner>(&body) {
                Ok(owner) => owner.user_id,
                Err(e) => {
                    skipped(key, &e.to_string());
                    continue;
                }
            };
            if owner != user_id {
                continue;
            }
            records.push(serde_json::from_slice::<StoredRequisition>(&body)?);
        }

        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        tracing::debug!(user_id, count = records.len(), "listed requisitions");
        Ok(records)
    }

    /// Merge `update` into an existing record and refresh `updated_at`.
    pub async fn update(
        &self,
        id: Uuid,
        update: RequisitionUpdate,
    ) -> Result<StoredRequisition, StorageError> {
        let key = store_keys::requisition(id);
        let mut record = self
            .get(id)
            .await?
            .ok_or_else(|| StorageError::NotFound { key: key.clone() })?;

        if let Some(patch) = &update.form_data {
            record.form_data.merge_value(patch);
        }
        if let Some(status) = update.status {
            record.status = status;
        }
        record.updated_at = jiff::Timestamp::now().max(record.created_at);

        self.store.put(&key, serde_json::to_vec(&record)?).await?;

        let stored = self.get(id).await?.ok_or(StorageError::NotFound { key })?;
        AuditEvent::requisition("requisition.updated", stored.id, &stored.user_id)
            .with_details(serde_json::json!({ "status": stored.status }))
            .emit();
        Ok(stored)
    }

    /// Remove a record. Fails with `NotFound` if it does not exist.
    pub async fn delete(&self, id: Uuid) -> Result<(), StorageError> {
        let key = store_keys::requisition(id);
        let record = self
            .get(id)
            .await?
            .ok_or_else(|| StorageError::NotFound { key: key.clone() })?;

        self.store.delete(&key).await?;
        AuditEvent::requisition("requisition.deleted", id, &record.user_id).emit();
        Ok(())
    }

    async fn write_verified(&self, doc: &StoredRequisition) -> Result<StoredRequisition, StorageError> {
        self.store.enable_network().await?;

        let key = store_keys::requisition(doc.id);
        self.store.put(&key, serde_json::to_vec(doc)?).await?;

        match self.store.get(&key).await {
            Ok(body) => Ok(serde_json::from_slice(&body)?),
            Err(StorageError::NotFound { .. }) => Err(StorageError::VerificationFailed { key }),
            Err(e) => Err(e),
        }
    }

    async fn cycle_network(&self) {
        if let Err(e) = self.store.disable_network().await {
            Diagnostic::NetworkToggleFailed {
                phase: "disable".into(),
                error: e.to_string(),
            }
            .emit();
        }
        tokio::time::sleep(self.policy.network_pause).await;
        if let Err(e) = self.store.enable_network().await {
            Diagnostic::NetworkToggleFailed {
                phase: "enable".into(),
                error: e.to_string(),
            }
            .emit();
        }
    }
}
