use labreq_audit::events::Diagnostic;
use labreq_core::models::requisition::Requisition;
use labreq_core::models::stored::{RequisitionUpdate, StoredRequisition};
use labreq_core::schema::SectionId;
use labreq_storage::repository::RequisitionRepository;
use labreq_storage::store::DocumentStore;
use uuid::Uuid;

use crate::error::FormError;
use crate::steps::Step;
use crate::validate::{validate_all, validate_step};

/// Where the form is in its submission lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionStatus {
    Editing,
    Submitted(StoredRequisition),
    /// The last submission failed. The record stays editable.
    Failed(String),
}

/// Drives one requisition through the step sequence and submits it.
///
/// A controller owns a single record and is used by a single editor. The
/// acting user is supplied by the caller, never looked up.
pub struct FormController<'a, S> {
    repository: &'a RequisitionRepository<S>,
    user_id: Option<String>,
    record: Requisition,
    step: Step,
    status: SubmissionStatus,
    editing: Option<(Uuid, String)>,
}

impl<'a, S: DocumentStore> FormController<'a, S> {
    /// A blank form. Submission creates a new record.
    pub fn new(repository: &'a RequisitionRepository<S>, user_id: Option<String>) -> Self {
        Self {
            repository,
            user_id,
            record: Requisition::new(),
            step: Step::FIRST,
            status: SubmissionStatus::Editing,
            editing: None,
        }
    }

    /// A form pre-filled from an existing record. Submission updates it.
    pub fn edit(
        repository: &'a RequisitionRepository<S>,
        user_id: Option<String>,
        existing: &StoredRequisition,
    ) -> Self {
        Self {
            record: existing.form_data.clone(),
            editing: Some((existing.id, existing.user_id.clone())),
            ..Self::new(repository, user_id)
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn record(&self) -> &Requisition {
        &self.record
    }

    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    /// Replace the whole record, e.g. with one decoded from a request body.
    pub fn load(&mut self, record: Requisition) {
        self.record = record;
        self.touch();
    }

    pub fn set_flag(&mut self, section: SectionId, key: &str, value: bool) -> Result<(), FormError> {
        self.record.set_flag(section, key, value)?;
        self.touch();
        Ok(())
    }

    pub fn set_text(
        &mut self,
        section: SectionId,
        key: &str,
        value: impl Into<String>,
    ) -> Result<(), FormError> {
        self.record.set_text(section, key, value)?;
        self.touch();
        Ok(())
    }

    /// Move to the next step if the current one validates. On failure the
    /// step is unchanged and the validator's errors are returned. Advancing
    /// past the last step is a no-op.
    pub fn advance(&mut self) -> Result<Step, FormError> {
        let errors = validate_step(self.step, &self.record);
        if !errors.is_empty() {
            Diagnostic::StepRejected {
                step: self.step.title().to_string(),
                error_count: errors.len(),
            }
            .emit();
            return Err(FormError::Validation(errors));
        }
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        Ok(self.step)
    }

    /// Move back one step. Returns `false` on the first step.
    pub fn retreat(&mut self) -> bool {
        match self.step.prev() {
            Some(prev) => {
                self.step = prev;
                true
            }
            None => false,
        }
    }

    /// Validate every step and persist the record exactly once.
    ///
    /// No retry happens here; transient failures are retried inside the
    /// repository's `create`.
    pub async fn submit(&mut self) -> Result<StoredRequisition, FormError> {
        if matches!(self.status, SubmissionStatus::Submitted(_)) {
            return Err(FormError::AlreadySubmitted);
        }

        let errors = validate_all(&self.record);
        if !errors.is_empty() {
            return Err(FormError::Validation(errors));
        }

        let Some(user_id) = self.user_id.clone().filter(|u| !u.trim().is_empty()) else {
            self.status = SubmissionStatus::Failed(FormError::Unauthenticated.to_string());
            return Err(FormError::Unauthenticated);
        };

        let result = match &self.editing {
            Some((_, owner)) if *owner != user_id => {
                self.status = SubmissionStatus::Failed(FormError::NotOwner.to_string());
                return Err(FormError::NotOwner);
            }
            Some((id, _)) => {
                let update = RequisitionUpdate {
                    form_data: Some(self.record.to_value()),
                    status: None,
                };
                self.repository.update(*id, update).await
            }
            None => self.repository.create(&user_id, self.record.clone()).await,
        };

        match result {
            Ok(stored) => {
                tracing::info!(id = %stored.id, "requisition submitted");
                self.status = SubmissionStatus::Submitted(stored.clone());
                Ok(stored)
            }
            Err(e) => {
                self.status = SubmissionStatus::Failed(e.to_string());
                Err(FormError::Persistence(e))
            }
        }
    }

    fn touch(&mut self) {
        if matches!(self.status, SubmissionStatus::Failed(_)) {
            self.status = SubmissionStatus::Editing;
        }
    }
}
