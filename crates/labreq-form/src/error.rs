use labreq_core::error::CoreError;
use labreq_storage::error::StorageError;
use thiserror::Error;

use crate::validate::ValidationError;

#[derive(Debug, Error)]
pub enum FormError {
    #[error("{} validation error(s)", .0.len())]
    Validation(Vec<ValidationError>),

    #[error("You must be logged in to create a blood test")]
    Unauthenticated,

    #[error("requisition belongs to another user")]
    NotOwner,

    #[error("requisition has already been submitted")]
    AlreadySubmitted,

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("failed to save requisition: {0}")]
    Persistence(#[from] StorageError),
}
