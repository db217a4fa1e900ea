use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object not found: {key}")]
    NotFound { key: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("S3 GetObject error: {0}")]
    GetObject(String),

    #[error("S3 PutObject error: {0}")]
    PutObject(String),

    #[error("S3 DeleteObject error: {0}")]
    DeleteObject(String),

    #[error("S3 ListObjects error: {0}")]
    ListObjects(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("network unavailable: store is offline")]
    Offline,

    #[error("user id is required")]
    MissingUserId,

    #[error("failed to verify document creation: {key}")]
    VerificationFailed { key: String },

    #[error("failed to create requisition after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },

    #[error("AWS config error: {0}")]
    Config(String),
}

impl StorageError {
    /// Connectivity failures. These trigger a disable/enable cycle of the
    /// store's network before the next attempt.
    pub fn is_network(&self) -> bool {
        matches!(self, StorageError::Offline | StorageError::Network(_))
            || self.to_string().to_lowercase().contains("network")
    }
}
