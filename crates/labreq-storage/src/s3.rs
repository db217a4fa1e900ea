use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use aws_sdk_s3::Client;

use crate::error::StorageError;
use crate::objects;
use crate::store::DocumentStore;

/// S3-backed document store. One JSON object per document.
pub struct S3DocumentStore {
    client: RwLock<Client>,
    bucket: String,
    online: AtomicBool,
}

impl S3DocumentStore {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client: RwLock::new(client),
            bucket: bucket.into(),
            online: AtomicBool::new(true),
        }
    }

    fn client(&self) -> Result<Client, StorageError> {
        if !self.online.load(Ordering::SeqCst) {
            return Err(StorageError::Offline);
        }
        self.client
            .read()
            .map(|c| c.clone())
            .map_err(|e| StorageError::Config(format!("client lock poisoned: {e}")))
    }
}

impl DocumentStore for S3DocumentStore {
    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let client = self.client()?;
        objects::get_object(&client, &self.bucket, key).await
    }

    async fn put(&self, key: &str, body: Vec<u8>) -> Result<(), StorageError> {
        let client = self.client()?;
        objects::put_json(&client, &self.bucket, key, body).await
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let client = self.client()?;
        objects::delete_object(&client, &self.bucket, key).await
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let client = self.client()?;
        objects::list_objects(&client, &self.bucket, prefix).await
    }

    async fn disable_network(&self) -> Result<(), StorageError> {
        self.online.store(false, Ordering::SeqCst);
        tracing::debug!(bucket = %self.bucket, "s3 store offline");
        Ok(())
    }

    /// Re-enable the store. Coming back from offline rebuilds the client from
    /// its own config.
    async fn enable_network(&self) -> Result<(), StorageError> {
        if self.online.load(Ordering::SeqCst) {
            return Ok(());
        }
        {
            let mut guard = self
                .client
                .write()
                .map_err(|e| StorageError::Config(format!("client lock poisoned: {e}")))?;
            let config = guard.config().to_builder().build();
            *guard = Client::from_conf(config);
        }
        self.online.store(true, Ordering::SeqCst);
        tracing::debug!(bucket = %self.bucket, "s3 store online");
        Ok(())
    }
}
