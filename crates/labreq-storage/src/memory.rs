use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use tokio::sync::Mutex;

use crate::error::StorageError;
use crate::store::DocumentStore;

/// A scripted fault applied to the next `put`.
#[derive(Debug, Clone)]
pub enum PutFault {
    /// Fail the write with this message.
    Fail(String),
    /// Accept the write but never persist it.
    Lose,
}

/// Process-local document store.
///
/// Used by the API when no bucket is configured and by tests. Faults can be
/// queued to exercise the retry path, and connectivity toggles are counted.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
    faults: Mutex<VecDeque<PutFault>>,
    offline: AtomicBool,
    puts: AtomicU32,
    disables: AtomicU32,
    enables: AtomicU32,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a failure for the next `put`. Faults are consumed in order.
    pub async fn fail_next_put(&self, message: impl Into<String>) {
        self.faults
            .lock()
            .await
            .push_back(PutFault::Fail(message.into()));
    }

    /// Queue a write that reports success but is not stored.
    pub async fn lose_next_put(&self) {
        self.faults.lock().await.push_back(PutFault::Lose);
    }

    /// Store raw bytes under `key`, bypassing faults.
    pub async fn insert_raw(&self, key: impl Into<String>, body: Vec<u8>) {
        self.objects.lock().await.insert(key.into(), body);
    }

    pub async fn len(&self) -> usize {
        self.objects.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.lock().await.is_empty()
    }

    pub fn is_online(&self) -> bool {
        !self.offline.load(Ordering::SeqCst)
    }

    /// Number of `put` calls made, including failed ones.
    pub fn put_calls(&self) -> u32 {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn network_disables(&self) -> u32 {
        self.disables.load(Ordering::SeqCst)
    }

    pub fn network_enables(&self) -> u32 {
        self.enables.load(Ordering::SeqCst)
    }

    fn ensure_online(&self) -> Result<(), StorageError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StorageError::Offline);
        }
        Ok(())
    }
}

impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        self.ensure_online()?;
        self.objects
            .lock()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                key: key.to_string(),
            })
    }

    async fn put(&self, key: &str, body: Vec<u8>) -> Result<(), StorageError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.ensure_online()?;
        let fault = self.faults.lock().await.pop_front();
        match fault {
            Some(PutFault::Fail(message)) => Err(StorageError::PutObject(message)),
            Some(PutFault::Lose) => Ok(()),
            None => {
                self.objects.lock().await.insert(key.to_string(), body);
                Ok(())
            }
        }
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.ensure_online()?;
        self.objects.lock().await.remove(key);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        self.ensure_online()?;
        Ok(self
            .objects
            .lock()
            .await
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn disable_network(&self) -> Result<(), StorageError> {
        self.disables.fetch_add(1, Ordering::SeqCst);
        self.offline.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn enable_network(&self) -> Result<(), StorageError> {
        self.enables.fetch_add(1, Ordering::SeqCst);
        self.offline.store(false, Ordering::SeqCst);
        Ok(())
    }
}
