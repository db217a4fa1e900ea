use std::future::Future;

use crate::error::StorageError;

/// Key/value document store backing the requisition collection.
///
/// `disable_network` and `enable_network` toggle the store's connectivity.
/// While disabled every data operation fails with [`StorageError::Offline`].
pub trait DocumentStore: Send + Sync {
    fn get(&self, key: &str) -> impl Future<Output = Result<Vec<u8>, StorageError>> + Send;

    fn put(&self, key: &str, body: Vec<u8>) -> impl Future<Output = Result<(), StorageError>> + Send;

    fn delete(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Keys under `prefix`, in no particular order.
    fn list(&self, prefix: &str) -> impl Future<Output = Result<Vec<String>, StorageError>> + Send;

    fn disable_network(&self) -> impl Future<Output = Result<(), StorageError>> + Send;

    fn enable_network(&self) -> impl Future<Output = Result<(), StorageError>> + Send;
}
