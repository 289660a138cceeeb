use std::future::Future;

use crate::error::StorageError;

/// An object read from the store, with the ETag to condition the next write on.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub etag: String,
}

/// Key/value document store with conditional writes.
///
/// Implementations must make `put_if_match` and `put_if_absent` atomic with
/// respect to other writers of the same key. That is the only concurrency
/// guarantee the lifecycle engine relies on.
pub trait DocumentStore: Send + Sync {
    /// Read an object. `StorageError::NotFound` if the key does not exist.
    fn get(&self, key: &str) -> impl Future<Output = Result<StoredObject, StorageError>> + Send;

    /// Unconditional upsert. Returns the new ETag.
    fn put(
        &self,
        key: &str,
        body: Vec<u8>,
    ) -> impl Future<Output = Result<String, StorageError>> + Send;

    /// Compare-and-swap: write only if the current ETag equals `expected_etag`.
    /// `StorageError::PreconditionFailed` otherwise.
    fn put_if_match(
        &self,
        key: &str,
        body: Vec<u8>,
        expected_etag: &str,
    ) -> impl Future<Output = Result<String, StorageError>> + Send;

    /// Create-only write. `StorageError::AlreadyExists` if the key exists.
    fn put_if_absent(
        &self,
        key: &str,
        body: Vec<u8>,
    ) -> impl Future<Output = Result<String, StorageError>> + Send;

    /// All keys under a prefix, in lexicographic order.
    fn list(&self, prefix: &str) -> impl Future<Output = Result<Vec<String>, StorageError>> + Send;
}
