use std::collections::BTreeMap;

use tokio::sync::RwLock;
use tracing::debug;

use crate::error::StorageError;
use crate::store::{DocumentStore, StoredObject};

/// In-process document store with the same conditional-write semantics as
/// [`crate::s3::S3Store`]. ETags are a per-store version counter.
///
/// Writes under a prefix registered with [`InMemoryStore::fail_writes_under`]
/// are rejected, which lets tests exercise partial-write paths.
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    objects: BTreeMap<String, StoredObject>,
    version: u64,
    failing_prefixes: Vec<String>,
}

impl Inner {
    fn check_writable(&self, key: &str) -> Result<(), StorageError> {
        if self.failing_prefixes.iter().any(|p| key.starts_with(p.as_str())) {
            return Err(StorageError::PutObject(format!("injected failure for {key}")));
        }
        Ok(())
    }

    fn write(&mut self, key: &str, body: Vec<u8>) -> String {
        self.version += 1;
        let etag = format!("\"v{}\"", self.version);
        self.objects.insert(
            key.to_string(),
            StoredObject {
                body,
                etag: etag.clone(),
            },
        );
        etag
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every subsequent write whose key starts with `prefix`.
    pub async fn fail_writes_under(&self, prefix: impl Into<String>) {
        self.inner.write().await.failing_prefixes.push(prefix.into());
    }

    pub async fn clear_failures(&self) {
        self.inner.write().await.failing_prefixes.clear();
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.inner.read().await.objects.contains_key(key)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.objects.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.objects.is_empty()
    }
}

impl DocumentStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<StoredObject, StorageError> {
        debug!(key, "get");
        self.inner
            .read()
            .await
            .objects
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                key: key.to_string(),
            })
    }

    async fn put(&self, key: &str, body: Vec<u8>) -> Result<String, StorageError> {
        debug!(key, "put");
        let mut inner = self.inner.write().await;
        inner.check_writable(key)?;
        Ok(inner.write(key, body))
    }

    async fn put_if_match(
        &self,
        key: &str,
        body: Vec<u8>,
        expected_etag: &str,
    ) -> Result<String, StorageError> {
        debug!(key, etag = expected_etag, "put if match");
        let mut inner = self.inner.write().await;
        inner.check_writable(key)?;
        match inner.objects.get(key) {
            Some(current) if current.etag == expected_etag => Ok(inner.write(key, body)),
            _ => Err(StorageError::PreconditionFailed {
                key: key.to_string(),
            }),
        }
    }

    async fn put_if_absent(&self, key: &str, body: Vec<u8>) -> Result<String, StorageError> {
        debug!(key, "put if absent");
        let mut inner = self.inner.write().await;
        inner.check_writable(key)?;
        if inner.objects.contains_key(key) {
            return Err(StorageError::AlreadyExists {
                key: key.to_string(),
            });
        }
        Ok(inner.write(key, body))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        debug!(prefix, "list");
        Ok(self
            .inner
            .read()
            .await
            .objects
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect())
    }
}
