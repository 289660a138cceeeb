use serde::{Serialize, de::DeserializeOwned};

use crate::error::StorageError;
use crate::store::DocumentStore;

/// Load a JSON document. Returns the deserialized value and its ETag.
pub async fn load_json<T: DeserializeOwned, S: DocumentStore>(
    store: &S,
    key: &str,
) -> Result<(T, String), StorageError> {
    let object = store.get(key).await?;
    let value: T = serde_json::from_slice(&object.body)?;
    Ok((value, object.etag))
}

/// Like [`load_json`], but a missing key is `Ok(None)`.
pub async fn try_load_json<T: DeserializeOwned, S: DocumentStore>(
    store: &S,
    key: &str,
) -> Result<Option<(T, String)>, StorageError> {
    match load_json(store, key).await {
        Ok(found) => Ok(Some(found)),
        Err(StorageError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Load every document under `prefix`. Returns `(key, value)` pairs in key order.
pub async fn load_all_json<T: DeserializeOwned, S: DocumentStore>(
    store: &S,
    prefix: &str,
) -> Result<Vec<(String, T)>, StorageError> {
    let keys = store.list(prefix).await?;

    let mut documents = Vec::with_capacity(keys.len());
    for key in keys {
        let object = store.get(&key).await?;
        let value: T = serde_json::from_slice(&object.body)?;
        documents.push((key, value));
    }

    Ok(documents)
}

/// Save a JSON document unconditionally. Returns the new ETag.
pub async fn save_json<T: Serialize, S: DocumentStore>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<String, StorageError> {
    let body = serde_json::to_vec(value)?;
    store.put(key, body).await
}

/// Save a JSON document with ETag optimistic locking.
pub async fn save_json_if_match<T: Serialize, S: DocumentStore>(
    store: &S,
    key: &str,
    value: &T,
    expected_etag: &str,
) -> Result<String, StorageError> {
    let body = serde_json::to_vec(value)?;
    store.put_if_match(key, body, expected_etag).await
}

/// Create a JSON document. Fails with `AlreadyExists` if the key is taken.
pub async fn create_json<T: Serialize, S: DocumentStore>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<String, StorageError> {
    let body = serde_json::to_vec(value)?;
    store.put_if_absent(key, body).await
}
