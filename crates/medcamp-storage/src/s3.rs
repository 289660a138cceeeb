use aws_sdk_s3::Client;
use tracing::debug;

use crate::error::StorageError;
use crate::objects;
use crate::store::{DocumentStore, StoredObject};

/// Document store backed by a single S3 bucket.
#[derive(Clone)]
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

impl DocumentStore for S3Store {
    async fn get(&self, key: &str) -> Result<StoredObject, StorageError> {
        debug!(bucket = %self.bucket, key, "get");
        let output = objects::get_object(&self.client, &self.bucket, key).await?;
        Ok(StoredObject {
            body: output.body,
            etag: output.etag.unwrap_or_default(),
        })
    }

    async fn put(&self, key: &str, body: Vec<u8>) -> Result<String, StorageError> {
        debug!(bucket = %self.bucket, key, "put");
        objects::put_object(&self.client, &self.bucket, key, body).await
    }

    async fn put_if_match(
        &self,
        key: &str,
        body: Vec<u8>,
        expected_etag: &str,
    ) -> Result<String, StorageError> {
        debug!(bucket = %self.bucket, key, etag = expected_etag, "put if match");
        objects::put_object_if_match(&self.client, &self.bucket, key, body, expected_etag).await
    }

    async fn put_if_absent(&self, key: &str, body: Vec<u8>) -> Result<String, StorageError> {
        debug!(bucket = %self.bucket, key, "put if absent");
        objects::put_object_if_none_match(&self.client, &self.bucket, key, body).await
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        debug!(bucket = %self.bucket, prefix, "list");
        objects::list_objects(&self.client, &self.bucket, prefix).await
    }
}
