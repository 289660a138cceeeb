use medcamp_storage::client;
use medcamp_storage::error::StorageError;
use medcamp_storage::s3::S3Store;
use medcamp_storage::store::DocumentStore;

/// Exercises conditional writes against a real bucket.
///
/// Run with:
/// MEDCAMP_TEST_BUCKET=<bucket> cargo test -p medcamp-storage --test s3_store -- --ignored
#[tokio::test]
#[ignore]
async fn conditional_writes_against_s3() {
    let bucket = std::env::var("MEDCAMP_TEST_BUCKET").expect("MEDCAMP_TEST_BUCKET not set");
    let store = S3Store::new(client::build_client().await, bucket);

    let key = format!("_tests/{}", std::process::id());
    let etag = store.put_if_absent(&key, b"{\"n\":1}".to_vec()).await.unwrap();

    let err = store.put_if_absent(&key, b"{\"n\":2}".to_vec()).await.unwrap_err();
    assert!(matches!(err, StorageError::AlreadyExists { .. }));

    let next = store.put_if_match(&key, b"{\"n\":3}".to_vec(), &etag).await.unwrap();
    let err = store
        .put_if_match(&key, b"{\"n\":4}".to_vec(), &etag)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::PreconditionFailed { .. }));

    let object = store.get(&key).await.unwrap();
    assert_eq!(object.etag, next);
    assert_eq!(object.body, b"{\"n\":3}");
}
