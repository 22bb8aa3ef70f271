use scribe_sync::application::ports::CredentialsRepository;
use scribe_sync::domain::{StorageCredentials, UserId};

use crate::helpers::TestPostgres;

#[tokio::test]
#[ignore = "requires docker"]
async fn given_no_credentials_when_getting_then_returns_none() {
    let pg = TestPostgres::new().await;

    let found = pg.credentials_repository.get(UserId::new()).await.unwrap();

    assert!(found.is_none());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_existing_credentials_when_upserting_then_record_is_overwritten() {
    let pg = TestPostgres::new().await;
    let owner = UserId::new();
    let first = StorageCredentials::new(
        owner,
        "e30=".to_string(),
        "old-bucket".to_string(),
        "key-1".to_string(),
    );
    let second = StorageCredentials::new(
        owner,
        "eyJhIjoxfQ==".to_string(),
        "new-bucket".to_string(),
        "key-2".to_string(),
    );

    pg.credentials_repository.upsert(&first).await.unwrap();
    pg.credentials_repository.upsert(&second).await.unwrap();

    let stored = pg.credentials_repository.get(owner).await.unwrap().unwrap();
    assert_eq!(stored.owner_id, owner);
    assert_eq!(stored.encoded_credentials, "eyJhIjoxfQ==");
    assert_eq!(stored.bucket, "new-bucket");
    assert_eq!(stored.provider_api_key, "key-2");

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM storage_credentials")
        .fetch_one(&pg.pool)
        .await
        .unwrap();
    assert_eq!(rows, 1);
}
