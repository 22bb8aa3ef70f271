use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{CredentialsRepository, RepositoryError};
use crate::domain::{StorageCredentials, UserId};

#[derive(sqlx::FromRow)]
struct CredentialsRow {
    owner_id: Uuid,
    encoded_credentials: String,
    bucket: String,
    provider_api_key: String,
    updated_at: DateTime<Utc>,
}

impl From<CredentialsRow> for StorageCredentials {
    fn from(row: CredentialsRow) -> Self {
        StorageCredentials {
            owner_id: UserId::from_uuid(row.owner_id),
            encoded_credentials: row.encoded_credentials,
            bucket: row.bucket,
            provider_api_key: row.provider_api_key,
            updated_at: row.updated_at,
        }
    }
}

pub struct PgCredentialsRepository {
    pool: PgPool,
}

impl PgCredentialsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialsRepository for PgCredentialsRepository {
    #[instrument(skip(self), fields(owner_id = %owner_id))]
    async fn get(&self, owner_id: UserId) -> Result<Option<StorageCredentials>, RepositoryError> {
        let row = sqlx::query_as::<_, CredentialsRow>(
            r#"
            SELECT owner_id, encoded_credentials, bucket, provider_api_key, updated_at
            FROM storage_credentials
            WHERE owner_id = $1
            "#,
        )
        .bind(owner_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(row.map(StorageCredentials::from))
    }

    #[instrument(skip(self, credentials), fields(owner_id = %credentials.owner_id, bucket = %credentials.bucket))]
    async fn upsert(&self, credentials: &StorageCredentials) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO storage_credentials (owner_id, encoded_credentials, bucket, provider_api_key, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (owner_id) DO UPDATE
            SET encoded_credentials = EXCLUDED.encoded_credentials,
                bucket = EXCLUDED.bucket,
                provider_api_key = EXCLUDED.provider_api_key,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(credentials.owner_id.as_uuid())
        .bind(&credentials.encoded_credentials)
        .bind(&credentials.bucket)
        .bind(&credentials.provider_api_key)
        .bind(credentials.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }
}
