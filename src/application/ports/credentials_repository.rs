use async_trait::async_trait;

use crate::domain::{StorageCredentials, UserId};

use super::RepositoryError;

#[async_trait]
pub trait CredentialsRepository: Send + Sync {
    async fn get(&self, owner_id: UserId) -> Result<Option<StorageCredentials>, RepositoryError>;

    /// Creates or overwrites the owner's single credentials record.
    async fn upsert(&self, credentials: &StorageCredentials) -> Result<(), RepositoryError>;
}
