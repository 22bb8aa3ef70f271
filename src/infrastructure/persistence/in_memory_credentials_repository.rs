use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::{CredentialsRepository, RepositoryError};
use crate::domain::{StorageCredentials, UserId};

#[derive(Default)]
pub struct InMemoryCredentialsRepository {
    credentials: RwLock<HashMap<UserId, StorageCredentials>>,
}

impl InMemoryCredentialsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialsRepository for InMemoryCredentialsRepository {
    async fn get(&self, owner_id: UserId) -> Result<Option<StorageCredentials>, RepositoryError> {
        Ok(self.credentials.read().await.get(&owner_id).cloned())
    }

    async fn upsert(&self, credentials: &StorageCredentials) -> Result<(), RepositoryError> {
        self.credentials
            .write()
            .await
            .insert(credentials.owner_id, credentials.clone());
        Ok(())
    }
}
