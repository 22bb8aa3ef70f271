mod base_url_signer;
mod gcs_provider;
mod local_provider;
mod memory_provider;
mod object_store_storage;
mod storage_provider_factory;

pub use base_url_signer::BaseUrlSigner;
pub use gcs_provider::GcsStorageProvider;
pub use local_provider::LocalStorageProvider;
pub use memory_provider::InMemoryStorageProvider;
pub use object_store_storage::ObjectStoreAudioStorage;
pub use storage_provider_factory::StorageProviderFactory;
