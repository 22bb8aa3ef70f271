mod in_memory_credentials_repository;
mod in_memory_recording_repository;
mod pg_credentials_repository;
mod pg_pool;
mod pg_recording_repository;

pub use in_memory_credentials_repository::InMemoryCredentialsRepository;
pub use in_memory_recording_repository::InMemoryRecordingRepository;
pub use pg_credentials_repository::PgCredentialsRepository;
pub use pg_recording_repository::PgRecordingRepository;

pub use pg_pool::{create_pool, run_migrations};
