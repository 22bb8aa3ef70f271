mod audio_storage;
mod authenticator;
mod credentials_repository;
mod recording_repository;
mod repository_error;
mod transcription_client;

pub use audio_storage::{AudioStorage, AudioStorageError, AudioStorageProvider};
pub use authenticator::{AuthError, Authenticator};
pub use credentials_repository::CredentialsRepository;
pub use recording_repository::RecordingRepository;
pub use repository_error::RepositoryError;
pub use transcription_client::{ProviderError, ProviderPhase, TranscriptionClient};
