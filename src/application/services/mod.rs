mod chat_service;
mod credentials_service;
mod reconciliation_service;
mod recording_service;
mod transcription_orchestrator;
mod upload_service;

pub use chat_service::{ChatError, ChatService, MessageAdded};
pub use credentials_service::{CredentialsError, CredentialsService};
pub use reconciliation_service::{
    ReconciliationError, ReconciliationReport, ReconciliationService,
};
pub use recording_service::{RecordingServiceError, RecordingService};
pub use transcription_orchestrator::{
    JobOutcome, OrchestratorError, RetryPolicy, TranscriptionOrchestrator, TranscriptionTask,
    TranscriptionTrigger,
};
pub use upload_service::{UploadError, UploadService, UploadedRecording};
