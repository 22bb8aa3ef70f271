use std::sync::Arc;

use crate::application::ports::Authenticator;
use crate::application::services::{
    ChatService, CredentialsService, ReconciliationService, RecordingService,
    TranscriptionOrchestrator, UploadService,
};

#[derive(Clone)]
pub struct AppState {
    pub authenticator: Arc<dyn Authenticator>,
    pub recording_service: Arc<RecordingService>,
    pub chat_service: Arc<ChatService>,
    pub reconciliation_service: Arc<ReconciliationService>,
    pub upload_service: Arc<UploadService>,
    pub credentials_service: Arc<CredentialsService>,
    pub orchestrator: Arc<TranscriptionOrchestrator>,
    pub max_upload_bytes: usize,
}
