use std::sync::Arc;

use futures::StreamExt;

use crate::application::ports::{
    AudioStorageError, AudioStorageProvider, CredentialsRepository, RecordingRepository,
    RepositoryError,
};
use crate::domain::{Recording, RecordingId, UserId};

use super::{TranscriptionOrchestrator, TranscriptionTask, TranscriptionTrigger};

/// Result of one bucket scan.
#[derive(Debug, Default)]
pub struct ReconciliationReport {
    /// Recordings created for objects that had none, in listing order.
    pub created: Vec<Recording>,
    /// Existing recordings still waiting for a transcript whose transcription was started again.
    pub retriggered: Vec<RecordingId>,
    pub tasks: Vec<TranscriptionTask>,
}

#[derive(Debug, thiserror::Error)]
pub enum ReconciliationError {
    #[error("no storage credentials for user {0}")]
    CredentialsNotFound(UserId),
    #[error("storage unavailable: {0}")]
    Storage(#[source] AudioStorageError),
    #[error("bucket listing failed after {} new recordings: {source}", .created.len())]
    StorageList {
        #[source]
        source: AudioStorageError,
        created: Vec<Recording>,
    },
    #[error("repository error: {source}")]
    Repository {
        #[source]
        source: RepositoryError,
        created: Vec<Recording>,
    },
}

impl ReconciliationError {
    /// Recordings that were created before the scan stopped. They are not rolled back.
    pub fn created(&self) -> &[Recording] {
        match self {
            ReconciliationError::StorageList { created, .. }
            | ReconciliationError::Repository { created, .. } => created,
            _ => &[],
        }
    }
}

/// Brings the record store in line with the contents of an owner's bucket.
pub struct ReconciliationService {
    recordings: Arc<dyn RecordingRepository>,
    credentials: Arc<dyn CredentialsRepository>,
    storage_provider: Arc<dyn AudioStorageProvider>,
    orchestrator: Arc<TranscriptionOrchestrator>,
}

impl ReconciliationService {
    pub fn new(
        recordings: Arc<dyn RecordingRepository>,
        credentials: Arc<dyn CredentialsRepository>,
        storage_provider: Arc<dyn AudioStorageProvider>,
        orchestrator: Arc<TranscriptionOrchestrator>,
    ) -> Self {
        Self {
            recordings,
            credentials,
            storage_provider,
            orchestrator,
        }
    }

    #[tracing::instrument(skip_all, fields(owner_id = %owner_id))]
    pub async fn reconcile(
        &self,
        owner_id: UserId,
    ) -> Result<ReconciliationReport, ReconciliationError> {
        let credentials = self
            .credentials
            .get(owner_id)
            .await
            .map_err(|source| ReconciliationError::Repository {
                source,
                created: Vec::new(),
            })?
            .ok_or(ReconciliationError::CredentialsNotFound(owner_id))?;

        let storage = self
            .storage_provider
            .open(&credentials)
            .map_err(ReconciliationError::Storage)?;

        let mut report = ReconciliationReport::default();
        let mut objects = storage.list();

        while let Some(item) = objects.next().await {
            let object = match item {
                Ok(object) => object,
                Err(source) => {
                    tracing::warn!(
                        error = %source,
                        created = report.created.len(),
                        "Bucket listing failed mid-scan"
                    );
                    return Err(ReconciliationError::StorageList {
                        source,
                        created: report.created,
                    });
                }
            };

            let existing = match self
                .recordings
                .find_by_audio_object_key(owner_id, &object.key)
                .await
            {
                Ok(existing) => existing,
                Err(source) => {
                    return Err(ReconciliationError::Repository {
                        source,
                        created: report.created,
                    });
                }
            };

            match existing {
                Some(recording) => {
                    if !recording.status.is_pending() {
                        continue;
                    }
                    tracing::debug!(
                        recording_id = %recording.id,
                        object_key = %object.key,
                        "Recording still pending, restarting transcription"
                    );
                    if let Some(task) = self.orchestrator.spawn(
                        recording.id,
                        credentials.clone(),
                        TranscriptionTrigger::BucketScan,
                    ) {
                        report.retriggered.push(recording.id);
                        report.tasks.push(task);
                    }
                }
                None => {
                    let mut recording = Recording::discovered(owner_id, &object);
                    match self.recordings.insert(&recording).await {
                        Ok(id) => recording.id = id,
                        Err(RepositoryError::ConstraintViolation(e)) => {
                            tracing::debug!(
                                object_key = %object.key,
                                error = %e,
                                "Object claimed by a concurrent scan"
                            );
                            continue;
                        }
                        Err(source) => {
                            return Err(ReconciliationError::Repository {
                                source,
                                created: report.created,
                            });
                        }
                    }

                    tracing::info!(
                        recording_id = %recording.id,
                        object_key = %object.key,
                        "Created recording for new bucket object"
                    );
                    if let Some(task) = self.orchestrator.spawn(
                        recording.id,
                        credentials.clone(),
                        TranscriptionTrigger::BucketScan,
                    ) {
                        report.tasks.push(task);
                    }
                    report.created.push(recording);
                }
            }
        }

        tracing::info!(
            created = report.created.len(),
            retriggered = report.retriggered.len(),
            "Bucket reconciliation finished"
        );
        Ok(report)
    }
}
