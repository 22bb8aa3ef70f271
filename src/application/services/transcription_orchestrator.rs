use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashSet;
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::application::ports::{
    AudioStorageError, AudioStorageProvider, RecordingRepository, RepositoryError,
    TranscriptionClient,
};
use crate::domain::{
    RecordingId, StorageCredentials, TranscriptionStatus, TranscriptionUpdate,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_step: Duration,
    pub signed_url_ttl: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_step: Duration::from_secs(5),
            signed_url_ttl: Duration::from_secs(15 * 60),
        }
    }
}

impl RetryPolicy {
    /// Delay before the attempt that follows `attempt` (1-based): linear in the attempt number.
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        self.backoff_step * attempt
    }
}

/// What caused a transcription run. Only used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptionTrigger {
    Upload,
    BucketScan,
    FirstMessage,
}

impl TranscriptionTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranscriptionTrigger::Upload => "upload",
            TranscriptionTrigger::BucketScan => "bucket_scan",
            TranscriptionTrigger::FirstMessage => "first_message",
        }
    }
}

impl fmt::Display for TranscriptionTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error("recording {0} no longer exists")]
    RecordingVanished(RecordingId),
    #[error("recording {0} has no audio reference")]
    MissingAudio(RecordingId),
    #[error("signing failed: {0}")]
    Signing(#[source] AudioStorageError),
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
    #[error("transcription task did not finish: {0}")]
    TaskFailed(String),
}

#[derive(Debug)]
pub enum JobOutcome {
    Completed { attempts: u32 },
    Failed { attempts: u32 },
    /// The recording already held a terminal result when the run started; nothing was written.
    Skipped(TranscriptionStatus),
    Aborted(OrchestratorError),
}

impl JobOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, JobOutcome::Completed { .. })
    }
}

/// Handle to a background transcription run. Dropping it detaches the run.
pub struct TranscriptionTask {
    recording_id: RecordingId,
    handle: JoinHandle<JobOutcome>,
}

impl TranscriptionTask {
    pub fn recording_id(&self) -> RecordingId {
        self.recording_id
    }

    pub async fn wait(self) -> JobOutcome {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(e) => JobOutcome::Aborted(OrchestratorError::TaskFailed(e.to_string())),
        }
    }
}

impl fmt::Debug for TranscriptionTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranscriptionTask")
            .field("recording_id", &self.recording_id)
            .finish_non_exhaustive()
    }
}

struct InFlightGuard {
    in_flight: Arc<DashSet<RecordingId>>,
    recording_id: RecordingId,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.in_flight.remove(&self.recording_id);
    }
}

/// Drives one recording from "audio available" to a terminal transcription state.
///
/// Runs are detached tokio tasks. Each run re-reads the recording on every attempt, signs a fresh
/// URL for the audio object and hands it to the provider. Provider failures are retried with a
/// linear backoff and end in the `Failed` sentinel state; they never reach the caller.
///
/// With `single_flight` on, a second trigger for a recording that is already being transcribed is
/// dropped. With it off, concurrent runs race and the last terminal write wins.
pub struct TranscriptionOrchestrator {
    recordings: Arc<dyn RecordingRepository>,
    storage_provider: Arc<dyn AudioStorageProvider>,
    client: Arc<dyn TranscriptionClient>,
    policy: RetryPolicy,
    single_flight: bool,
    in_flight: Arc<DashSet<RecordingId>>,
}

impl TranscriptionOrchestrator {
    pub fn new(
        recordings: Arc<dyn RecordingRepository>,
        storage_provider: Arc<dyn AudioStorageProvider>,
        client: Arc<dyn TranscriptionClient>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            recordings,
            storage_provider,
            client,
            policy,
            single_flight: true,
            in_flight: Arc::new(DashSet::new()),
        }
    }

    pub fn with_single_flight(mut self, enabled: bool) -> Self {
        self.single_flight = enabled;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn is_in_flight(&self, recording_id: RecordingId) -> bool {
        self.in_flight.contains(&recording_id)
    }

    /// Runs currently holding the single-flight guard. Always zero with the guard off.
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Starts a background run. Returns `None` when the single-flight guard skipped the trigger.
    pub fn spawn(
        self: &Arc<Self>,
        recording_id: RecordingId,
        credentials: StorageCredentials,
        trigger: TranscriptionTrigger,
    ) -> Option<TranscriptionTask> {
        let guard = if self.single_flight {
            if !self.in_flight.insert(recording_id) {
                tracing::info!(
                    recording_id = %recording_id,
                    trigger = %trigger,
                    "Transcription already in flight, skipping trigger"
                );
                return None;
            }
            Some(InFlightGuard {
                in_flight: Arc::clone(&self.in_flight),
                recording_id,
            })
        } else {
            None
        };

        let span = tracing::info_span!(
            "transcription",
            recording_id = %recording_id,
            owner_id = %credentials.owner_id,
            trigger = %trigger,
        );
        let orchestrator = Arc::clone(self);

        let handle = tokio::spawn(
            async move {
                let _guard = guard;
                let outcome = orchestrator.run(recording_id, &credentials).await;
                match &outcome {
                    JobOutcome::Completed { attempts } => {
                        tracing::info!(attempts, "Transcription completed");
                    }
                    JobOutcome::Failed { attempts } => {
                        tracing::error!(attempts, "Transcription failed after all attempts");
                    }
                    JobOutcome::Skipped(status) => {
                        tracing::info!(
                            status = %status,
                            "Recording already transcribed, run skipped"
                        );
                    }
                    JobOutcome::Aborted(e) => {
                        tracing::error!(error = %e, "Transcription aborted");
                    }
                }
                outcome
            }
            .instrument(span),
        );

        Some(TranscriptionTask {
            recording_id,
            handle,
        })
    }

    /// One full transcription cycle, awaited inline.
    pub async fn run(
        &self,
        recording_id: RecordingId,
        credentials: &StorageCredentials,
    ) -> JobOutcome {
        let storage = match self.storage_provider.open(credentials) {
            Ok(storage) => storage,
            Err(e) => return JobOutcome::Aborted(OrchestratorError::Signing(e)),
        };
        let max_attempts = self.policy.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            let recording = match self
                .recordings
                .find_by_id(recording_id, credentials.owner_id)
                .await
            {
                Ok(Some(recording)) => recording,
                Ok(None) => {
                    return JobOutcome::Aborted(OrchestratorError::RecordingVanished(
                        recording_id,
                    ));
                }
                Err(e) => return JobOutcome::Aborted(OrchestratorError::Repository(e)),
            };

            if attempt == 1 && recording.status.is_terminal() {
                return JobOutcome::Skipped(recording.status);
            }

            let Some(key) = recording.audio_key().cloned() else {
                return JobOutcome::Aborted(OrchestratorError::MissingAudio(recording_id));
            };

            if attempt == 1 && recording.status == TranscriptionStatus::NotStarted {
                if let Err(e) = self
                    .persist(recording_id, TranscriptionUpdate::processing())
                    .await
                {
                    return JobOutcome::Aborted(e);
                }
            }

            let audio_url = match storage
                .signed_read_url(&key, self.policy.signed_url_ttl)
                .await
            {
                Ok(url) => url,
                Err(e) => return JobOutcome::Aborted(OrchestratorError::Signing(e)),
            };

            tracing::debug!(attempt, object_key = %key, "Submitting audio to transcription provider");

            match self
                .client
                .submit_and_await(&audio_url, &credentials.provider_api_key)
                .await
            {
                Ok(outcome) => {
                    tracing::debug!(
                        attempt,
                        sentences = outcome.sentences.len(),
                        action_items = outcome.action_items.len(),
                        "Transcription provider finished"
                    );
                    return match self
                        .persist(recording_id, TranscriptionUpdate::completed(outcome))
                        .await
                    {
                        Ok(()) => JobOutcome::Completed { attempts: attempt },
                        Err(e) => JobOutcome::Aborted(e),
                    };
                }
                Err(e) => {
                    tracing::warn!(
                        attempt,
                        max_attempts,
                        phase = %e.phase,
                        error = %e.message,
                        "Transcription attempt failed"
                    );
                    if attempt < max_attempts {
                        tokio::time::sleep(self.policy.backoff_after(attempt)).await;
                    }
                }
            }
        }

        match self
            .persist(recording_id, TranscriptionUpdate::failed())
            .await
        {
            Ok(()) => JobOutcome::Failed {
                attempts: max_attempts,
            },
            Err(e) => JobOutcome::Aborted(e),
        }
    }

    async fn persist(
        &self,
        recording_id: RecordingId,
        update: TranscriptionUpdate,
    ) -> Result<(), OrchestratorError> {
        self.recordings
            .update_transcription_result(recording_id, &update)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    status = %update.status,
                    "Failed to persist transcription state"
                );
                OrchestratorError::Repository(e)
            })
    }
}
