use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;

use scribe_sync::application::ports::RecordingRepository;
use scribe_sync::application::services::{
    JobOutcome, OrchestratorError, RetryPolicy, TranscriptionOrchestrator, TranscriptionTrigger,
};
use scribe_sync::domain::transcription_status::{
    FAILED_ACTION_ITEMS_SENTINEL, FAILED_SUMMARY_SENTINEL, FAILED_TRANSCRIPT_SENTINEL,
    PROCESSING_SENTINEL,
};
use scribe_sync::domain::{
    AudioReference, ObjectKey, Recording, RecordingId, TranscriptionStatus, TranscriptionUpdate,
    UserId,
};
use scribe_sync::infrastructure::persistence::InMemoryRecordingRepository;

use crate::fakes::{
    FakeBucket, FakeStorageProvider, FakeTranscriptionClient, TEST_API_KEY, credentials_for,
    orchestrator, sample_outcome, stored_object,
};

async fn seed_discovered(repo: &InMemoryRecordingRepository, owner: UserId) -> Recording {
    let recording = Recording::discovered(owner, &stored_object("standup.mp3"));
    repo.insert(&recording).await.unwrap();
    recording
}

#[test]
fn given_default_policy_when_computing_backoff_then_delay_grows_linearly_with_attempt() {
    let policy = RetryPolicy::default();

    assert_eq!(policy.max_attempts, 3);
    assert_eq!(policy.backoff_after(1), Duration::from_secs(5));
    assert_eq!(policy.backoff_after(2), Duration::from_secs(10));
}

#[tokio::test(start_paused = true)]
async fn given_provider_always_failing_when_running_then_three_attempts_end_in_failed_sentinels() {
    let owner = UserId::new();
    let repo = Arc::new(InMemoryRecordingRepository::new());
    let recording = seed_discovered(&repo, owner).await;
    let client = Arc::new(FakeTranscriptionClient::always_failing());
    let storage = Arc::new(FakeStorageProvider::new(FakeBucket::default()));
    let orchestrator = orchestrator(repo.clone(), storage, client.clone());

    let outcome = orchestrator
        .run(recording.id, &credentials_for(owner))
        .await;

    assert!(
        matches!(outcome, JobOutcome::Failed { attempts: 3 }),
        "expected Failed after 3 attempts but got: {:?}",
        outcome
    );

    let calls = client.call_instants();
    assert_eq!(calls.len(), 3);
    let first_gap = calls[1] - calls[0];
    let second_gap = calls[2] - calls[1];
    assert!(first_gap >= Duration::from_secs(5) && first_gap < Duration::from_secs(6));
    assert!(second_gap >= Duration::from_secs(10) && second_gap < Duration::from_secs(11));

    let stored = repo.find_by_id(recording.id, owner).await.unwrap().unwrap();
    assert_eq!(stored.status, TranscriptionStatus::Failed);
    assert_eq!(stored.transcript.len(), 1);
    assert_eq!(stored.transcript[0].text, FAILED_TRANSCRIPT_SENTINEL);
    assert_eq!(stored.summary, FAILED_SUMMARY_SENTINEL);
    assert_eq!(stored.action_items, vec![FAILED_ACTION_ITEMS_SENTINEL.to_string()]);
}

#[tokio::test(start_paused = true)]
async fn given_provider_failing_twice_when_running_then_third_attempt_completes() {
    let owner = UserId::new();
    let repo = Arc::new(InMemoryRecordingRepository::new());
    let recording = seed_discovered(&repo, owner).await;
    let client = Arc::new(FakeTranscriptionClient::failing_times(2));
    let storage = Arc::new(FakeStorageProvider::new(FakeBucket::default()));
    let orchestrator = orchestrator(repo.clone(), storage, client.clone());

    let outcome = orchestrator
        .run(recording.id, &credentials_for(owner))
        .await;

    assert!(matches!(outcome, JobOutcome::Completed { attempts: 3 }));
    let stored = repo.find_by_id(recording.id, owner).await.unwrap().unwrap();
    let expected = sample_outcome();
    assert_eq!(stored.status, TranscriptionStatus::Done);
    assert_eq!(stored.transcript, expected.sentences);
    assert_eq!(stored.summary, expected.summary);
    assert_eq!(stored.action_items, expected.action_items);
}

#[tokio::test]
async fn given_provider_succeeding_when_running_then_freshly_signed_url_and_owner_key_are_sent() {
    let owner = UserId::new();
    let repo = Arc::new(InMemoryRecordingRepository::new());
    let recording = seed_discovered(&repo, owner).await;
    let client = Arc::new(FakeTranscriptionClient::succeeding());
    let storage = Arc::new(FakeStorageProvider::new(FakeBucket::default()));
    let orchestrator = orchestrator(repo.clone(), storage, client.clone());

    let outcome = orchestrator
        .run(recording.id, &credentials_for(owner))
        .await;

    assert!(matches!(outcome, JobOutcome::Completed { attempts: 1 }));
    let received = client.received();
    assert_eq!(received.len(), 1);
    assert!(received[0].0.contains("standup.mp3"));
    assert!(received[0].0.contains("X-Goog-Signature"));
    assert_eq!(received[0].1, TEST_API_KEY);
}

#[tokio::test]
async fn given_recording_without_audio_when_running_then_aborts_and_leaves_record_untouched() {
    let owner = UserId::new();
    let repo = Arc::new(InMemoryRecordingRepository::new());
    let recording = Recording::new(owner, "Planning notes".to_string());
    repo.insert(&recording).await.unwrap();
    let client = Arc::new(FakeTranscriptionClient::succeeding());
    let storage = Arc::new(FakeStorageProvider::new(FakeBucket::default()));
    let orchestrator = orchestrator(repo.clone(), storage, client.clone());

    let outcome = orchestrator
        .run(recording.id, &credentials_for(owner))
        .await;

    assert!(
        matches!(outcome, JobOutcome::Aborted(OrchestratorError::MissingAudio(id)) if id == recording.id),
        "expected MissingAudio but got: {:?}",
        outcome
    );
    assert_eq!(client.call_count(), 0);
    let stored = repo.find_by_id(recording.id, owner).await.unwrap().unwrap();
    assert_eq!(stored, recording);
}

#[tokio::test]
async fn given_unknown_recording_when_running_then_aborts_as_vanished() {
    let owner = UserId::new();
    let repo = Arc::new(InMemoryRecordingRepository::new());
    let client = Arc::new(FakeTranscriptionClient::succeeding());
    let storage = Arc::new(FakeStorageProvider::new(FakeBucket::default()));
    let orchestrator = orchestrator(repo, storage, client.clone());
    let missing = RecordingId::new();

    let outcome = orchestrator.run(missing, &credentials_for(owner)).await;

    assert!(matches!(
        outcome,
        JobOutcome::Aborted(OrchestratorError::RecordingVanished(id)) if id == missing
    ));
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn given_signing_failure_when_running_then_aborts_without_calling_provider() {
    let owner = UserId::new();
    let repo = Arc::new(InMemoryRecordingRepository::new());
    let recording = seed_discovered(&repo, owner).await;
    let client = Arc::new(FakeTranscriptionClient::succeeding());
    let storage = Arc::new(FakeStorageProvider::new(FakeBucket::default().failing_signing()));
    let orchestrator = orchestrator(repo, storage, client.clone());

    let outcome = orchestrator
        .run(recording.id, &credentials_for(owner))
        .await;

    assert!(matches!(
        outcome,
        JobOutcome::Aborted(OrchestratorError::Signing(_))
    ));
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn given_not_started_recording_when_spawned_then_processing_is_persisted_first() {
    let owner = UserId::new();
    let repo = Arc::new(InMemoryRecordingRepository::new());
    let recording = Recording::with_audio(
        owner,
        "Retro".to_string(),
        AudioReference::new(ObjectKey::new("retro.m4a")),
    );
    repo.insert(&recording).await.unwrap();
    let gate = Arc::new(Notify::new());
    let client = Arc::new(FakeTranscriptionClient::succeeding().gated(gate.clone()));
    let storage = Arc::new(FakeStorageProvider::new(FakeBucket::default()));
    let orchestrator = orchestrator(repo.clone(), storage, client.clone());

    let task = orchestrator
        .spawn(recording.id, credentials_for(owner), TranscriptionTrigger::FirstMessage)
        .expect("first trigger must start a run");
    while client.call_count() == 0 {
        tokio::task::yield_now().await;
    }

    let in_progress = repo.find_by_id(recording.id, owner).await.unwrap().unwrap();
    assert_eq!(in_progress.status, TranscriptionStatus::Processing);
    assert_eq!(in_progress.transcript[0].text, PROCESSING_SENTINEL);

    gate.notify_one();
    assert!(task.wait().await.is_completed());
    let done = repo.find_by_id(recording.id, owner).await.unwrap().unwrap();
    assert_eq!(done.status, TranscriptionStatus::Done);
}

#[tokio::test]
async fn given_run_in_flight_when_triggered_again_then_second_trigger_is_skipped() {
    let owner = UserId::new();
    let repo = Arc::new(InMemoryRecordingRepository::new());
    let recording = seed_discovered(&repo, owner).await;
    let gate = Arc::new(Notify::new());
    let client = Arc::new(FakeTranscriptionClient::succeeding().gated(gate.clone()));
    let storage = Arc::new(FakeStorageProvider::new(FakeBucket::default()));
    let orchestrator = orchestrator(repo, storage, client.clone());

    let first = orchestrator.spawn(
        recording.id,
        credentials_for(owner),
        TranscriptionTrigger::Upload,
    );
    let second = orchestrator.spawn(
        recording.id,
        credentials_for(owner),
        TranscriptionTrigger::BucketScan,
    );

    assert!(first.is_some());
    assert!(second.is_none());
    assert!(orchestrator.is_in_flight(recording.id));
    assert_eq!(orchestrator.in_flight_count(), 1);

    gate.notify_one();
    let outcome = first.unwrap().wait().await;
    assert!(outcome.is_completed());
    assert!(!orchestrator.is_in_flight(recording.id));
    assert_eq!(orchestrator.in_flight_count(), 0);
    assert_eq!(client.call_count(), 1);

    let again = orchestrator.spawn(
        recording.id,
        credentials_for(owner),
        TranscriptionTrigger::BucketScan,
    );
    let outcome = again.expect("guard must be released").wait().await;
    assert!(matches!(
        outcome,
        JobOutcome::Skipped(TranscriptionStatus::Done)
    ));
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn given_single_flight_disabled_when_triggered_twice_then_both_runs_start() {
    let owner = UserId::new();
    let repo = Arc::new(InMemoryRecordingRepository::new());
    let recording = seed_discovered(&repo, owner).await;
    let gate = Arc::new(Notify::new());
    let client = Arc::new(FakeTranscriptionClient::succeeding().gated(gate.clone()));
    let storage = Arc::new(FakeStorageProvider::new(FakeBucket::default()));
    let orchestrator = Arc::new(
        TranscriptionOrchestrator::new(repo.clone(), storage, client.clone(), RetryPolicy::default())
            .with_single_flight(false),
    );

    let first = orchestrator.spawn(
        recording.id,
        credentials_for(owner),
        TranscriptionTrigger::Upload,
    );
    let second = orchestrator.spawn(
        recording.id,
        credentials_for(owner),
        TranscriptionTrigger::BucketScan,
    );

    while client.call_count() < 2 {
        tokio::task::yield_now().await;
    }
    gate.notify_waiters();

    assert!(first.unwrap().wait().await.is_completed());
    assert!(second.unwrap().wait().await.is_completed());
    assert_eq!(client.call_count(), 2);
    let stored = repo.find_by_id(recording.id, owner).await.unwrap().unwrap();
    assert_eq!(stored.status, TranscriptionStatus::Done);
}

#[tokio::test]
async fn given_done_recording_when_triggered_then_run_is_skipped_and_result_is_kept() {
    let owner = UserId::new();
    let repo = Arc::new(InMemoryRecordingRepository::new());
    let mut recording = Recording::with_audio(
        owner,
        "Planning".to_string(),
        AudioReference::new(ObjectKey::new("planning.mp3")),
    );
    recording.apply(&TranscriptionUpdate::completed(sample_outcome()));
    repo.insert(&recording).await.unwrap();
    let client = Arc::new(FakeTranscriptionClient::always_failing());
    let storage = Arc::new(FakeStorageProvider::new(FakeBucket::default()));
    let orchestrator = orchestrator(repo.clone(), storage, client.clone());

    let outcome = orchestrator
        .spawn(recording.id, credentials_for(owner), TranscriptionTrigger::BucketScan)
        .expect("nothing else is in flight")
        .wait()
        .await;

    assert!(matches!(
        outcome,
        JobOutcome::Skipped(TranscriptionStatus::Done)
    ));
    assert_eq!(client.call_count(), 0);
    let stored = repo.find_by_id(recording.id, owner).await.unwrap().unwrap();
    assert_eq!(stored.status, TranscriptionStatus::Done);
    assert_eq!(stored.transcript, sample_outcome().sentences);
    assert_eq!(stored.summary, sample_outcome().summary);
    assert_eq!(stored.action_items, sample_outcome().action_items);
}

#[tokio::test]
async fn given_failed_recording_when_running_then_failed_sentinels_are_not_overwritten() {
    let owner = UserId::new();
    let repo = Arc::new(InMemoryRecordingRepository::new());
    let mut recording = Recording::discovered(owner, &stored_object("allhands.wav"));
    recording.apply(&TranscriptionUpdate::failed());
    repo.insert(&recording).await.unwrap();
    let client = Arc::new(FakeTranscriptionClient::succeeding());
    let storage = Arc::new(FakeStorageProvider::new(FakeBucket::default()));
    let orchestrator = orchestrator(repo.clone(), storage, client.clone());

    let outcome = orchestrator
        .run(recording.id, &credentials_for(owner))
        .await;

    assert!(matches!(
        outcome,
        JobOutcome::Skipped(TranscriptionStatus::Failed)
    ));
    assert_eq!(client.call_count(), 0);
    let stored = repo.find_by_id(recording.id, owner).await.unwrap().unwrap();
    assert_eq!(stored.transcript[0].text, FAILED_TRANSCRIPT_SENTINEL);
}
