use chrono::Duration;

use scribe_sync::application::ports::{RecordingRepository, RepositoryError};
use scribe_sync::domain::{
    AudioReference, ChatMessage, ObjectKey, Recording, RecordingId, Sentence,
    TranscriptionStatus, TranscriptionUpdate, UserId,
};
use scribe_sync::infrastructure::persistence::InMemoryRecordingRepository;

fn with_key(owner: UserId, key: &str) -> Recording {
    Recording::with_audio(
        owner,
        key.to_string(),
        AudioReference::new(ObjectKey::new(key)),
    )
}

#[tokio::test]
async fn given_recording_of_other_owner_when_finding_by_id_then_returns_none() {
    let repo = InMemoryRecordingRepository::new();
    let recording = Recording::new(UserId::new(), "Private".to_string());
    repo.insert(&recording).await.unwrap();

    let found = repo.find_by_id(recording.id, UserId::new()).await.unwrap();

    assert!(found.is_none());
}

#[tokio::test]
async fn given_key_already_recorded_for_owner_when_inserting_then_returns_constraint_violation() {
    let repo = InMemoryRecordingRepository::new();
    let owner = UserId::new();
    repo.insert(&with_key(owner, "standup.mp3")).await.unwrap();

    let result = repo.insert(&with_key(owner, "standup.mp3")).await;

    assert!(matches!(result, Err(RepositoryError::ConstraintViolation(_))));
    assert_eq!(repo.len().await, 1);
}

#[tokio::test]
async fn given_same_key_for_different_owners_when_inserting_then_both_are_stored() {
    let repo = InMemoryRecordingRepository::new();

    repo.insert(&with_key(UserId::new(), "standup.mp3"))
        .await
        .unwrap();
    repo.insert(&with_key(UserId::new(), "standup.mp3"))
        .await
        .unwrap();

    assert_eq!(repo.len().await, 2);
}

#[tokio::test]
async fn given_recordings_when_listing_then_only_owned_ones_newest_first() {
    let repo = InMemoryRecordingRepository::new();
    let owner = UserId::new();
    let mut older = Recording::new(owner, "Older".to_string());
    older.created_at = older.created_at - Duration::hours(1);
    let newer = Recording::new(owner, "Newer".to_string());
    repo.insert(&older).await.unwrap();
    repo.insert(&newer).await.unwrap();
    repo.insert(&Recording::new(UserId::new(), "Foreign".to_string()))
        .await
        .unwrap();

    let listed = repo.list_by_owner(owner).await.unwrap();

    let names: Vec<&str> = listed.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Newer", "Older"]);
}

#[tokio::test]
async fn given_matching_text_in_foreign_recording_when_searching_then_it_is_not_returned() {
    let repo = InMemoryRecordingRepository::new();
    let owner = UserId::new();
    let mut foreign = Recording::new(UserId::new(), "Roadmap".to_string());
    foreign.transcript = vec![Sentence::new("roadmap review".to_string(), 0.0, 1.0, 1.0)];
    repo.insert(&foreign).await.unwrap();
    repo.insert(&Recording::new(owner, "Roadmap Q4".to_string()))
        .await
        .unwrap();

    let found = repo.search(owner, "roadmap").await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].owner_id, owner);
}

#[tokio::test]
async fn given_missing_recording_when_updating_result_then_returns_not_found() {
    let repo = InMemoryRecordingRepository::new();

    let result = repo
        .update_transcription_result(RecordingId::new(), &TranscriptionUpdate::failed())
        .await;

    assert!(matches!(result, Err(RepositoryError::NotFound(_))));
}

#[tokio::test]
async fn given_update_when_applied_then_status_and_transcript_change_together() {
    let repo = InMemoryRecordingRepository::new();
    let owner = UserId::new();
    let recording = with_key(owner, "standup.mp3");
    repo.insert(&recording).await.unwrap();

    repo.update_transcription_result(recording.id, &TranscriptionUpdate::processing())
        .await
        .unwrap();

    let stored = repo.find_by_id(recording.id, owner).await.unwrap().unwrap();
    assert_eq!(stored.status, TranscriptionStatus::Processing);
    assert_eq!(stored.transcript.len(), 1);
}

#[tokio::test]
async fn given_foreign_owner_when_appending_message_then_returns_not_found() {
    let repo = InMemoryRecordingRepository::new();
    let recording = Recording::new(UserId::new(), "Private".to_string());
    repo.insert(&recording).await.unwrap();
    let intruder = UserId::new();

    let result = repo
        .append_message(
            recording.id,
            intruder,
            &ChatMessage::new(intruder, "hi".to_string()),
        )
        .await;

    assert!(matches!(result, Err(RepositoryError::NotFound(_))));
}

#[tokio::test]
async fn given_messages_when_appending_then_they_keep_insertion_order() {
    let repo = InMemoryRecordingRepository::new();
    let owner = UserId::new();
    let recording = Recording::new(owner, "Chat".to_string());
    repo.insert(&recording).await.unwrap();

    for text in ["one", "two", "three"] {
        repo.append_message(recording.id, owner, &ChatMessage::new(owner, text.to_string()))
            .await
            .unwrap();
    }

    let stored = repo.find_by_id(recording.id, owner).await.unwrap().unwrap();
    let contents: Vec<&str> = stored.messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["one", "two", "three"]);
}
