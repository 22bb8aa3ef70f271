use chrono::{Duration, Utc};

use scribe_sync::application::ports::{RecordingRepository, RepositoryError};
use scribe_sync::domain::{
    AudioReference, ChatMessage, ObjectKey, Recording, RecordingId, Sentence,
    TranscriptionOutcome, TranscriptionStatus, TranscriptionUpdate, UserId, Word,
};

use crate::helpers::TestPostgres;

fn recording_with_audio(owner: UserId, key: &str) -> Recording {
    Recording::with_audio(
        owner,
        key.to_string(),
        AudioReference::new(ObjectKey::new(key))
            .with_cached_url(format!("https://storage.test/{key}?sig=1")),
    )
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_inserted_recording_when_finding_by_id_then_it_is_returned_only_to_its_owner() {
    let pg = TestPostgres::new().await;
    let owner = UserId::new();
    let recording = recording_with_audio(owner, "standup.mp3");

    pg.recording_repository.insert(&recording).await.unwrap();

    let found = pg
        .recording_repository
        .find_by_id(recording.id, owner)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.name, "standup.mp3");
    assert_eq!(found.status, TranscriptionStatus::NotStarted);
    let audio = found.audio.unwrap();
    assert_eq!(audio.object_key.as_str(), "standup.mp3");
    assert_eq!(audio.cached_url, "https://storage.test/standup.mp3?sig=1");

    let foreign = pg
        .recording_repository
        .find_by_id(recording.id, UserId::new())
        .await
        .unwrap();
    assert!(foreign.is_none());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_duplicate_object_key_for_owner_when_inserting_then_returns_constraint_violation() {
    let pg = TestPostgres::new().await;
    let owner = UserId::new();

    pg.recording_repository
        .insert(&recording_with_audio(owner, "allhands.wav"))
        .await
        .unwrap();
    let result = pg
        .recording_repository
        .insert(&recording_with_audio(owner, "allhands.wav"))
        .await;

    assert!(matches!(result, Err(RepositoryError::ConstraintViolation(_))));
    pg.recording_repository
        .insert(&recording_with_audio(UserId::new(), "allhands.wav"))
        .await
        .unwrap();
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_recordings_without_audio_when_inserting_several_then_no_uniqueness_applies() {
    let pg = TestPostgres::new().await;
    let owner = UserId::new();

    pg.recording_repository
        .insert(&Recording::new(owner, "Notes".to_string()))
        .await
        .unwrap();
    pg.recording_repository
        .insert(&Recording::new(owner, "Notes".to_string()))
        .await
        .unwrap();

    let listed = pg.recording_repository.list_by_owner(owner).await.unwrap();
    assert_eq!(listed.len(), 2);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_object_key_when_finding_by_audio_key_then_only_owner_scoped_match_is_returned() {
    let pg = TestPostgres::new().await;
    let owner = UserId::new();
    let recording = recording_with_audio(owner, "customer-call.m4a");
    pg.recording_repository.insert(&recording).await.unwrap();

    let found = pg
        .recording_repository
        .find_by_audio_object_key(owner, &ObjectKey::new("customer-call.m4a"))
        .await
        .unwrap();
    let other_owner = pg
        .recording_repository
        .find_by_audio_object_key(UserId::new(), &ObjectKey::new("customer-call.m4a"))
        .await
        .unwrap();

    assert_eq!(found.map(|r| r.id), Some(recording.id));
    assert!(other_owner.is_none());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_recordings_when_listing_then_newest_come_first() {
    let pg = TestPostgres::new().await;
    let owner = UserId::new();
    let mut older = Recording::new(owner, "Monday".to_string());
    older.created_at = Utc::now() - Duration::days(2);
    let newer = Recording::new(owner, "Wednesday".to_string());
    pg.recording_repository.insert(&older).await.unwrap();
    pg.recording_repository.insert(&newer).await.unwrap();
    pg.recording_repository
        .insert(&Recording::new(UserId::new(), "Not mine".to_string()))
        .await
        .unwrap();

    let listed = pg.recording_repository.list_by_owner(owner).await.unwrap();

    let names: Vec<&str> = listed.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Wednesday", "Monday"]);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_query_when_searching_then_name_and_transcript_match_case_insensitively() {
    let pg = TestPostgres::new().await;
    let owner = UserId::new();
    let by_name = Recording::new(owner, "Budget planning".to_string());
    let mut by_transcript = Recording::new(owner, "Weekly sync".to_string());
    by_transcript.transcript = vec![Sentence::new(
        "We moved the BUDGET review".to_string(),
        0.0,
        2.0,
        0.9,
    )];
    let unrelated = Recording::new(owner, "Hiring".to_string());
    for recording in [&by_name, &by_transcript, &unrelated] {
        pg.recording_repository.insert(recording).await.unwrap();
    }

    let found = pg.recording_repository.search(owner, "budget").await.unwrap();

    let mut ids: Vec<RecordingId> = found.iter().map(|r| r.id).collect();
    ids.sort_by_key(|id| id.to_string());
    let mut expected = vec![by_name.id, by_transcript.id];
    expected.sort_by_key(|id| id.to_string());
    assert_eq!(ids, expected);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_wildcard_characters_in_query_when_searching_then_they_match_literally() {
    let pg = TestPostgres::new().await;
    let owner = UserId::new();
    pg.recording_repository
        .insert(&Recording::new(owner, "Growth 100% plan".to_string()))
        .await
        .unwrap();
    pg.recording_repository
        .insert(&Recording::new(owner, "Growth 1000 plan".to_string()))
        .await
        .unwrap();

    let found = pg.recording_repository.search(owner, "100%").await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Growth 100% plan");
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_completed_update_when_writing_result_then_transcription_fields_are_replaced() {
    let pg = TestPostgres::new().await;
    let owner = UserId::new();
    let recording = recording_with_audio(owner, "retro.mp3");
    pg.recording_repository.insert(&recording).await.unwrap();
    let outcome = TranscriptionOutcome {
        sentences: vec![
            Sentence::new("Action: update the runbook.".to_string(), 0.0, 1.8, 0.97)
                .with_words(vec![Word::new("Action:".to_string(), 0.0, 0.4, 0.99)])
                .with_speaker(Some("0".to_string())),
        ],
        summary: "Action: update the runbook.".to_string(),
        action_items: vec!["- Update the runbook".to_string()],
    };

    let update = TranscriptionUpdate::completed(outcome.clone());

    pg.recording_repository
        .update_transcription_result(recording.id, &update)
        .await
        .unwrap();

    let stored = pg
        .recording_repository
        .find_by_id(recording.id, owner)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, TranscriptionStatus::Done);
    assert_eq!(stored.transcript, outcome.sentences);
    assert_eq!(stored.summary, outcome.summary);
    assert_eq!(stored.action_items, outcome.action_items);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_missing_recording_when_writing_result_then_returns_not_found() {
    let pg = TestPostgres::new().await;

    let result = pg
        .recording_repository
        .update_transcription_result(RecordingId::new(), &TranscriptionUpdate::failed())
        .await;

    assert!(matches!(result, Err(RepositoryError::NotFound(_))));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_messages_when_appending_then_they_load_in_insertion_order() {
    let pg = TestPostgres::new().await;
    let owner = UserId::new();
    let recording = recording_with_audio(owner, "planning.mp3");
    pg.recording_repository.insert(&recording).await.unwrap();

    for content in ["first", "second", "third"] {
        pg.recording_repository
            .append_message(recording.id, owner, &ChatMessage::new(owner, content.to_string()))
            .await
            .unwrap();
    }

    let stored = pg
        .recording_repository
        .find_by_id(recording.id, owner)
        .await
        .unwrap()
        .unwrap();
    let contents: Vec<&str> = stored.messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["first", "second", "third"]);
    assert!(stored.messages.iter().all(|m| m.user_id == owner));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_foreign_owner_when_appending_message_then_returns_not_found() {
    let pg = TestPostgres::new().await;
    let owner = UserId::new();
    let intruder = UserId::new();
    let recording = recording_with_audio(owner, "private.mp3");
    pg.recording_repository.insert(&recording).await.unwrap();

    let result = pg
        .recording_repository
        .append_message(
            recording.id,
            intruder,
            &ChatMessage::new(intruder, "hello".to_string()),
        )
        .await;

    assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    let stored = pg
        .recording_repository
        .find_by_id(recording.id, owner)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.messages.is_empty());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_failed_recording_when_replacing_transcript_then_status_becomes_done() {
    let pg = TestPostgres::new().await;
    let owner = UserId::new();
    let recording = recording_with_audio(owner, "interview.mp3");
    pg.recording_repository.insert(&recording).await.unwrap();
    pg.recording_repository
        .update_transcription_result(recording.id, &TranscriptionUpdate::failed())
        .await
        .unwrap();
    let edited = vec![Sentence::new("Typed up by hand.".to_string(), 0.0, 3.0, 1.0)];

    pg.recording_repository
        .replace_transcript(recording.id, owner, &edited)
        .await
        .unwrap();

    let stored = pg
        .recording_repository
        .find_by_id(recording.id, owner)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, TranscriptionStatus::Done);
    assert_eq!(stored.transcript, edited);
    let foreign = pg
        .recording_repository
        .replace_transcript(recording.id, UserId::new(), &edited)
        .await;
    assert!(matches!(foreign, Err(RepositoryError::NotFound(_))));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_transcript_cleared_when_replacing_then_status_returns_to_not_started() {
    let pg = TestPostgres::new().await;
    let owner = UserId::new();
    let recording = recording_with_audio(owner, "draft.mp3");
    pg.recording_repository.insert(&recording).await.unwrap();
    pg.recording_repository
        .update_transcription_result(
            recording.id,
            &TranscriptionUpdate::completed(TranscriptionOutcome {
                sentences: vec![Sentence::new("Draft".to_string(), 0.0, 1.0, 1.0)],
                summary: "Draft".to_string(),
                action_items: Vec::new(),
            }),
        )
        .await
        .unwrap();

    pg.recording_repository
        .replace_transcript(recording.id, owner, &[])
        .await
        .unwrap();

    let stored = pg
        .recording_repository
        .find_by_id(recording.id, owner)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.transcript.is_empty());
    assert_eq!(stored.status, TranscriptionStatus::NotStarted);
}
