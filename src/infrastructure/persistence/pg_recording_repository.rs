use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{RecordingRepository, RepositoryError};
use crate::domain::{
    AudioReference, ChatMessage, MessageId, ObjectKey, Recording, RecordingId, Sentence,
    TranscriptionStatus, TranscriptionUpdate, UserId,
};

const RECORDING_COLUMNS: &str = "id, owner_id, name, audio_object_key, audio_cached_url, status, \
     transcript, summary, action_items, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct RecordingRow {
    id: Uuid,
    owner_id: Uuid,
    name: String,
    audio_object_key: Option<String>,
    audio_cached_url: String,
    status: String,
    transcript: Json<Vec<Sentence>>,
    summary: String,
    action_items: Json<Vec<String>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct MessageRow {
    id: Uuid,
    recording_id: Uuid,
    user_id: Uuid,
    content: String,
    created_at: DateTime<Utc>,
}

impl RecordingRow {
    fn into_recording(self, messages: Vec<ChatMessage>) -> Result<Recording, RepositoryError> {
        let status = self
            .status
            .parse::<TranscriptionStatus>()
            .map_err(RepositoryError::Corrupted)?;

        Ok(Recording {
            id: RecordingId::from_uuid(self.id),
            owner_id: UserId::from_uuid(self.owner_id),
            name: self.name,
            audio: self.audio_object_key.map(|key| {
                AudioReference::new(ObjectKey::new(key)).with_cached_url(self.audio_cached_url)
            }),
            status,
            transcript: self.transcript.0,
            summary: self.summary,
            action_items: self.action_items.0,
            messages,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl From<MessageRow> for ChatMessage {
    fn from(row: MessageRow) -> Self {
        ChatMessage {
            id: MessageId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            content: row.content,
            timestamp: row.created_at,
        }
    }
}

fn query_error(e: sqlx::Error) -> RepositoryError {
    match e.as_database_error() {
        Some(db) if db.is_unique_violation() => RepositoryError::ConstraintViolation(db.to_string()),
        _ => RepositoryError::QueryFailed(e.to_string()),
    }
}

/// `%`, `_` and `\` in user input match literally.
fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

pub struct PgRecordingRepository {
    pool: PgPool,
}

impl PgRecordingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_messages(
        &self,
        recording_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<ChatMessage>>, RepositoryError> {
        if recording_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, recording_id, user_id, content, created_at
            FROM recording_messages
            WHERE recording_id = ANY($1)
            ORDER BY seq ASC
            "#,
        )
        .bind(recording_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(query_error)?;

        let mut grouped: HashMap<Uuid, Vec<ChatMessage>> = HashMap::new();
        for row in rows {
            grouped
                .entry(row.recording_id)
                .or_default()
                .push(ChatMessage::from(row));
        }
        Ok(grouped)
    }

    async fn hydrate(&self, rows: Vec<RecordingRow>) -> Result<Vec<Recording>, RepositoryError> {
        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut messages = self.load_messages(&ids).await?;

        rows.into_iter()
            .map(|row| {
                let recording_messages = messages.remove(&row.id).unwrap_or_default();
                row.into_recording(recording_messages)
            })
            .collect()
    }

    async fn hydrate_one(
        &self,
        row: Option<RecordingRow>,
    ) -> Result<Option<Recording>, RepositoryError> {
        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl RecordingRepository for PgRecordingRepository {
    #[instrument(skip(self, recording), fields(recording_id = %recording.id, owner_id = %recording.owner_id))]
    async fn insert(&self, recording: &Recording) -> Result<RecordingId, RepositoryError> {
        let (object_key, cached_url) = match &recording.audio {
            Some(audio) => (
                Some(audio.object_key.as_str().to_string()),
                audio.cached_url.clone(),
            ),
            None => (None, String::new()),
        };

        sqlx::query(
            r#"
            INSERT INTO recordings (id, owner_id, name, audio_object_key, audio_cached_url, status,
                                    transcript, summary, action_items, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(recording.id.as_uuid())
        .bind(recording.owner_id.as_uuid())
        .bind(&recording.name)
        .bind(object_key)
        .bind(cached_url)
        .bind(recording.status.as_str())
        .bind(Json(&recording.transcript))
        .bind(&recording.summary)
        .bind(Json(&recording.action_items))
        .bind(recording.created_at)
        .bind(recording.updated_at)
        .execute(&self.pool)
        .await
        .map_err(query_error)?;

        Ok(recording.id)
    }

    #[instrument(skip(self), fields(recording_id = %id, owner_id = %owner_id))]
    async fn find_by_id(
        &self,
        id: RecordingId,
        owner_id: UserId,
    ) -> Result<Option<Recording>, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM recordings WHERE id = $1 AND owner_id = $2",
            RECORDING_COLUMNS
        );
        let row = sqlx::query_as::<_, RecordingRow>(&sql)
            .bind(id.as_uuid())
            .bind(owner_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error)?;

        self.hydrate_one(row).await
    }

    #[instrument(skip(self), fields(owner_id = %owner_id, object_key = %key))]
    async fn find_by_audio_object_key(
        &self,
        owner_id: UserId,
        key: &ObjectKey,
    ) -> Result<Option<Recording>, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM recordings WHERE owner_id = $1 AND audio_object_key = $2",
            RECORDING_COLUMNS
        );
        let row = sqlx::query_as::<_, RecordingRow>(&sql)
            .bind(owner_id.as_uuid())
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error)?;

        self.hydrate_one(row).await
    }

    #[instrument(skip(self), fields(owner_id = %owner_id))]
    async fn list_by_owner(&self, owner_id: UserId) -> Result<Vec<Recording>, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM recordings WHERE owner_id = $1 ORDER BY created_at DESC",
            RECORDING_COLUMNS
        );
        let rows = sqlx::query_as::<_, RecordingRow>(&sql)
            .bind(owner_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(query_error)?;

        self.hydrate(rows).await
    }

    #[instrument(skip(self), fields(owner_id = %owner_id))]
    async fn search(
        &self,
        owner_id: UserId,
        query: &str,
    ) -> Result<Vec<Recording>, RepositoryError> {
        let sql = format!(
            r#"
            SELECT {} FROM recordings
            WHERE owner_id = $1
              AND (name ILIKE $2
                   OR EXISTS (SELECT 1 FROM jsonb_array_elements(transcript) AS s
                              WHERE s->>'sentence' ILIKE $2))
            ORDER BY created_at DESC
            "#,
            RECORDING_COLUMNS
        );
        let rows = sqlx::query_as::<_, RecordingRow>(&sql)
            .bind(owner_id.as_uuid())
            .bind(like_pattern(query))
            .fetch_all(&self.pool)
            .await
            .map_err(query_error)?;

        self.hydrate(rows).await
    }

    #[instrument(skip(self, update), fields(recording_id = %id, status = %update.status))]
    async fn update_transcription_result(
        &self,
        id: RecordingId,
        update: &TranscriptionUpdate,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE recordings
            SET status = $1, transcript = $2, summary = $3, action_items = $4, updated_at = $5
            WHERE id = $6
            "#,
        )
        .bind(update.status.as_str())
        .bind(Json(&update.transcript))
        .bind(&update.summary)
        .bind(Json(&update.action_items))
        .bind(update.updated_at)
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id.to_string()));
        }
        Ok(())
    }

    #[instrument(skip(self, message), fields(recording_id = %id, owner_id = %owner_id, message_id = %message.id))]
    async fn append_message(
        &self,
        id: RecordingId,
        owner_id: UserId,
        message: &ChatMessage,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            INSERT INTO recording_messages (id, recording_id, user_id, content, created_at)
            SELECT $1, $2, $3, $4, $5
            WHERE EXISTS (SELECT 1 FROM recordings WHERE id = $2 AND owner_id = $6)
            "#,
        )
        .bind(message.id.as_uuid())
        .bind(id.as_uuid())
        .bind(message.user_id.as_uuid())
        .bind(&message.content)
        .bind(message.timestamp)
        .bind(owner_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id.to_string()));
        }

        sqlx::query("UPDATE recordings SET updated_at = $1 WHERE id = $2")
            .bind(Utc::now())
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(query_error)?;

        Ok(())
    }

    #[instrument(skip(self, transcript), fields(recording_id = %id, owner_id = %owner_id, sentences = transcript.len()))]
    async fn replace_transcript(
        &self,
        id: RecordingId,
        owner_id: UserId,
        transcript: &[Sentence],
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE recordings
            SET transcript = $1, status = $2, updated_at = $3
            WHERE id = $4 AND owner_id = $5
            "#,
        )
        .bind(Json(transcript))
        .bind(TranscriptionStatus::infer_from_transcript(transcript).as_str())
        .bind(Utc::now())
        .bind(id.as_uuid())
        .bind(owner_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
