mod chat_message;
mod message_id;
mod object_key;
mod recording;
mod recording_id;
mod sentence;
mod storage_credentials;
mod stored_object;
pub mod transcription_status;
mod transcription_update;
mod user_id;

pub use chat_message::ChatMessage;
pub use message_id::MessageId;
pub use object_key::ObjectKey;
pub use recording::{AudioReference, Recording};
pub use recording_id::RecordingId;
pub use sentence::{Sentence, Word};
pub use storage_credentials::{CredentialsDecodeError, StorageCredentials};
pub use stored_object::StoredObject;
pub use transcription_status::TranscriptionStatus;
pub use transcription_update::{TranscriptionOutcome, TranscriptionUpdate};
pub use user_id::UserId;
