mod bucket;
mod credentials;
pub mod dto;
mod health;
mod messages;
mod recordings;
mod upload;

pub use bucket::query_bucket_handler;
pub use credentials::save_credentials_handler;
pub use health::health_handler;
pub use messages::add_message_handler;
pub use recordings::{
    conversation_audio_handler, create_conversation_handler, get_conversation_handler,
    list_conversations_handler, search_handler, update_transcript_handler,
};
pub use upload::upload_audio_handler;
