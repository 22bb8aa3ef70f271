use chrono::{DateTime, Utc};

use super::{MessageId, UserId};

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub user_id: UserId,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(user_id: UserId, content: String) -> Self {
        Self {
            id: MessageId::new(),
            user_id,
            content,
            timestamp: Utc::now(),
        }
    }
}
