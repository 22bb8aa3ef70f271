mod gladia_client;
mod gladia_types;

pub use gladia_client::{
    ACTION_ITEMS_PROMPT, DEFAULT_BASE_URL, DEFAULT_MAX_POLLS, DEFAULT_POLL_INTERVAL, GladiaClient,
    TITLE_PROMPT,
};
