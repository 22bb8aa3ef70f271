mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    AuthSettings, DatabaseProviderSetting, DatabaseSettings, LoggingSettings, ServerSettings,
    Settings, StorageProviderSetting, StorageSettings, TranscriptionSettings,
};
