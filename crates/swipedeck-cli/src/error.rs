use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] swipedeck_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid target ID '{0}': expected a UUID")]
    InvalidTargetId(String),
    #[error(
        "No actor configured. Pass --actor, set SWIPEDECK_ACTOR, or run `swipedeck config init --actor <ID>`."
    )]
    NoActor,
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(
        "Sync is not configured. Set TURSO_DATABASE_URL and TURSO_AUTH_TOKEN to enable `swipedeck sync`."
    )]
    SyncNotConfigured,
}
