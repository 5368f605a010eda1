//! Error types for swipedeck-core

use thiserror::Error;

/// Result type alias using swipedeck-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in swipedeck-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// No acting user could be resolved for a write
    #[error("Not authenticated: no actor is signed in")]
    NotAuthenticated,

    /// A read or write against the backing store failed
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// libSQL error
    #[error("Persistence error (libSQL): {0}")]
    LibSql(#[from] libsql::Error),

    /// Undo requested while no pass decision is armed
    #[error("Nothing to undo")]
    NothingToUndo,

    /// Undo target was already changed or removed elsewhere
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Freshness lookup target is missing or inaccessible
    #[error("Unresolved entity: {0}")]
    UnresolvedEntity(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error came from the backing store.
    pub const fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_) | Self::LibSql(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persistence_classification() {
        assert!(Error::Persistence("disk full".into()).is_persistence());
        assert!(!Error::NothingToUndo.is_persistence());
        assert!(!Error::Conflict("gone".into()).is_persistence());
    }

    #[test]
    fn messages_name_the_failure() {
        assert_eq!(Error::NothingToUndo.to_string(), "Nothing to undo");
        assert!(Error::NotAuthenticated
            .to_string()
            .starts_with("Not authenticated"));
    }
}
