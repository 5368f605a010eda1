//! Durable per-device slot holding the pending undo token

use crate::error::Result;
use crate::models::UndoToken;
use libsql::Connection;

const UNDO_TOKEN_KEY: &str = "undo_token";

/// Trait for undo token persistence (async)
#[allow(async_fn_in_trait)]
pub trait UndoSlot {
    /// Load the remembered token, if any
    async fn load(&self) -> Result<Option<UndoToken>>;

    /// Replace the remembered token
    async fn save(&self, token: &UndoToken) -> Result<()>;

    /// Forget the remembered token
    async fn clear(&self) -> Result<()>;
}

/// libSQL implementation of `UndoSlot`, backed by the `device_state` table
pub struct LibSqlUndoSlot<'a> {
    conn: &'a Connection,
}

impl<'a> LibSqlUndoSlot<'a> {
    /// Create a new slot with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl UndoSlot for LibSqlUndoSlot<'_> {
    async fn load(&self) -> Result<Option<UndoToken>> {
        let mut rows = self
            .conn
            .query(
                "SELECT value FROM device_state WHERE key = ?",
                [UNDO_TOKEN_KEY],
            )
            .await?;

        let Some(row) = rows.next().await? else {
            return Ok(None);
        };
        let raw: String = row.get(0)?;

        match serde_json::from_str(&raw) {
            Ok(token) => Ok(Some(token)),
            Err(error) => {
                // An unreadable token can never be consumed; drop it
                tracing::warn!("Discarding unreadable undo token: {}", error);
                self.clear().await?;
                Ok(None)
            }
        }
    }

    async fn save(&self, token: &UndoToken) -> Result<()> {
        let raw = serde_json::to_string(token)?;
        self.conn
            .execute(
                "INSERT OR REPLACE INTO device_state (key, value) VALUES (?, ?)",
                [UNDO_TOKEN_KEY, raw.as_str()],
            )
            .await?;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.conn
            .execute("DELETE FROM device_state WHERE key = ?", [UNDO_TOKEN_KEY])
            .await?;
        Ok(())
    }
}
