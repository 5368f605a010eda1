//! Device database handle and replica sync

use crate::error::{Error, Result};
use crate::util::normalize_text_option;
use libsql::{Builder, Connection, Database as LibSqlDatabase};
use std::path::Path;
use std::time::Duration;

use super::migrations;

const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(60);

/// Best-effort tuning; embedded replicas may refuse these
const TUNING_PRAGMAS: [&str; 2] = ["PRAGMA journal_mode = WAL;", "PRAGMA synchronous = NORMAL;"];

/// Where and how often the device replica pulls from the hosted database
#[derive(Debug, Clone, Default)]
pub struct SyncConfig {
    /// Hosted database URL, e.g. `libsql://swipedeck.turso.io`
    pub url: Option<String>,
    pub auth_token: Option<String>,
    /// Background pull period; `None` means pull only on `Database::sync`
    pub sync_interval: Option<Duration>,
}

impl SyncConfig {
    pub fn new(url: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            auth_token: Some(auth_token.into()),
            sync_interval: Some(DEFAULT_SYNC_INTERVAL),
        }
    }

    /// Read `TURSO_DATABASE_URL` and `TURSO_AUTH_TOKEN`; `None` unless both are set
    pub fn from_env() -> Option<Self> {
        let url = normalize_text_option(std::env::var("TURSO_DATABASE_URL").ok())?;
        let token = normalize_text_option(std::env::var("TURSO_AUTH_TOKEN").ok())?;
        Some(Self::new(url, token))
    }

    #[must_use]
    pub const fn without_auto_sync(mut self) -> Self {
        self.sync_interval = None;
        self
    }

    pub const fn is_configured(&self) -> bool {
        self.url.is_some() && self.auth_token.is_some()
    }

    fn credentials(&self) -> Result<(String, String)> {
        match (&self.url, &self.auth_token) {
            (Some(url), Some(token)) => Ok((url.clone(), token.clone())),
            (None, _) => Err(Error::InvalidInput("sync URL is missing".into())),
            (_, None) => Err(Error::InvalidInput("sync auth token is missing".into())),
        }
    }
}

/// One device database: the libSQL handle, its connection, and optional sync.
pub struct Database {
    db: LibSqlDatabase,
    conn: Connection,
    sync_config: Option<SyncConfig>,
}

impl Database {
    /// Local file with the swipe schema applied; created on first use.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_local(&path.as_ref().to_string_lossy()).await
    }

    pub async fn open_in_memory() -> Result<Self> {
        Self::open_local(":memory:").await
    }

    async fn open_local(location: &str) -> Result<Self> {
        let db = Builder::new_local(location).build().await?;
        Self::prepare(db, None).await
    }

    /// Embedded replica of the hosted database at `local_path`.
    ///
    /// The first pull happens before migrations so an existing remote
    /// schema is seen rather than recreated.
    pub async fn open_with_sync(
        local_path: impl AsRef<Path>,
        sync_config: SyncConfig,
    ) -> Result<Self> {
        let (url, token) = sync_config.credentials()?;
        let mut builder = Builder::new_remote_replica(local_path.as_ref(), url, token);
        if let Some(interval) = sync_config.sync_interval {
            tracing::debug!(?interval, "Replica auto-sync enabled");
            builder = builder.sync_interval(interval);
        }

        let db = builder.build().await?;
        Self::prepare(db, Some(sync_config)).await
    }

    async fn prepare(db: LibSqlDatabase, sync_config: Option<SyncConfig>) -> Result<Self> {
        let conn = db.connect()?;
        let database = Self {
            db,
            conn,
            sync_config,
        };

        database.sync().await?;
        database.configure().await?;
        migrations::run(&database.conn).await?;
        Ok(database)
    }

    async fn configure(&self) -> Result<()> {
        for pragma in TUNING_PRAGMAS {
            if let Err(error) = self.conn.execute(pragma, ()).await {
                tracing::debug!("Skipped `{}`: {}", pragma, error);
            }
        }
        self.conn.execute("PRAGMA foreign_keys = ON;", ()).await?;
        Ok(())
    }

    /// Pull remote changes; a no-op for local-only databases.
    pub async fn sync(&self) -> Result<()> {
        if self.sync_config.is_none() {
            return Ok(());
        }
        self.db.sync().await?;
        tracing::debug!("Pulled remote swipe changes");
        Ok(())
    }

    pub const fn is_sync_enabled(&self) -> bool {
        self.sync_config.is_some()
    }

    pub const fn connection(&self) -> &Connection {
        &self.conn
    }
}
