//! Database migrations

use crate::error::Result;
use libsql::Connection;

/// Current schema version
const CURRENT_VERSION: i32 = 2;

/// Run all pending migrations
pub async fn run(conn: &Connection) -> Result<()> {
    let version = get_version(conn).await?;

    if version < 1 {
        apply(conn, 1, &V1_STATEMENTS).await?;
    }
    if version < 2 {
        apply(conn, 2, &V2_STATEMENTS).await?;
    }

    Ok(())
}

/// Get the current schema version
async fn get_version(conn: &Connection) -> Result<i32> {
    let mut rows = conn
        .query(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            (),
        )
        .await?;

    let exists = match rows.next().await? {
        Some(row) => row.get::<i32>(0)? != 0,
        None => false,
    };
    if !exists {
        return Ok(0);
    }

    let mut rows = conn
        .query("SELECT COALESCE(MAX(version), 0) FROM schema_version", ())
        .await?;

    match rows.next().await? {
        Some(row) => Ok(row.get(0)?),
        None => Ok(0),
    }
}

/// Version 1: swipe events and per-device state
const V1_STATEMENTS: [&str; 5] = [
    "CREATE TABLE IF NOT EXISTS schema_version (
        version INTEGER PRIMARY KEY
    )",
    // One row per (actor, target, kind); later swipes overwrite earlier ones
    "CREATE TABLE IF NOT EXISTS swipe_events (
        actor_id TEXT NOT NULL,
        target_id TEXT NOT NULL,
        target_kind TEXT NOT NULL CHECK (target_kind IN ('listing', 'profile')),
        action TEXT NOT NULL CHECK (action IN ('like', 'pass', 'view')),
        occurred_at INTEGER NOT NULL,
        PRIMARY KEY (actor_id, target_id, target_kind)
    )",
    "CREATE INDEX IF NOT EXISTS idx_swipe_events_actor_kind_time
        ON swipe_events(actor_id, target_kind, occurred_at DESC)",
    "CREATE TABLE IF NOT EXISTS device_state (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    )",
    "INSERT INTO schema_version (version) VALUES (1)",
];

/// Version 2: candidate entity catalog for freshness lookups
const V2_STATEMENTS: [&str; 4] = [
    "CREATE TABLE IF NOT EXISTS entities (
        id TEXT NOT NULL,
        kind TEXT NOT NULL CHECK (kind IN ('listing', 'profile')),
        created_at INTEGER NOT NULL,
        updated_at INTEGER,
        is_deleted INTEGER NOT NULL DEFAULT 0,
        PRIMARY KEY (id, kind)
    )",
    "CREATE INDEX IF NOT EXISTS idx_entities_kind_created ON entities(kind, created_at DESC)",
    "CREATE INDEX IF NOT EXISTS idx_entities_deleted ON entities(is_deleted)",
    "INSERT INTO schema_version (version) VALUES (2)",
];

/// Apply one migration's statements inside a transaction.
///
/// libsql has no `execute_batch` on remote replicas, so statements run one
/// at a time and a failure rolls the whole version back.
async fn apply(conn: &Connection, version: i32, statements: &[&str]) -> Result<()> {
    conn.execute("BEGIN TRANSACTION", ()).await?;

    for stmt in statements {
        if let Err(e) = conn.execute(stmt, ()).await {
            conn.execute("ROLLBACK", ()).await.ok();
            return Err(e.into());
        }
    }

    if let Err(e) = conn.execute("COMMIT", ()).await {
        conn.execute("ROLLBACK", ()).await.ok();
        return Err(e.into());
    }

    tracing::info!("Migrated database to version {version} (latest {CURRENT_VERSION})");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use libsql::Builder;

    async fn setup() -> Connection {
        let db = Builder::new_local(":memory:").build().await.unwrap();
        db.connect().unwrap()
    }

    async fn table_exists(conn: &Connection, name: &str) -> bool {
        let mut rows = conn
            .query(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?)",
                [name],
            )
            .await
            .unwrap();
        rows.next()
            .await
            .unwrap()
            .is_some_and(|row| row.get::<i32>(0).unwrap() != 0)
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_migrations() {
        let conn = setup().await;
        run(&conn).await.unwrap();

        assert_eq!(get_version(&conn).await.unwrap(), CURRENT_VERSION);
        assert!(table_exists(&conn, "swipe_events").await);
        assert!(table_exists(&conn, "device_state").await);
        assert!(table_exists(&conn, "entities").await);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_migrations_idempotent() {
        let conn = setup().await;
        run(&conn).await.unwrap();
        run(&conn).await.unwrap();

        assert_eq!(get_version(&conn).await.unwrap(), CURRENT_VERSION);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_swipe_events_reject_unknown_action() {
        let conn = setup().await;
        run(&conn).await.unwrap();

        let result = conn
            .execute(
                "INSERT INTO swipe_events (actor_id, target_id, target_kind, action, occurred_at)
                 VALUES ('a', 't', 'listing', 'superlike', 0)",
                (),
            )
            .await;
        assert!(result.is_err());
    }
}
