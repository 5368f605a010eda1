//! Swipe event store
//!
//! `SwipeStore` is the capability surface the engine needs from the backing
//! database: keyed upserts, point deletes, filtered range queries, and entity
//! freshness lookups. `LibSqlSwipeStore` implements it over a libSQL
//! connection, which may be a local file or a replica of the hosted database.

#![allow(clippy::cast_possible_wrap)] // SQLite uses i64 for LIMIT

use crate::error::{Error, Result};
use crate::models::{ActorId, Entity, EntityStamp, SwipeAction, SwipeEvent, TargetId, TargetKind};
use libsql::{Connection, Value};

/// Time filter applied to `occurred_at`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeBound {
    /// No time filter
    #[default]
    Any,
    /// Strictly after the given timestamp
    After(i64),
    /// At or before the given timestamp
    AtOrBefore(i64),
}

/// Filter for event range queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    pub actor_id: ActorId,
    pub target_kind: TargetKind,
    /// Empty means every action
    pub actions: Vec<SwipeAction>,
    pub bound: TimeBound,
}

impl EventQuery {
    /// All events of one actor for one target kind
    pub const fn new(actor_id: ActorId, target_kind: TargetKind) -> Self {
        Self {
            actor_id,
            target_kind,
            actions: Vec::new(),
            bound: TimeBound::Any,
        }
    }

    /// Restrict to the given actions
    #[must_use]
    pub fn with_actions(mut self, actions: &[SwipeAction]) -> Self {
        self.actions = actions.to_vec();
        self
    }

    /// Restrict by time
    #[must_use]
    pub const fn with_bound(mut self, bound: TimeBound) -> Self {
        self.bound = bound;
        self
    }

    /// Render the WHERE clause and its positional parameters
    fn where_clause(&self) -> (String, Vec<Value>) {
        let mut clause = String::from("actor_id = ? AND target_kind = ?");
        let mut params = vec![
            Value::Text(self.actor_id.as_str().to_string()),
            Value::Text(self.target_kind.as_str().to_string()),
        ];

        if !self.actions.is_empty() {
            let placeholders = vec!["?"; self.actions.len()].join(", ");
            clause.push_str(&format!(" AND action IN ({placeholders})"));
            params.extend(
                self.actions
                    .iter()
                    .map(|action| Value::Text(action.as_str().to_string())),
            );
        }

        match self.bound {
            TimeBound::Any => {}
            TimeBound::After(at) => {
                clause.push_str(" AND occurred_at > ?");
                params.push(Value::Integer(at));
            }
            TimeBound::AtOrBefore(at) => {
                clause.push_str(" AND occurred_at <= ?");
                params.push(Value::Integer(at));
            }
        }

        (clause, params)
    }
}

/// Trait for swipe storage operations (async)
#[allow(async_fn_in_trait)]
pub trait SwipeStore {
    /// Insert or overwrite the event for its (actor, target, kind) triple
    async fn upsert_event(&self, event: &SwipeEvent) -> Result<()>;

    /// Fetch the stored event for a triple
    async fn get_event(
        &self,
        actor_id: &ActorId,
        target_id: &TargetId,
        target_kind: TargetKind,
    ) -> Result<Option<SwipeEvent>>;

    /// Delete the stored event for a triple; returns whether a row was removed
    async fn delete_event(
        &self,
        actor_id: &ActorId,
        target_id: &TargetId,
        target_kind: TargetKind,
    ) -> Result<bool>;

    /// List events matching a filter, newest first
    async fn query_events(&self, query: &EventQuery) -> Result<Vec<SwipeEvent>>;

    /// Delete every event matching a filter; returns the number removed
    async fn purge_events(&self, query: &EventQuery) -> Result<u64>;

    /// Modification timestamps of a live entity, `None` if missing or deleted
    async fn entity_timestamp(
        &self,
        target_id: &TargetId,
        target_kind: TargetKind,
    ) -> Result<Option<EntityStamp>>;

    /// Insert or replace a candidate entity
    async fn put_entity(&self, entity: &Entity) -> Result<()>;

    /// Mark an entity as modified at `at`
    async fn touch_entity(&self, target_id: &TargetId, target_kind: TargetKind, at: i64)
        -> Result<()>;

    /// Soft delete an entity
    async fn remove_entity(&self, target_id: &TargetId, target_kind: TargetKind) -> Result<()>;

    /// List live entities of a kind, newest first
    async fn list_entities(&self, target_kind: TargetKind, limit: usize) -> Result<Vec<Entity>>;
}

/// libSQL implementation of `SwipeStore`
pub struct LibSqlSwipeStore<'a> {
    conn: &'a Connection,
}

impl<'a> LibSqlSwipeStore<'a> {
    /// Create a new store with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn parse_event(row: &libsql::Row) -> Result<SwipeEvent> {
        let actor_id: String = row.get(0)?;
        let target_id: String = row.get(1)?;
        let target_kind: String = row.get(2)?;
        let action: String = row.get(3)?;

        Ok(SwipeEvent {
            actor_id: actor_id.parse()?,
            target_id: target_id
                .parse()
                .map_err(|_| Error::Persistence(format!("corrupt target id '{target_id}'")))?,
            target_kind: target_kind.parse()?,
            action: action.parse()?,
            occurred_at: row.get(4)?,
        })
    }

    fn parse_entity(row: &libsql::Row) -> Result<Entity> {
        let id: String = row.get(0)?;
        let kind: String = row.get(1)?;

        Ok(Entity {
            id: id
                .parse()
                .map_err(|_| Error::Persistence(format!("corrupt entity id '{id}'")))?,
            kind: kind.parse()?,
            created_at: row.get(2)?,
            updated_at: optional_integer(row.get_value(3)?),
            is_deleted: row.get::<i32>(4)? != 0,
        })
    }
}

fn optional_integer(value: Value) -> Option<i64> {
    match value {
        Value::Integer(v) => Some(v),
        _ => None,
    }
}

impl SwipeStore for LibSqlSwipeStore<'_> {
    async fn upsert_event(&self, event: &SwipeEvent) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO swipe_events (actor_id, target_id, target_kind, action, occurred_at)
                 VALUES (?, ?, ?, ?, ?)
                 ON CONFLICT (actor_id, target_id, target_kind)
                 DO UPDATE SET action = excluded.action, occurred_at = excluded.occurred_at",
                libsql::params![
                    event.actor_id.as_str(),
                    event.target_id.as_str(),
                    event.target_kind.as_str(),
                    event.action.as_str(),
                    event.occurred_at
                ],
            )
            .await?;
        tracing::debug!(
            target_id = %event.target_id,
            kind = %event.target_kind,
            action = %event.action,
            "Upserted swipe event"
        );
        Ok(())
    }

    async fn get_event(
        &self,
        actor_id: &ActorId,
        target_id: &TargetId,
        target_kind: TargetKind,
    ) -> Result<Option<SwipeEvent>> {
        let mut rows = self
            .conn
            .query(
                "SELECT actor_id, target_id, target_kind, action, occurred_at
                 FROM swipe_events
                 WHERE actor_id = ? AND target_id = ? AND target_kind = ?",
                libsql::params![
                    actor_id.as_str(),
                    target_id.as_str(),
                    target_kind.as_str()
                ],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(Self::parse_event(&row)?)),
            None => Ok(None),
        }
    }

    async fn delete_event(
        &self,
        actor_id: &ActorId,
        target_id: &TargetId,
        target_kind: TargetKind,
    ) -> Result<bool> {
        let rows = self
            .conn
            .execute(
                "DELETE FROM swipe_events WHERE actor_id = ? AND target_id = ? AND target_kind = ?",
                libsql::params![
                    actor_id.as_str(),
                    target_id.as_str(),
                    target_kind.as_str()
                ],
            )
            .await?;
        Ok(rows > 0)
    }

    async fn query_events(&self, query: &EventQuery) -> Result<Vec<SwipeEvent>> {
        let (clause, params) = query.where_clause();
        let sql = format!(
            "SELECT actor_id, target_id, target_kind, action, occurred_at
             FROM swipe_events
             WHERE {clause}
             ORDER BY occurred_at DESC"
        );

        let mut rows = self.conn.query(&sql, params).await?;
        let mut events = Vec::new();
        while let Some(row) = rows.next().await? {
            events.push(Self::parse_event(&row)?);
        }
        Ok(events)
    }

    async fn purge_events(&self, query: &EventQuery) -> Result<u64> {
        let (clause, params) = query.where_clause();
        let sql = format!("DELETE FROM swipe_events WHERE {clause}");
        Ok(self.conn.execute(&sql, params).await?)
    }

    async fn entity_timestamp(
        &self,
        target_id: &TargetId,
        target_kind: TargetKind,
    ) -> Result<Option<EntityStamp>> {
        let mut rows = self
            .conn
            .query(
                "SELECT created_at, updated_at FROM entities
                 WHERE id = ? AND kind = ? AND is_deleted = 0",
                libsql::params![target_id.as_str(), target_kind.as_str()],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(EntityStamp {
                created_at: row.get(0)?,
                updated_at: optional_integer(row.get_value(1)?),
            })),
            None => Ok(None),
        }
    }

    async fn put_entity(&self, entity: &Entity) -> Result<()> {
        let updated_at = entity.updated_at.map_or(Value::Null, Value::Integer);
        self.conn
            .execute(
                "INSERT OR REPLACE INTO entities (id, kind, created_at, updated_at, is_deleted)
                 VALUES (?, ?, ?, ?, ?)",
                vec![
                    Value::Text(entity.id.as_str()),
                    Value::Text(entity.kind.as_str().to_string()),
                    Value::Integer(entity.created_at),
                    updated_at,
                    Value::Integer(i64::from(entity.is_deleted)),
                ],
            )
            .await?;
        Ok(())
    }

    async fn touch_entity(
        &self,
        target_id: &TargetId,
        target_kind: TargetKind,
        at: i64,
    ) -> Result<()> {
        let rows = self
            .conn
            .execute(
                "UPDATE entities SET updated_at = ? WHERE id = ? AND kind = ? AND is_deleted = 0",
                libsql::params![at, target_id.as_str(), target_kind.as_str()],
            )
            .await?;

        if rows == 0 {
            return Err(Error::UnresolvedEntity(format!("{target_kind} {target_id}")));
        }
        Ok(())
    }

    async fn remove_entity(&self, target_id: &TargetId, target_kind: TargetKind) -> Result<()> {
        let rows = self
            .conn
            .execute(
                "UPDATE entities SET is_deleted = 1 WHERE id = ? AND kind = ? AND is_deleted = 0",
                libsql::params![target_id.as_str(), target_kind.as_str()],
            )
            .await?;

        if rows == 0 {
            return Err(Error::UnresolvedEntity(format!("{target_kind} {target_id}")));
        }
        Ok(())
    }

    async fn list_entities(&self, target_kind: TargetKind, limit: usize) -> Result<Vec<Entity>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, kind, created_at, updated_at, is_deleted
                 FROM entities
                 WHERE kind = ? AND is_deleted = 0
                 ORDER BY created_at DESC
                 LIMIT ?",
                libsql::params![target_kind.as_str(), limit as i64],
            )
            .await?;

        let mut entities = Vec::new();
        while let Some(row) = rows.next().await? {
            entities.push(Self::parse_entity(&row)?);
        }
        Ok(entities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use pretty_assertions::assert_eq;

    async fn setup() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    fn actor() -> ActorId {
        ActorId::new("actor-1").unwrap()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn upsert_overwrites_same_triple() {
        let db = setup().await;
        let store = LibSqlSwipeStore::new(db.connection());
        let target = TargetId::new();

        store
            .upsert_event(&SwipeEvent::new(
                actor(),
                target,
                TargetKind::Listing,
                SwipeAction::Pass,
                100,
            ))
            .await
            .unwrap();
        store
            .upsert_event(&SwipeEvent::new(
                actor(),
                target,
                TargetKind::Listing,
                SwipeAction::Like,
                200,
            ))
            .await
            .unwrap();

        let all = store
            .query_events(&EventQuery::new(actor(), TargetKind::Listing))
            .await
            .unwrap();
        assert_eq!(
            all,
            vec![SwipeEvent::new(
                actor(),
                target,
                TargetKind::Listing,
                SwipeAction::Like,
                200
            )]
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn same_target_different_kind_is_a_separate_row() {
        let db = setup().await;
        let store = LibSqlSwipeStore::new(db.connection());
        let target = TargetId::new();

        for kind in [TargetKind::Listing, TargetKind::Profile] {
            store
                .upsert_event(&SwipeEvent::new(actor(), target, kind, SwipeAction::Pass, 1))
                .await
                .unwrap();
        }

        assert!(store
            .get_event(&actor(), &target, TargetKind::Profile)
            .await
            .unwrap()
            .is_some());
        assert_eq!(
            store
                .query_events(&EventQuery::new(actor(), TargetKind::Listing))
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn delete_reports_missing_rows() {
        let db = setup().await;
        let store = LibSqlSwipeStore::new(db.connection());
        let target = TargetId::new();

        store
            .upsert_event(&SwipeEvent::new(
                actor(),
                target,
                TargetKind::Profile,
                SwipeAction::Pass,
                5,
            ))
            .await
            .unwrap();

        assert!(store
            .delete_event(&actor(), &target, TargetKind::Profile)
            .await
            .unwrap());
        assert!(!store
            .delete_event(&actor(), &target, TargetKind::Profile)
            .await
            .unwrap());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn query_filters_actions_and_bounds() {
        let db = setup().await;
        let store = LibSqlSwipeStore::new(db.connection());

        let like = TargetId::new();
        let pass = TargetId::new();
        let view = TargetId::new();
        let events = [
            (like, SwipeAction::Like, 100),
            (pass, SwipeAction::Pass, 200),
            (view, SwipeAction::View, 300),
        ];
        for (target, action, at) in events {
            store
                .upsert_event(&SwipeEvent::new(actor(), target, TargetKind::Listing, action, at))
                .await
                .unwrap();
        }

        let decisions = store
            .query_events(
                &EventQuery::new(actor(), TargetKind::Listing)
                    .with_actions(&[SwipeAction::Like, SwipeAction::Pass]),
            )
            .await
            .unwrap();
        assert_eq!(decisions.len(), 2);
        assert_eq!(decisions[0].target_id, pass);

        let after = store
            .query_events(
                &EventQuery::new(actor(), TargetKind::Listing).with_bound(TimeBound::After(200)),
            )
            .await
            .unwrap();
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].target_id, view);

        let purged = store
            .purge_events(
                &EventQuery::new(actor(), TargetKind::Listing)
                    .with_bound(TimeBound::AtOrBefore(200)),
            )
            .await
            .unwrap();
        assert_eq!(purged, 2);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn query_is_scoped_to_actor() {
        let db = setup().await;
        let store = LibSqlSwipeStore::new(db.connection());
        let other = ActorId::new("actor-2").unwrap();

        store
            .upsert_event(&SwipeEvent::new(
                other,
                TargetId::new(),
                TargetKind::Listing,
                SwipeAction::Pass,
                1,
            ))
            .await
            .unwrap();

        let mine = store
            .query_events(&EventQuery::new(actor(), TargetKind::Listing))
            .await
            .unwrap();
        assert!(mine.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn entity_timestamps_follow_catalog() {
        let db = setup().await;
        let store = LibSqlSwipeStore::new(db.connection());

        let entity = Entity::with_id(TargetId::new(), TargetKind::Listing, 1_000);
        store.put_entity(&entity).await.unwrap();

        let stamp = store
            .entity_timestamp(&entity.id, TargetKind::Listing)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stamp.updated_at, None);
        assert_eq!(stamp.last_modified(), 1_000);

        store
            .touch_entity(&entity.id, TargetKind::Listing, 5_000)
            .await
            .unwrap();
        let stamp = store
            .entity_timestamp(&entity.id, TargetKind::Listing)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stamp.last_modified(), 5_000);

        // Kind is part of the key
        assert!(store
            .entity_timestamp(&entity.id, TargetKind::Profile)
            .await
            .unwrap()
            .is_none());

        store
            .remove_entity(&entity.id, TargetKind::Listing)
            .await
            .unwrap();
        assert!(store
            .entity_timestamp(&entity.id, TargetKind::Listing)
            .await
            .unwrap()
            .is_none());
        assert!(store.list_entities(TargetKind::Listing, 10).await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn touch_missing_entity_is_unresolved() {
        let db = setup().await;
        let store = LibSqlSwipeStore::new(db.connection());

        let error = store
            .touch_entity(&TargetId::new(), TargetKind::Profile, 1)
            .await
            .unwrap_err();
        assert!(matches!(error, Error::UnresolvedEntity(_)));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn list_entities_newest_first() {
        let db = setup().await;
        let store = LibSqlSwipeStore::new(db.connection());

        let older = Entity::with_id(TargetId::new(), TargetKind::Profile, 10);
        let newer = Entity::with_id(TargetId::new(), TargetKind::Profile, 20);
        store.put_entity(&older).await.unwrap();
        store.put_entity(&newer).await.unwrap();

        let listed = store.list_entities(TargetKind::Profile, 10).await.unwrap();
        assert_eq!(listed, vec![newer, older]);
    }
}
