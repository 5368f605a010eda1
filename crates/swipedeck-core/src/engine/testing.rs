//! Store and slot wrappers with switchable failures for engine tests

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::db::{EventQuery, LibSqlSwipeStore, LibSqlUndoSlot, SwipeStore, UndoSlot};
use crate::error::{Error, Result};
use crate::models::{ActorId, Entity, EntityStamp, SwipeEvent, TargetId, TargetKind, UndoToken};

pub struct FlakyStore<'a> {
    inner: LibSqlSwipeStore<'a>,
    writes: AtomicBool,
    reads: AtomicBool,
    entity_lookups: AtomicBool,
    fetched: AtomicUsize,
}

impl<'a> FlakyStore<'a> {
    pub const fn new(inner: LibSqlSwipeStore<'a>) -> Self {
        Self {
            inner,
            writes: AtomicBool::new(false),
            reads: AtomicBool::new(false),
            entity_lookups: AtomicBool::new(false),
            fetched: AtomicUsize::new(0),
        }
    }

    /// Total rows returned by `query_events` so far
    pub fn fetched_rows(&self) -> usize {
        self.fetched.load(Ordering::SeqCst)
    }

    pub fn fail_writes(&self, fail: bool) {
        self.writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_entity_lookups(&self, fail: bool) {
        self.entity_lookups.store(fail, Ordering::SeqCst);
    }

}

fn check(flag: &AtomicBool, what: &str) -> Result<()> {
    if flag.load(Ordering::SeqCst) {
        Err(Error::Persistence(format!("{what} unavailable")))
    } else {
        Ok(())
    }
}

impl SwipeStore for FlakyStore<'_> {
    async fn upsert_event(&self, event: &SwipeEvent) -> Result<()> {
        check(&self.writes, "upsert")?;
        self.inner.upsert_event(event).await
    }

    async fn get_event(
        &self,
        actor_id: &ActorId,
        target_id: &TargetId,
        target_kind: TargetKind,
    ) -> Result<Option<SwipeEvent>> {
        check(&self.reads, "get")?;
        self.inner.get_event(actor_id, target_id, target_kind).await
    }

    async fn delete_event(
        &self,
        actor_id: &ActorId,
        target_id: &TargetId,
        target_kind: TargetKind,
    ) -> Result<bool> {
        check(&self.writes, "delete")?;
        self.inner.delete_event(actor_id, target_id, target_kind).await
    }

    async fn query_events(&self, query: &EventQuery) -> Result<Vec<SwipeEvent>> {
        check(&self.reads, "query")?;
        let events = self.inner.query_events(query).await?;
        self.fetched.fetch_add(events.len(), Ordering::SeqCst);
        Ok(events)
    }

    async fn purge_events(&self, query: &EventQuery) -> Result<u64> {
        check(&self.writes, "purge")?;
        self.inner.purge_events(query).await
    }

    async fn entity_timestamp(
        &self,
        target_id: &TargetId,
        target_kind: TargetKind,
    ) -> Result<Option<EntityStamp>> {
        check(&self.entity_lookups, "entity lookup")?;
        self.inner.entity_timestamp(target_id, target_kind).await
    }

    async fn put_entity(&self, entity: &Entity) -> Result<()> {
        self.inner.put_entity(entity).await
    }

    async fn touch_entity(
        &self,
        target_id: &TargetId,
        target_kind: TargetKind,
        at: i64,
    ) -> Result<()> {
        self.inner.touch_entity(target_id, target_kind, at).await
    }

    async fn remove_entity(&self, target_id: &TargetId, target_kind: TargetKind) -> Result<()> {
        self.inner.remove_entity(target_id, target_kind).await
    }

    async fn list_entities(&self, target_kind: TargetKind, limit: usize) -> Result<Vec<Entity>> {
        self.inner.list_entities(target_kind, limit).await
    }
}

pub struct FlakySlot<'a> {
    inner: LibSqlUndoSlot<'a>,
    saves: AtomicBool,
    clears: AtomicBool,
}

impl<'a> FlakySlot<'a> {
    pub const fn new(inner: LibSqlUndoSlot<'a>) -> Self {
        Self {
            inner,
            saves: AtomicBool::new(false),
            clears: AtomicBool::new(false),
        }
    }

    pub fn fail_saves(&self, fail: bool) {
        self.saves.store(fail, Ordering::SeqCst);
    }

    pub fn fail_clears(&self, fail: bool) {
        self.clears.store(fail, Ordering::SeqCst);
    }
}

impl UndoSlot for FlakySlot<'_> {
    async fn load(&self) -> Result<Option<UndoToken>> {
        self.inner.load().await
    }

    async fn save(&self, token: &UndoToken) -> Result<()> {
        check(&self.saves, "slot save")?;
        self.inner.save(token).await
    }

    async fn clear(&self) -> Result<()> {
        check(&self.clears, "slot clear")?;
        self.inner.clear().await
    }
}
