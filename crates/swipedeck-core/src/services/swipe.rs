//! Shared swipe service used by clients.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::changes::{ChangeFeed, ChangeSubscription};
use crate::config::EngineConfig;
use crate::db::{Database, LibSqlSwipeStore, LibSqlUndoSlot, SwipeStore, SyncConfig};
use crate::deck::Deck;
use crate::engine::{ExclusionSet, SwipeEngine, SwipeStatus, UndoState};
use crate::error::{Error, Result};
use crate::models::{ActorId, Entity, SwipeAction, SwipeEvent, TargetId, TargetKind, UndoToken};
use crate::util::now_millis;

type LibSqlEngine<'a> = SwipeEngine<LibSqlSwipeStore<'a>, LibSqlUndoSlot<'a>>;

/// Thread-safe service over one device database.
///
/// Each call holds the connection for one round trip, so requests for the
/// actor are applied one at a time.
#[derive(Clone)]
pub struct SwipeService {
    db: Arc<Mutex<Database>>,
    actor_id: Option<ActorId>,
    config: EngineConfig,
    changes: ChangeFeed,
}

impl SwipeService {
    /// Open a service at the given filesystem path.
    pub async fn open_path(
        db_path: impl Into<PathBuf>,
        sync_config: Option<SyncConfig>,
        actor_id: Option<ActorId>,
        config: EngineConfig,
    ) -> Result<Self> {
        config.validate()?;
        let db_path = db_path.into();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = if let Some(sync_config) = sync_config {
            tracing::info!(
                "Sync enabled with {}",
                sync_config.url.as_deref().unwrap_or("unknown")
            );
            Database::open_with_sync(&db_path, sync_config).await?
        } else {
            tracing::info!("Running in local-only mode (no sync config)");
            Database::open(&db_path).await?
        };
        Ok(Self::from_database(db, actor_id, config))
    }

    /// Open an in-memory service (primarily for tests).
    pub async fn open_in_memory(actor_id: Option<ActorId>, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let db = Database::open_in_memory().await?;
        Ok(Self::from_database(db, actor_id, config))
    }

    fn from_database(db: Database, actor_id: Option<ActorId>, config: EngineConfig) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            actor_id,
            config,
            changes: ChangeFeed::new(),
        }
    }

    fn engine<'a>(&self, db: &'a Database) -> LibSqlEngine<'a> {
        SwipeEngine::new(
            LibSqlSwipeStore::new(db.connection()),
            LibSqlUndoSlot::new(db.connection()),
            self.actor_id.clone(),
            self.config,
        )
        .with_changes(self.changes.clone())
    }

    pub const fn actor_id(&self) -> Option<&ActorId> {
        self.actor_id.as_ref()
    }

    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Subscribe to this actor's swipe changes for one kind.
    pub fn subscribe(&self, target_kind: TargetKind) -> Result<ChangeSubscription> {
        let actor_id = self.actor_id.clone().ok_or(Error::NotAuthenticated)?;
        Ok(self.changes.subscribe(actor_id, target_kind))
    }

    /// Sync with remote DB when sync is enabled.
    pub async fn sync(&self) -> Result<()> {
        let db = self.db.lock().await;
        db.sync().await
    }

    pub async fn is_sync_enabled(&self) -> bool {
        let db = self.db.lock().await;
        db.is_sync_enabled()
    }

    /// Record a swipe now.
    pub async fn record_swipe(
        &self,
        target_id: &TargetId,
        target_kind: TargetKind,
        action: SwipeAction,
        category_hint: Option<&str>,
    ) -> Result<SwipeEvent> {
        let db = self.db.lock().await;
        self.engine(&db)
            .record_event_at(target_id, target_kind, action, category_hint, now_millis())
            .await
    }

    /// Exclusion set for the next deck.
    pub async fn exclusion_set(&self, target_kind: TargetKind) -> Result<ExclusionSet> {
        let db = self.db.lock().await;
        self.engine(&db)
            .build_exclusion_set(target_kind, now_millis())
            .await
    }

    /// Exclusion set, or empty if it cannot be read.
    pub async fn exclusion_set_or_empty(&self, target_kind: TargetKind) -> ExclusionSet {
        let db = self.db.lock().await;
        self.engine(&db)
            .exclusion_set_or_empty(target_kind, now_millis())
            .await
    }

    pub async fn undo_state(&self) -> Result<UndoState> {
        let db = self.db.lock().await;
        self.engine(&db).undo_state().await
    }

    /// Undo the most recent pass.
    pub async fn undo(&self) -> Result<UndoToken> {
        let db = self.db.lock().await;
        self.engine(&db).undo().await
    }

    pub async fn status(&self, target_kind: TargetKind) -> Result<SwipeStatus> {
        let db = self.db.lock().await;
        self.engine(&db).status(target_kind, now_millis()).await
    }

    pub async fn purge_expired(&self, target_kind: TargetKind) -> Result<u64> {
        let db = self.db.lock().await;
        self.engine(&db)
            .purge_expired(target_kind, now_millis())
            .await
    }

    /// Next deck of up to `limit` candidates.
    pub async fn deck(&self, target_kind: TargetKind, limit: usize) -> Result<Deck> {
        let db = self.db.lock().await;
        self.engine(&db)
            .assemble_deck(target_kind, limit, now_millis())
            .await
    }

    /// Add a candidate entity to the local catalog.
    pub async fn add_entity(&self, entity: &Entity) -> Result<()> {
        let db = self.db.lock().await;
        LibSqlSwipeStore::new(db.connection())
            .put_entity(entity)
            .await
    }

    /// Mark an entity as modified now.
    pub async fn touch_entity(&self, target_id: &TargetId, target_kind: TargetKind) -> Result<()> {
        let db = self.db.lock().await;
        LibSqlSwipeStore::new(db.connection())
            .touch_entity(target_id, target_kind, now_millis())
            .await
    }

    pub async fn remove_entity(&self, target_id: &TargetId, target_kind: TargetKind) -> Result<()> {
        let db = self.db.lock().await;
        LibSqlSwipeStore::new(db.connection())
            .remove_entity(target_id, target_kind)
            .await
    }

    pub async fn list_entities(&self, target_kind: TargetKind, limit: usize) -> Result<Vec<Entity>> {
        let db = self.db.lock().await;
        LibSqlSwipeStore::new(db.connection())
            .list_entities(target_kind, limit)
            .await
    }
}
