//! Swipe exclusion and recycling engine.
//!
//! `SwipeEngine` ties the pieces together for one signed-in actor: it writes
//! swipe events, keeps the undo controller in step, builds exclusion sets, and
//! assembles decks. Store failures surface as typed errors; only the
//! exclusion-set read has a fail-open variant.

mod exclusion;
mod freshness;
mod undo;
mod window;

pub use exclusion::{build_exclusion_set, ExclusionSet};
pub use freshness::{last_modified, reconcile, reconcile_with_store, Freshness};
pub use undo::{UndoController, UndoState};
pub use window::{classify, Classified, ExclusionWindow};

use serde::Serialize;

use crate::changes::{ChangeFeed, SwipeChange};
use crate::config::EngineConfig;
use crate::db::{EventQuery, SwipeStore, TimeBound, UndoSlot};
use crate::deck::Deck;
use crate::error::{Error, Result};
use crate::models::{ActorId, SwipeAction, SwipeEvent, TargetId, TargetKind, UndoToken};
use crate::util::normalize_text_option;

/// Recent/expired counts for one actor and kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SwipeStatus {
    pub recent_likes: usize,
    pub recent_passes: usize,
    pub recent_views: usize,
    pub expired: usize,
}

pub struct SwipeEngine<S, U> {
    store: S,
    slot: U,
    actor_id: Option<ActorId>,
    config: EngineConfig,
    changes: Option<ChangeFeed>,
}

impl<S: SwipeStore, U: UndoSlot> SwipeEngine<S, U> {
    pub const fn new(store: S, slot: U, actor_id: Option<ActorId>, config: EngineConfig) -> Self {
        Self {
            store,
            slot,
            actor_id,
            config,
            changes: None,
        }
    }

    /// Publish committed writes to `changes`
    #[must_use]
    pub fn with_changes(mut self, changes: ChangeFeed) -> Self {
        self.changes = Some(changes);
        self
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    fn actor(&self) -> Result<&ActorId> {
        self.actor_id.as_ref().ok_or(Error::NotAuthenticated)
    }

    fn undo_controller<'a>(&'a self, actor_id: &'a ActorId) -> UndoController<'a, U> {
        UndoController::new(&self.slot, actor_id, self.config.undo_invalidation)
    }

    fn publish(&self, change: SwipeChange) {
        if let Some(changes) = &self.changes {
            changes.publish(change);
        }
    }

    /// Record a swipe stamped with the current time.
    pub async fn record_event(
        &self,
        target_id: &TargetId,
        target_kind: TargetKind,
        action: SwipeAction,
    ) -> Result<SwipeEvent> {
        self.record_event_at(target_id, target_kind, action, None, crate::util::now_millis())
            .await
    }

    /// Record a swipe at `occurred_at`, overwriting any earlier swipe on the
    /// same target.
    ///
    /// A like clears the pending undo before the write and a pass arms it
    /// after; a failed undo transition fails the whole call.
    pub async fn record_event_at(
        &self,
        target_id: &TargetId,
        target_kind: TargetKind,
        action: SwipeAction,
        category_hint: Option<&str>,
        occurred_at: i64,
    ) -> Result<SwipeEvent> {
        let actor_id = self.actor()?;
        let event = SwipeEvent::new(actor_id.clone(), *target_id, target_kind, action, occurred_at);

        let undo = self.undo_controller(actor_id);

        // A like must clear the pending undo before it is stored
        let superseded = if action == SwipeAction::Like {
            undo.invalidate(&event).await?
        } else {
            None
        };

        if let Err(error) = self.store.upsert_event(&event).await {
            if let Some(token) = superseded {
                if let Err(rearm_error) = undo.rearm(&token).await {
                    tracing::warn!("Failed to restore undo after rejected like: {}", rearm_error);
                }
            }
            return Err(error);
        }

        if action == SwipeAction::Pass {
            let hint = normalize_text_option(category_hint.map(str::to_string));
            if let Err(error) = undo.arm(&event, hint).await {
                // An older token must not stand in for this pass
                if let Err(clear_error) = undo.clear().await {
                    tracing::warn!("Failed to drop stale undo token: {}", clear_error);
                }
                return Err(error);
            }
        }
        self.publish(SwipeChange::Recorded(event.clone()));
        Ok(event)
    }

    /// Exclusion set for the next deck of `target_kind` at `now`.
    pub async fn build_exclusion_set(
        &self,
        target_kind: TargetKind,
        now: i64,
    ) -> Result<ExclusionSet> {
        let actor_id = self.actor()?;
        build_exclusion_set(
            &self.store,
            actor_id,
            target_kind,
            now,
            self.config.exclusion_window(),
        )
        .await
    }

    /// Like `build_exclusion_set`, but degrades to an empty set on failure.
    pub async fn exclusion_set_or_empty(&self, target_kind: TargetKind, now: i64) -> ExclusionSet {
        match self.build_exclusion_set(target_kind, now).await {
            Ok(set) => set,
            Err(error) => {
                tracing::warn!("Exclusion set unavailable, showing unfiltered deck: {}", error);
                ExclusionSet::default()
            }
        }
    }

    pub async fn undo_state(&self) -> Result<UndoState> {
        let actor_id = self.actor()?;
        self.undo_controller(actor_id).state().await
    }

    /// Reverse the armed pass; the returned token tells the deck what to restore.
    pub async fn undo(&self) -> Result<UndoToken> {
        let actor_id = self.actor()?;
        let token = self.undo_controller(actor_id).undo(&self.store).await?;
        self.publish(SwipeChange::Removed {
            actor_id: token.actor_id.clone(),
            target_id: token.target_id,
            target_kind: token.target_kind,
        });
        Ok(token)
    }

    /// Recent and expired event counts at `now`.
    pub async fn status(&self, target_kind: TargetKind, now: i64) -> Result<SwipeStatus> {
        let actor_id = self.actor()?;
        let events = self
            .store
            .query_events(&EventQuery::new(actor_id.clone(), target_kind))
            .await?;
        let classified = classify(events, now, self.config.exclusion_window());

        let count = |action: SwipeAction| {
            classified
                .recent
                .iter()
                .filter(|event| event.action == action)
                .count()
        };
        Ok(SwipeStatus {
            recent_likes: count(SwipeAction::Like),
            recent_passes: count(SwipeAction::Pass),
            recent_views: count(SwipeAction::View),
            expired: classified.expired.len(),
        })
    }

    /// Delete stored events that have left the window at `now`.
    pub async fn purge_expired(&self, target_kind: TargetKind, now: i64) -> Result<u64> {
        let actor_id = self.actor()?;
        let cutoff = self.config.exclusion_window().expiry_cutoff(now);
        let query = EventQuery::new(actor_id.clone(), target_kind)
            .with_bound(TimeBound::AtOrBefore(cutoff));

        let purged = self.store.purge_events(&query).await?;
        tracing::info!(kind = %target_kind, purged, "Purged recycled swipe events");
        Ok(purged)
    }

    /// Next deck of up to `limit` candidates, newest first.
    pub async fn assemble_deck(
        &self,
        target_kind: TargetKind,
        limit: usize,
        now: i64,
    ) -> Result<Deck> {
        let exclusions = self.exclusion_set_or_empty(target_kind, now).await;
        let candidates = self
            .store
            .list_entities(target_kind, limit.saturating_add(exclusions.len()))
            .await?;
        Ok(Deck::assemble(&candidates, &exclusions, limit))
    }
}

#[cfg(test)]
mod testing;
