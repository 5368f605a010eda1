//! Undo controller for the most recent pass.
//!
//! Two states: `Idle` and `Armed(token)`. A pass arms, a like invalidates
//! (scope set by `UndoInvalidation`), and `undo` consumes. The token lives in
//! an `UndoSlot` so it survives restarts.

use crate::config::UndoInvalidation;
use crate::db::{SwipeStore, UndoSlot};
use crate::error::{Error, Result};
use crate::models::{ActorId, SwipeAction, SwipeEvent, UndoToken};

/// Observable controller state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoState {
    Idle,
    Armed(UndoToken),
}

impl UndoState {
    pub const fn is_armed(&self) -> bool {
        matches!(self, Self::Armed(_))
    }
}

/// Drives undo transitions against a durable slot.
pub struct UndoController<'a, U: UndoSlot> {
    slot: &'a U,
    actor_id: &'a ActorId,
    invalidation: UndoInvalidation,
}

impl<'a, U: UndoSlot> UndoController<'a, U> {
    pub const fn new(slot: &'a U, actor_id: &'a ActorId, invalidation: UndoInvalidation) -> Self {
        Self {
            slot,
            actor_id,
            invalidation,
        }
    }

    /// Current state; a token left behind by another actor reads as `Idle`.
    pub async fn state(&self) -> Result<UndoState> {
        match self.slot.load().await? {
            Some(token) if token.actor_id == *self.actor_id => Ok(UndoState::Armed(token)),
            _ => Ok(UndoState::Idle),
        }
    }

    /// Apply the transition for a recorded swipe.
    pub async fn observe(&self, event: &SwipeEvent, category_hint: Option<String>) -> Result<()> {
        match event.action {
            SwipeAction::Pass => self.arm(event, category_hint).await,
            SwipeAction::Like => self.invalidate(event).await.map(|_| ()),
            SwipeAction::View => Ok(()),
        }
    }

    /// Remember `event` as the pass to undo.
    pub async fn arm(&self, event: &SwipeEvent, category_hint: Option<String>) -> Result<()> {
        self.slot
            .save(&UndoToken::from_pass(event, category_hint))
            .await
    }

    /// Drop the pending token if the like `event` supersedes it.
    ///
    /// Returns the dropped token so a caller whose write then fails can
    /// put it back with `rearm`.
    pub async fn invalidate(&self, event: &SwipeEvent) -> Result<Option<UndoToken>> {
        let UndoState::Armed(token) = self.state().await? else {
            return Ok(None);
        };
        let invalidates = match self.invalidation {
            UndoInvalidation::AnyLike => true,
            UndoInvalidation::SameTarget => token.refers_to(&event.target_id, event.target_kind),
        };
        if !invalidates {
            return Ok(None);
        }

        self.slot.clear().await?;
        tracing::debug!(target_id = %token.target_id, "Like superseded pending undo");
        Ok(Some(token))
    }

    pub async fn rearm(&self, token: &UndoToken) -> Result<()> {
        self.slot.save(token).await
    }

    pub async fn clear(&self) -> Result<()> {
        self.slot.clear().await
    }

    /// Reverse the armed pass: delete its event and return the token so the
    /// caller can put the candidate back at the front of the deck.
    ///
    /// A pass that was changed or removed elsewhere yields `Conflict` and the
    /// token is cleared anyway; store failures leave the token armed.
    pub async fn undo<S: SwipeStore>(&self, store: &S) -> Result<UndoToken> {
        let UndoState::Armed(token) = self.state().await? else {
            return Err(Error::NothingToUndo);
        };

        let stored = store
            .get_event(&token.actor_id, &token.target_id, token.target_kind)
            .await?;
        let still_armed_pass = stored.as_ref().is_some_and(|event| {
            event.action == SwipeAction::Pass && event.occurred_at == token.occurred_at
        });
        if !still_armed_pass {
            self.slot.clear().await?;
            return Err(Error::Conflict(format!(
                "pass on {} {} was changed or removed elsewhere",
                token.target_kind, token.target_id
            )));
        }

        let removed = store
            .delete_event(&token.actor_id, &token.target_id, token.target_kind)
            .await?;
        self.slot.clear().await?;
        if !removed {
            return Err(Error::Conflict(format!(
                "pass on {} {} was already removed",
                token.target_kind, token.target_id
            )));
        }

        tracing::info!(target_id = %token.target_id, kind = %token.target_kind, "Undid pass");
        Ok(token)
    }
}
