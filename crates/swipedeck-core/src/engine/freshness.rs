//! Freshness reconciliation for recent pass decisions.
//!
//! A pass is lifted early when the entity changed after the decision. When
//! the entity cannot be resolved the pass stays in force.

use crate::db::SwipeStore;
use crate::error::{Error, Result};
use crate::models::{EntityStamp, SwipeAction, SwipeEvent, TargetId};

/// Whether a passed entity changed after the pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Not modified since the pass
    Unchanged,
    /// Modified strictly after the pass
    ModifiedSince,
    /// Lookup failed or the entity is gone
    Unresolved,
}

impl Freshness {
    /// Assess an event against the entity's last-modified time.
    pub fn assess(event: &SwipeEvent, last_modified: &Result<i64>) -> Self {
        match last_modified {
            Ok(at) if *at > event.occurred_at => Self::ModifiedSince,
            Ok(_) => Self::Unchanged,
            Err(_) => Self::Unresolved,
        }
    }

    /// Whether the pass should keep hiding the entity
    pub const fn keeps_exclusion(self) -> bool {
        !matches!(self, Self::ModifiedSince)
    }
}

/// Targets of `recent_passes` that remain excluded.
///
/// `last_modified` resolves each event's entity; errors fail closed.
/// Non-pass events are ignored.
pub fn reconcile<F>(recent_passes: &[SwipeEvent], mut last_modified: F) -> Vec<TargetId>
where
    F: FnMut(&SwipeEvent) -> Result<i64>,
{
    recent_passes
        .iter()
        .filter(|event| event.action == SwipeAction::Pass)
        .filter(|event| {
            let lookup = last_modified(event);
            if let Err(error) = &lookup {
                tracing::warn!(
                    target_id = %event.target_id,
                    "Keeping pass exclusion, freshness unknown: {}",
                    error
                );
            }
            Freshness::assess(event, &lookup).keeps_exclusion()
        })
        .map(|event| event.target_id)
        .collect()
}

/// Resolve an event's entity to its last-modified time.
pub async fn last_modified<S: SwipeStore>(store: &S, event: &SwipeEvent) -> Result<i64> {
    store
        .entity_timestamp(&event.target_id, event.target_kind)
        .await?
        .as_ref()
        .map(EntityStamp::last_modified)
        .ok_or_else(|| Error::UnresolvedEntity(format!("{} {}", event.target_kind, event.target_id)))
}

/// Look up every pass against the store, then reconcile.
pub async fn reconcile_with_store<S: SwipeStore>(
    store: &S,
    recent_passes: &[SwipeEvent],
) -> Vec<TargetId> {
    let passes: Vec<SwipeEvent> = recent_passes
        .iter()
        .filter(|event| event.action == SwipeAction::Pass)
        .cloned()
        .collect();

    let mut lookups = Vec::with_capacity(passes.len());
    for event in &passes {
        lookups.push(last_modified(store, event).await);
    }

    let mut resolved = lookups.into_iter();
    reconcile(&passes, |_| {
        resolved
            .next()
            .unwrap_or_else(|| Err(Error::UnresolvedEntity("lookup missing".to_string())))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActorId, TargetKind};

    fn pass_at(occurred_at: i64) -> SwipeEvent {
        SwipeEvent::new(
            ActorId::new("a").unwrap(),
            TargetId::new(),
            TargetKind::Listing,
            SwipeAction::Pass,
            occurred_at,
        )
    }

    #[test]
    fn assess_requires_strictly_newer_modification() {
        let event = pass_at(100);
        assert_eq!(Freshness::assess(&event, &Ok(101)), Freshness::ModifiedSince);
        assert_eq!(Freshness::assess(&event, &Ok(100)), Freshness::Unchanged);
        assert_eq!(Freshness::assess(&event, &Ok(5)), Freshness::Unchanged);
        assert_eq!(
            Freshness::assess(&event, &Err(Error::UnresolvedEntity("x".into()))),
            Freshness::Unresolved
        );
    }

    #[test]
    fn reconcile_drops_modified_and_keeps_the_rest() {
        let modified = pass_at(100);
        let unchanged = pass_at(100);
        let missing = pass_at(100);
        let events = vec![modified.clone(), unchanged.clone(), missing.clone()];

        let kept = reconcile(&events, |event| {
            if event.target_id == modified.target_id {
                Ok(200)
            } else if event.target_id == unchanged.target_id {
                Ok(50)
            } else {
                Err(Error::UnresolvedEntity("deleted".into()))
            }
        });

        assert_eq!(kept, vec![unchanged.target_id, missing.target_id]);
    }

    #[test]
    fn reconcile_ignores_likes() {
        let mut like = pass_at(0);
        like.action = SwipeAction::Like;
        let kept = reconcile(&[like], |_| Ok(0));
        assert!(kept.is_empty());
    }
}
