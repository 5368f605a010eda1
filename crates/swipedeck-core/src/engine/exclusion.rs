//! Exclusion set builder

use std::collections::BTreeSet;

use serde::Serialize;

use super::freshness::reconcile_with_store;
use super::window::{classify, ExclusionWindow};
use crate::db::{EventQuery, SwipeStore, TimeBound};
use crate::error::Result;
use crate::models::{ActorId, SwipeAction, TargetId, TargetKind};

/// Targets the next deck must leave out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExclusionSet {
    targets: BTreeSet<TargetId>,
}

impl ExclusionSet {
    /// Whether `target_id` is excluded
    pub fn contains(&self, target_id: &TargetId) -> bool {
        self.targets.contains(target_id)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TargetId> {
        self.targets.iter()
    }
}

impl FromIterator<TargetId> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = TargetId>>(iter: I) -> Self {
        Self {
            targets: iter.into_iter().collect(),
        }
    }
}

/// Build the exclusion set for one actor and target kind at `now`.
///
/// Recent passes that survive freshness reconciliation, unioned with every
/// recent like. Expired decisions are filtered out by the store query and
/// never reach the engine.
pub async fn build_exclusion_set<S: SwipeStore>(
    store: &S,
    actor_id: &ActorId,
    target_kind: TargetKind,
    now: i64,
    window: ExclusionWindow,
) -> Result<ExclusionSet> {
    let query = EventQuery::new(actor_id.clone(), target_kind)
        .with_actions(&[SwipeAction::Like, SwipeAction::Pass])
        .with_bound(TimeBound::After(window.expiry_cutoff(now)));
    let events = store.query_events(&query).await?;
    let classified = classify(events, now, window);

    let (recent_likes, recent_passes): (Vec<_>, Vec<_>) = classified
        .recent
        .into_iter()
        .partition(|event| event.action == SwipeAction::Like);

    let kept_passes = reconcile_with_store(store, &recent_passes).await;
    let set: ExclusionSet = kept_passes
        .into_iter()
        .chain(recent_likes.into_iter().map(|event| event.target_id))
        .collect();

    tracing::debug!(
        kind = %target_kind,
        excluded = set.len(),
        "Built exclusion set"
    );
    Ok(set)
}
