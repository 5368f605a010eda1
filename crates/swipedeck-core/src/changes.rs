//! Change notifications for swipe writes.
//!
//! Successful writes are broadcast to subscribers, which filter for the actor
//! and target kind they care about.

use tokio::sync::broadcast;

use crate::models::{ActorId, SwipeEvent, TargetId, TargetKind};

const CHANNEL_CAPACITY: usize = 256;

/// A committed change to an actor's swipe events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwipeChange {
    /// An event was inserted or overwritten
    Recorded(SwipeEvent),
    /// An event was deleted (undo)
    Removed {
        actor_id: ActorId,
        target_id: TargetId,
        target_kind: TargetKind,
    },
}

impl SwipeChange {
    pub const fn actor_id(&self) -> &ActorId {
        match self {
            Self::Recorded(event) => &event.actor_id,
            Self::Removed { actor_id, .. } => actor_id,
        }
    }

    pub const fn target_kind(&self) -> TargetKind {
        match self {
            Self::Recorded(event) => event.target_kind,
            Self::Removed { target_kind, .. } => *target_kind,
        }
    }
}

/// Publisher side of the change channel
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<SwipeChange>,
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeFeed {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Publish a change; dropped silently when nobody listens
    pub fn publish(&self, change: SwipeChange) {
        let _ = self.sender.send(change);
    }

    /// Subscribe to changes for one actor and target kind
    pub fn subscribe(&self, actor_id: ActorId, target_kind: TargetKind) -> ChangeSubscription {
        ChangeSubscription {
            receiver: self.sender.subscribe(),
            actor_id,
            target_kind,
        }
    }
}

/// Filtered receiver of swipe changes
pub struct ChangeSubscription {
    receiver: broadcast::Receiver<SwipeChange>,
    actor_id: ActorId,
    target_kind: TargetKind,
}

impl ChangeSubscription {
    /// Next matching change, or `None` once the feed is gone.
    ///
    /// Changes missed while lagging are skipped.
    pub async fn next(&mut self) -> Option<SwipeChange> {
        loop {
            match self.receiver.recv().await {
                Ok(change) if self.matches(&change) => return Some(change),
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("Change subscription lagged; skipped {skipped} changes");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    fn matches(&self, change: &SwipeChange) -> bool {
        *change.actor_id() == self.actor_id && change.target_kind() == self.target_kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SwipeAction;

    fn recorded(actor: &str, kind: TargetKind) -> SwipeChange {
        SwipeChange::Recorded(SwipeEvent::new(
            ActorId::new(actor).unwrap(),
            TargetId::new(),
            kind,
            SwipeAction::Like,
            1,
        ))
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn subscription_filters_actor_and_kind() {
        let feed = ChangeFeed::new();
        let mut subscription =
            feed.subscribe(ActorId::new("me").unwrap(), TargetKind::Profile);

        feed.publish(recorded("someone-else", TargetKind::Profile));
        feed.publish(recorded("me", TargetKind::Listing));
        let wanted = recorded("me", TargetKind::Profile);
        feed.publish(wanted.clone());

        assert_eq!(subscription.next().await, Some(wanted));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn subscription_ends_when_feed_dropped() {
        let feed = ChangeFeed::new();
        let mut subscription = feed.subscribe(ActorId::new("me").unwrap(), TargetKind::Listing);
        drop(feed);
        assert_eq!(subscription.next().await, None);
    }

    #[test]
    fn publish_without_subscribers_is_harmless() {
        ChangeFeed::new().publish(recorded("me", TargetKind::Listing));
    }
}
