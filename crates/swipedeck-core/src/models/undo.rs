//! Undo token model

use serde::{Deserialize, Serialize};

use super::{ActorId, SwipeEvent, TargetId, TargetKind};

/// The single most recent pass decision eligible for reversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndoToken {
    /// Actor the pass belongs to
    pub actor_id: ActorId,
    /// Passed target
    pub target_id: TargetId,
    /// Listing or profile
    pub target_kind: TargetKind,
    /// Deck category the candidate came from (e.g. "vehicles")
    #[serde(default)]
    pub category_hint: Option<String>,
    /// When the pass was recorded (Unix ms)
    pub occurred_at: i64,
}

impl UndoToken {
    /// Remember a pass event
    #[must_use]
    pub fn from_pass(event: &SwipeEvent, category_hint: Option<String>) -> Self {
        Self {
            actor_id: event.actor_id.clone(),
            target_id: event.target_id,
            target_kind: event.target_kind,
            category_hint,
            occurred_at: event.occurred_at,
        }
    }

    /// Whether this token refers to the given target
    pub fn refers_to(&self, target_id: &TargetId, target_kind: TargetKind) -> bool {
        self.target_id == *target_id && self.target_kind == target_kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SwipeAction;

    #[test]
    fn token_serializes_without_hint() {
        let event = SwipeEvent::new(
            ActorId::new("a").unwrap(),
            TargetId::new(),
            TargetKind::Listing,
            SwipeAction::Pass,
            42,
        );
        let token = UndoToken::from_pass(&event, None);
        let json = serde_json::to_string(&token).unwrap();
        let decoded: UndoToken = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, token);
        assert!(decoded.refers_to(&event.target_id, TargetKind::Listing));
        assert!(!decoded.refers_to(&event.target_id, TargetKind::Profile));
    }
}
