//! Swipe deck assembly.
//!
//! A deck is the ordered queue of candidates shown to the actor, built from
//! the entity catalog with the exclusion set applied as a negative filter.

use std::collections::VecDeque;

use serde::Serialize;

use crate::engine::ExclusionSet;
use crate::models::{Entity, TargetId, TargetKind, UndoToken};

/// One candidate in the deck
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeckCard {
    pub target_id: TargetId,
    pub target_kind: TargetKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_hint: Option<String>,
}

impl From<&Entity> for DeckCard {
    fn from(entity: &Entity) -> Self {
        Self {
            target_id: entity.id,
            target_kind: entity.kind,
            category_hint: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deck {
    cards: VecDeque<DeckCard>,
}

impl Deck {
    /// Keep candidates in order, skipping excluded and deleted ones.
    pub fn assemble<'a>(
        candidates: impl IntoIterator<Item = &'a Entity>,
        exclusions: &ExclusionSet,
        limit: usize,
    ) -> Self {
        let cards = candidates
            .into_iter()
            .filter(|entity| !entity.is_deleted && !exclusions.contains(&entity.id))
            .take(limit)
            .map(DeckCard::from)
            .collect();
        Self { cards }
    }

    /// Take the next card off the front
    pub fn next_card(&mut self) -> Option<DeckCard> {
        self.cards.pop_front()
    }

    /// Put an undone candidate back at the front.
    ///
    /// Returns `false` if the candidate was already in the deck.
    pub fn restore(&mut self, token: &UndoToken) -> bool {
        if self.contains(&token.target_id) {
            return false;
        }
        self.cards.push_front(DeckCard {
            target_id: token.target_id,
            target_kind: token.target_kind,
            category_hint: token.category_hint.clone(),
        });
        true
    }

    pub fn contains(&self, target_id: &TargetId) -> bool {
        self.cards.iter().any(|card| card.target_id == *target_id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> impl Iterator<Item = &DeckCard> {
        self.cards.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActorId;
    use pretty_assertions::assert_eq;

    fn listing(created_at: i64) -> Entity {
        Entity::with_id(TargetId::new(), TargetKind::Listing, created_at)
    }

    #[test]
    fn assemble_filters_and_limits() {
        let a = listing(3);
        let b = listing(2);
        let mut c = listing(1);
        c.is_deleted = true;
        let d = listing(0);
        let exclusions: ExclusionSet = [b.id].into_iter().collect();

        let deck = Deck::assemble([&a, &b, &c, &d], &exclusions, 10);
        let ids: Vec<_> = deck.cards().map(|card| card.target_id).collect();
        assert_eq!(ids, vec![a.id, d.id]);

        let limited = Deck::assemble([&a, &b, &c, &d], &ExclusionSet::default(), 1);
        assert_eq!(limited.len(), 1);
    }

    #[test]
    fn restore_puts_card_first_once() {
        let a = listing(1);
        let mut deck = Deck::assemble([&a], &ExclusionSet::default(), 10);
        let token = UndoToken {
            actor_id: ActorId::new("me").unwrap(),
            target_id: TargetId::new(),
            target_kind: TargetKind::Listing,
            category_hint: Some("services".to_string()),
            occurred_at: 5,
        };

        assert!(deck.restore(&token));
        assert!(!deck.restore(&token));
        assert_eq!(deck.len(), 2);

        let first = deck.next_card().unwrap();
        assert_eq!(first.target_id, token.target_id);
        assert_eq!(first.category_hint.as_deref(), Some("services"));
        assert_eq!(deck.next_card().unwrap().target_id, a.id);
        assert!(deck.is_empty());
    }
}
