//! Exclusion window arithmetic and recent/expired classification

use crate::models::SwipeEvent;

const MILLIS_PER_HOUR: i64 = 60 * 60 * 1000;

/// How long a swipe decision keeps its target out of the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExclusionWindow(i64);

impl ExclusionWindow {
    /// One calendar day
    pub const DAY: Self = Self(24 * MILLIS_PER_HOUR);

    /// Window of `hours` hours
    pub const fn from_hours(hours: u32) -> Self {
        Self(hours as i64 * MILLIS_PER_HOUR)
    }

    /// Window of `millis` milliseconds
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Length in milliseconds
    pub const fn as_millis(self) -> i64 {
        self.0
    }

    /// Whether an event at `occurred_at` is still inside the window at `now`.
    ///
    /// Strictly less-than: an event exactly `W` old has expired.
    pub const fn is_recent(self, occurred_at: i64, now: i64) -> bool {
        now.saturating_sub(occurred_at) < self.0
    }

    /// Latest `occurred_at` that counts as expired at `now`
    pub const fn expiry_cutoff(self, now: i64) -> i64 {
        now.saturating_sub(self.0)
    }
}

impl Default for ExclusionWindow {
    fn default() -> Self {
        Self::DAY
    }
}

/// Events split by window membership
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classified {
    /// Still inside the window
    pub recent: Vec<SwipeEvent>,
    /// Outside the window and eligible for recycling
    pub expired: Vec<SwipeEvent>,
}

/// Partition events into recent and expired relative to `now`.
pub fn classify(
    events: impl IntoIterator<Item = SwipeEvent>,
    now: i64,
    window: ExclusionWindow,
) -> Classified {
    let (recent, expired) = events
        .into_iter()
        .partition(|event| window.is_recent(event.occurred_at, now));
    Classified { recent, expired }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActorId, SwipeAction, TargetId, TargetKind};

    const HOUR: i64 = MILLIS_PER_HOUR;

    fn event_at(occurred_at: i64) -> SwipeEvent {
        SwipeEvent::new(
            ActorId::new("a").unwrap(),
            TargetId::new(),
            TargetKind::Listing,
            SwipeAction::Pass,
            occurred_at,
        )
    }

    #[test]
    fn boundary_resolves_to_expired() {
        let window = ExclusionWindow::DAY;
        assert!(window.is_recent(0, 24 * HOUR - 1));
        assert!(!window.is_recent(0, 24 * HOUR));
        assert!(!window.is_recent(0, 25 * HOUR));
    }

    #[test]
    fn future_events_count_as_recent() {
        // Client clock ahead of the store
        assert!(ExclusionWindow::DAY.is_recent(10 * HOUR, 0));
    }

    #[test]
    fn classify_partitions_by_age() {
        let now = 48 * HOUR;
        let events = vec![
            event_at(47 * HOUR),
            event_at(24 * HOUR),
            event_at(24 * HOUR + 1),
            event_at(0),
        ];

        let classified = classify(events, now, ExclusionWindow::DAY);
        assert_eq!(classified.recent.len(), 2);
        assert_eq!(classified.expired.len(), 2);
        assert!(classified
            .expired
            .iter()
            .all(|event| now - event.occurred_at >= 24 * HOUR));
    }

    #[test]
    fn from_hours_and_cutoff() {
        let window = ExclusionWindow::from_hours(2);
        assert_eq!(window.as_millis(), 2 * HOUR);
        assert_eq!(window.expiry_cutoff(5 * HOUR), 3 * HOUR);
        assert!(!window.is_recent(window.expiry_cutoff(5 * HOUR), 5 * HOUR));
    }
}
