//! Swipe event model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::Error;

/// Identifier of the user performing swipes.
///
/// Backend user ids are opaque strings; only surrounding whitespace is
/// normalized away.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(String);

impl ActorId {
    /// Create an actor id, rejecting blank values
    pub fn new(raw: impl AsRef<str>) -> crate::Result<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidInput("actor id must not be empty".into()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the string representation of this ID
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ActorId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// A unique identifier for a swipe target (listing or profile), using UUID v7
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(Uuid);

impl TargetId {
    /// Create a new unique target ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for TargetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TargetId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

/// What kind of entity a swipe targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// Marketplace listing (property, vehicle, service)
    Listing,
    /// Another user's profile
    Profile,
}

impl TargetKind {
    /// Stable storage representation
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Listing => "listing",
            Self::Profile => "profile",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "listing" => Ok(Self::Listing),
            "profile" => Ok(Self::Profile),
            other => Err(Error::InvalidInput(format!("unknown target kind '{other}'"))),
        }
    }
}

/// The decision recorded by a swipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeAction {
    /// Right swipe
    Like,
    /// Left swipe
    Pass,
    /// Seen without a decision
    View,
}

impl SwipeAction {
    /// Stable storage representation
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Pass => "pass",
            Self::View => "view",
        }
    }
}

impl fmt::Display for SwipeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SwipeAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "like" | "right" => Ok(Self::Like),
            "pass" | "left" => Ok(Self::Pass),
            "view" => Ok(Self::View),
            other => Err(Error::InvalidInput(format!("unknown swipe action '{other}'"))),
        }
    }
}

/// Latest decision an actor made about a target.
///
/// Stored at most once per `(actor_id, target_id, target_kind)`; a later
/// swipe on the same triple overwrites the earlier one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwipeEvent {
    /// Who swiped
    pub actor_id: ActorId,
    /// What was swiped on
    pub target_id: TargetId,
    /// Listing or profile
    pub target_kind: TargetKind,
    /// The decision
    pub action: SwipeAction,
    /// Write timestamp (Unix ms)
    pub occurred_at: i64,
}

impl SwipeEvent {
    /// Create an event stamped at `occurred_at`
    #[must_use]
    pub const fn new(
        actor_id: ActorId,
        target_id: TargetId,
        target_kind: TargetKind,
        action: SwipeAction,
        occurred_at: i64,
    ) -> Self {
        Self {
            actor_id,
            target_id,
            target_kind,
            action,
            occurred_at,
        }
    }
}
