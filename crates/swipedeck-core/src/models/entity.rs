//! Candidate entity model

use serde::{Deserialize, Serialize};

use super::{TargetId, TargetKind};

/// Modification timestamps of a candidate entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityStamp {
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
    /// Last update timestamp (Unix ms), absent if never updated
    pub updated_at: Option<i64>,
}

impl EntityStamp {
    /// Last-modified time, falling back to creation time
    pub fn last_modified(&self) -> i64 {
        self.updated_at.unwrap_or(self.created_at)
    }
}

/// A listing or profile that can appear in a swipe deck
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier
    pub id: TargetId,
    /// Listing or profile
    pub kind: TargetKind,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
    /// Last update timestamp (Unix ms)
    pub updated_at: Option<i64>,
    /// Soft delete flag
    pub is_deleted: bool,
}

impl Entity {
    /// Create a new entity stamped with the current time
    #[must_use]
    pub fn new(kind: TargetKind) -> Self {
        Self::with_id(TargetId::new(), kind, crate::util::now_millis())
    }

    /// Create an entity with a known id and creation time
    #[must_use]
    pub const fn with_id(id: TargetId, kind: TargetKind, created_at: i64) -> Self {
        Self {
            id,
            kind,
            created_at,
            updated_at: None,
            is_deleted: false,
        }
    }

    /// Modification timestamps of this entity
    pub const fn stamp(&self) -> EntityStamp {
        EntityStamp {
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
