//! Data models for swipedeck

mod entity;
mod swipe;
mod undo;

pub use entity::{Entity, EntityStamp};
pub use swipe::{ActorId, SwipeAction, SwipeEvent, TargetId, TargetKind};
pub use undo::UndoToken;
