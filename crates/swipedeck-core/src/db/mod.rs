//! Database layer for swipedeck

mod connection;
mod migrations;
mod swipe_store;
mod undo_slot;

pub use connection::{Database, SyncConfig};
pub use swipe_store::{EventQuery, LibSqlSwipeStore, SwipeStore, TimeBound};
pub use undo_slot::{LibSqlUndoSlot, UndoSlot};
