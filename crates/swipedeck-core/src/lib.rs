//! swipedeck-core - Core library for swipedeck
//!
//! Decides which listings and profiles an actor has already evaluated and
//! when they become eligible to reappear in the swipe deck. Contains the
//! models, the libSQL-backed store, the exclusion engine, and undo.

pub mod changes;
pub mod config;
pub mod db;
pub mod deck;
pub mod engine;
pub mod error;
pub mod models;
pub mod services;
pub mod util;

pub use error::{Error, Result};
pub use models::{ActorId, SwipeAction, SwipeEvent, TargetId, TargetKind, UndoToken};
