pub mod common;
pub mod completions;
pub mod config;
pub mod deck;
pub mod entity;
pub mod excluded;
pub mod purge;
pub mod status;
pub mod swipe;
pub mod sync;
pub mod undo;
