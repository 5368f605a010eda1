//! Shared services used by swipedeck clients.

mod swipe;

pub use swipe::SwipeService;
