//! Shared timeline and easing used by region tweens and slot transitions.

pub mod curve;
pub mod timeline;

pub use curve::Curve;
pub use timeline::{Timeline, TimelineStatus};
