//! Layout module orchestrator.
//!
//! The delegate is the pure geometry pass; the engine wraps it with slot
//! resolution, switch transitions, and the shared tween timeline. Hosts
//! import everything from here.

mod config;
mod delegate;
mod engine;
mod frame;
mod state;

pub use config::{LayoutConfig, LayoutSettings};
pub use delegate::{Geometry, LayoutDelegate, Margins, Placement};
pub use engine::{AdaptiveLayout, AdaptiveLayoutBuilder};
pub use frame::{LayoutFrame, RegionFrame};
pub use state::LayoutState;
