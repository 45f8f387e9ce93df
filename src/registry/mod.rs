//! Region registry orchestrator.
//!
//! Hosts sync each [`crate::layout::LayoutFrame`] into the registry and drain
//! only the regions that changed.

mod core;

pub use core::{RegionRegistry, RegionState};
