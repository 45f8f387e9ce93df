//! Composition façade over the adaptive layout engine.
//!
//! Wires navigation, bodies, and transitions to the conventional
//! small/medium/large breakpoints so hosts only supply content.

mod core;

pub use core::{
    AdaptiveScaffold, ScaffoldBreakpoints, ScaffoldBuilder, ScaffoldFrame, SelectionCallback,
};
