//! Rendering environment consumed by breakpoints and the layout delegate.
//!
//! The host fills this in from its own viewport and device-feature queries;
//! the crate never talks to a platform directly.

mod core;

pub use core::{
    DisplayFeature, DisplayFeatureKind, Environment, EnvironmentBuilder, Hinge, Platform,
};
