//! Breakpoints: named predicates over the rendering environment.

mod core;

pub use core::{
    Breakpoint, BreakpointRule, Breakpoints, MEDIUM_WIDTH, PlatformFilter, Predicate, SMALL_WIDTH,
    WidthRule,
};
