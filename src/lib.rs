//! Adaptive six-slot layout engine.
//!
//! Regions (top, bottom, primary and secondary navigation, body, secondary
//! body) resolve their content from ordered breakpoint tables, are placed by
//! a deterministic geometry pass that understands text direction and hinges,
//! and tween between sizes on one shared timeline. Content is generic: the
//! engine only measures it and hands it to transition functions.
//!
//! Modules follow an orchestrator `mod.rs` plus private `core` layout so the
//! public surface stays in one place per concern.

pub mod animation;
pub mod breakpoint;
pub mod content;
pub mod environment;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod registry;
pub mod render;
pub mod scaffold;
pub mod slot;
pub mod width;

pub use animation::{Curve, Timeline, TimelineStatus};
pub use breakpoint::{Breakpoint, Breakpoints, PlatformFilter, WidthRule};
pub use content::{
    Block, Destination, Labelled, Measure, NavigationKind, NavigationView, Presentable,
};
pub use environment::{DisplayFeature, DisplayFeatureKind, Environment, Hinge, Platform};
pub use error::{LayoutError, Result};
pub use geometry::{Axis, Offset, Rect, Size, TextDirection};
pub use layout::{
    AdaptiveLayout, AdaptiveLayoutBuilder, Geometry, LayoutConfig, LayoutDelegate, LayoutFrame,
    LayoutSettings, LayoutState, Margins, Placement, RegionFrame,
};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink, NullSink,
};
pub use metrics::{LayoutMetrics, MetricSnapshot};
pub use registry::{RegionRegistry, RegionState};
pub use render::{CellRect, PreviewRenderer, PreviewSettings};
pub use scaffold::{AdaptiveScaffold, ScaffoldBreakpoints, ScaffoldBuilder, ScaffoldFrame};
pub use slot::{
    ChildPhase, RenderedChild, SlotConfig, SlotId, SlotKey, SlotLayout, SlotMap, SlotSwitcher,
    Transition,
};
pub use width::display_width;
