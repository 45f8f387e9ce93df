//! Capabilities the engine needs from host content, plus a reference `Block`
//! implementation used by the scaffold, the preview renderer, and tests.
//!
//! The engine never looks inside content beyond these traits: it measures
//! navigation regions, hands the content to transition functions, and passes
//! it through to the host untouched.

use serde::{Deserialize, Serialize};

use crate::geometry::{Offset, Size};

/// Intrinsic sizing under loose constraints.
pub trait Measure {
    /// Preferred size when at most `available` space is offered. Results
    /// larger than `available` are clamped by the delegate.
    fn measure(&self, available: Size) -> Size;
}

/// Visual adjustments the built-in transitions apply.
pub trait Presentable: Sized {
    /// Multiply the current opacity by `opacity` (`0.0..=1.0`).
    fn with_opacity(self, opacity: f64) -> Self;

    /// Translate by a fraction of the content's own size.
    fn with_translation(self, fraction: Offset) -> Self;
}

/// Short human-readable name, used by the preview renderer.
pub trait Labelled {
    fn label(&self) -> &str;
}

pub const RAIL_WIDTH: f64 = 72.0;
pub const EXTENDED_RAIL_WIDTH: f64 = 192.0;
pub const BOTTOM_BAR_HEIGHT: f64 = 80.0;
pub const APP_BAR_HEIGHT: f64 = 56.0;
pub const DRAWER_WIDTH: f64 = 304.0;

/// Rectangular placeholder content with optional fixed extents.
///
/// A missing extent expands to whatever the delegate offers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub label: String,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub opacity: f64,
    pub translation: Offset,
}

impl Block {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            width: None,
            height: None,
            opacity: 1.0,
            translation: Offset::ZERO,
        }
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }
}

impl Measure for Block {
    fn measure(&self, available: Size) -> Size {
        Size::new(
            self.width.unwrap_or(available.width),
            self.height.unwrap_or(available.height),
        )
    }
}

impl Presentable for Block {
    fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = (self.opacity * opacity).clamp(0.0, 1.0);
        self
    }

    fn with_translation(mut self, fraction: Offset) -> Self {
        self.translation = Offset::new(
            self.translation.x + fraction.x,
            self.translation.y + fraction.y,
        );
        self
    }
}

impl Labelled for Block {
    fn label(&self) -> &str {
        &self.label
    }
}

/// One navigation target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub label: String,
    pub icon: String,
}

impl Destination {
    pub fn new(label: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            icon: icon.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationKind {
    BottomBar,
    Rail,
    ExtendedRail,
    Drawer,
    AppBar,
}

/// Description of a navigation surface the scaffold asks the host to build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationView {
    pub kind: NavigationKind,
    pub destinations: Vec<Destination>,
    pub selected: Option<usize>,
}

impl From<NavigationView> for Block {
    fn from(view: NavigationView) -> Self {
        let selected = view
            .selected
            .and_then(|index| view.destinations.get(index))
            .map(|dest| dest.label.as_str())
            .unwrap_or("-");
        let block = Block::new(format!("{:?} [{}]", view.kind, selected));
        match view.kind {
            NavigationKind::BottomBar => block.with_height(BOTTOM_BAR_HEIGHT),
            NavigationKind::Rail => block.with_width(RAIL_WIDTH),
            NavigationKind::ExtendedRail => block.with_width(EXTENDED_RAIL_WIDTH),
            NavigationKind::Drawer => block.with_width(DRAWER_WIDTH),
            NavigationKind::AppBar => block.with_height(APP_BAR_HEIGHT),
        }
    }
}
