use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};
use crate::geometry::{Rect, Size, TextDirection};

/// Host platform, used by platform-filtered breakpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Fuchsia,
    Ios,
    #[default]
    Linux,
    MacOs,
    Windows,
    Web,
}

impl Platform {
    pub fn is_desktop(self) -> bool {
        matches!(
            self,
            Platform::Fuchsia | Platform::Linux | Platform::MacOs | Platform::Windows
        )
    }

    pub fn is_mobile(self) -> bool {
        matches!(self, Platform::Android | Platform::Ios)
    }
}

/// Category of a physical display feature reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayFeatureKind {
    Hinge,
    Fold,
    Cutout,
}

/// A region of the display that content should avoid or split around.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayFeature {
    pub kind: DisplayFeatureKind,
    pub bounds: Rect,
}

/// Edges of the hinge that splits the body area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hinge {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Hinge {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    fn from_bounds(bounds: Rect) -> Self {
        Self {
            left: bounds.x,
            top: bounds.y,
            right: bounds.right(),
            bottom: bounds.bottom(),
        }
    }
}

/// Snapshot of everything breakpoints and the layout delegate may look at.
///
/// Built through [`EnvironmentBuilder`] so malformed viewport or feature data
/// is rejected before it reaches a layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    viewport: Size,
    direction: TextDirection,
    platform: Platform,
    features: Vec<DisplayFeature>,
}

impl Environment {
    pub fn builder(viewport: Size) -> EnvironmentBuilder {
        EnvironmentBuilder::new(viewport)
    }

    /// Shorthand for a left-to-right environment with no display features.
    pub fn new(viewport: Size) -> Result<Self> {
        Self::builder(viewport).build()
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn width(&self) -> f64 {
        self.viewport.width
    }

    pub fn height(&self) -> f64 {
        self.viewport.height
    }

    pub fn direction(&self) -> TextDirection {
        self.direction
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn features(&self) -> &[DisplayFeature] {
        &self.features
    }

    /// The hinge that affects layout, if any.
    ///
    /// Only hinges and folds count, and a feature whose left edge sits at the
    /// origin is treated as absent. When several qualify the last one reported
    /// wins.
    pub fn hinge(&self) -> Option<Hinge> {
        self.features
            .iter()
            .rev()
            .find(|feature| {
                matches!(
                    feature.kind,
                    DisplayFeatureKind::Hinge | DisplayFeatureKind::Fold
                ) && feature.bounds.x != 0.0
            })
            .map(|feature| Hinge::from_bounds(feature.bounds))
    }

    /// Copy of this environment at a different viewport size.
    pub fn resized(&self, viewport: Size) -> Result<Self> {
        EnvironmentBuilder {
            viewport,
            direction: self.direction,
            platform: self.platform,
            features: self.features.clone(),
        }
        .build()
    }
}

pub struct EnvironmentBuilder {
    viewport: Size,
    direction: TextDirection,
    platform: Platform,
    features: Vec<DisplayFeature>,
}

impl EnvironmentBuilder {
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            direction: TextDirection::Ltr,
            platform: Platform::default(),
            features: Vec::new(),
        }
    }

    pub fn direction(mut self, direction: TextDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn feature(mut self, kind: DisplayFeatureKind, bounds: Rect) -> Self {
        self.features.push(DisplayFeature { kind, bounds });
        self
    }

    /// Convenience for a vertical hinge spanning the full viewport height.
    pub fn hinge(self, left: f64, right: f64) -> Self {
        let height = self.viewport.height;
        self.feature(
            DisplayFeatureKind::Hinge,
            Rect::from_ltrb(left, 0.0, right, height),
        )
    }

    pub fn build(self) -> Result<Environment> {
        let Size { width, height } = self.viewport;
        if !self.viewport.is_finite() || width < 0.0 || height < 0.0 {
            return Err(LayoutError::InvalidViewport { width, height });
        }

        for feature in &self.features {
            validate_feature(feature, self.viewport)?;
        }

        Ok(Environment {
            viewport: self.viewport,
            direction: self.direction,
            platform: self.platform,
            features: self.features,
        })
    }
}

fn validate_feature(feature: &DisplayFeature, viewport: Size) -> Result<()> {
    let bounds = feature.bounds;
    if !bounds.is_finite() {
        return Err(LayoutError::InvalidHinge(format!(
            "{:?} bounds are not finite",
            feature.kind
        )));
    }
    if bounds.width < 0.0 || bounds.height < 0.0 {
        return Err(LayoutError::InvalidHinge(format!(
            "{:?} has inverted edges ({}, {}, {}, {})",
            feature.kind,
            bounds.x,
            bounds.y,
            bounds.right(),
            bounds.bottom()
        )));
    }
    if bounds.x < 0.0 || bounds.y < 0.0 || bounds.right() > viewport.width || bounds.bottom() > viewport.height
    {
        return Err(LayoutError::InvalidHinge(format!(
            "{:?} at x={} w={} lies outside the {}x{} viewport",
            feature.kind, bounds.x, bounds.width, viewport.width, viewport.height
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Size {
        Size::new(1000.0, 800.0)
    }

    #[test]
    fn hinge_flush_with_origin_is_ignored() {
        let env = Environment::builder(viewport())
            .feature(DisplayFeatureKind::Hinge, Rect::new(0.0, 0.0, 20.0, 800.0))
            .build()
            .unwrap();
        assert!(env.hinge().is_none());
    }

    #[test]
    fn last_qualifying_hinge_wins() {
        let env = Environment::builder(viewport())
            .feature(DisplayFeatureKind::Fold, Rect::new(300.0, 0.0, 0.0, 800.0))
            .feature(DisplayFeatureKind::Cutout, Rect::new(600.0, 0.0, 10.0, 10.0))
            .hinge(490.0, 510.0)
            .feature(DisplayFeatureKind::Hinge, Rect::new(0.0, 0.0, 5.0, 800.0))
            .build()
            .unwrap();
        let hinge = env.hinge().unwrap();
        assert_eq!(hinge.left, 490.0);
        assert_eq!(hinge.right, 510.0);
        assert_eq!(hinge.width(), 20.0);
    }

    #[test]
    fn cutouts_are_never_hinges() {
        let env = Environment::builder(viewport())
            .feature(DisplayFeatureKind::Cutout, Rect::new(480.0, 0.0, 40.0, 30.0))
            .build()
            .unwrap();
        assert!(env.hinge().is_none());
    }

    #[test]
    fn rejects_negative_viewport() {
        let err = Environment::new(Size::new(-1.0, 10.0)).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidViewport { .. }));
    }

    #[test]
    fn rejects_inverted_or_out_of_bounds_hinge() {
        let inverted = Environment::builder(viewport()).hinge(510.0, 490.0).build();
        assert!(matches!(inverted, Err(LayoutError::InvalidHinge(_))));

        let outside = Environment::builder(viewport()).hinge(990.0, 1010.0).build();
        assert!(matches!(outside, Err(LayoutError::InvalidHinge(_))));
    }

    #[test]
    fn resized_keeps_direction_and_platform() {
        let env = Environment::builder(viewport())
            .direction(TextDirection::Rtl)
            .platform(Platform::Android)
            .build()
            .unwrap();
        let resized = env.resized(Size::new(400.0, 800.0)).unwrap();
        assert_eq!(resized.direction(), TextDirection::Rtl);
        assert_eq!(resized.platform(), Platform::Android);
        assert_eq!(resized.width(), 400.0);
    }

    #[test]
    fn platform_families() {
        assert!(Platform::MacOs.is_desktop());
        assert!(Platform::Ios.is_mobile());
        assert!(!Platform::Web.is_desktop());
        assert!(!Platform::Web.is_mobile());
    }
}
