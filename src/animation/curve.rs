//! Easing curves for region tweens and built-in transitions.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Curve {
    Linear,
    EaseInCubic,
    EaseOutCubic,
    /// Curve used for every region size/position tween.
    #[default]
    EaseInOutCubic,
}

impl Curve {
    /// Map linear progress to eased progress. Input is clamped to `[0, 1]`.
    pub fn transform(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Curve::Linear => t,
            Curve::EaseInCubic => t * t * t,
            Curve::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Curve::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ease_in_out_endpoints_and_midpoint() {
        let curve = Curve::EaseInOutCubic;
        assert!((curve.transform(0.0) - 0.0).abs() < 1e-9);
        assert!((curve.transform(0.5) - 0.5).abs() < 1e-9);
        assert!((curve.transform(1.0) - 1.0).abs() < 1e-9);
        // slow start, slow finish
        assert!(curve.transform(0.1) < 0.1);
        assert!(curve.transform(0.9) > 0.9);
    }

    #[test]
    fn input_is_clamped() {
        assert_eq!(Curve::Linear.transform(-1.0), 0.0);
        assert_eq!(Curve::EaseOutCubic.transform(2.0), 1.0);
    }

    #[test]
    fn ease_in_cubic_lags_linear() {
        assert!(Curve::EaseInCubic.transform(0.5) < 0.5);
        assert!(Curve::EaseOutCubic.transform(0.5) > 0.5);
    }
}
