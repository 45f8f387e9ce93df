use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};
use crate::geometry::Axis;
use crate::logging::{LAYOUT_TARGET, Logger};
use crate::metrics::LayoutMetrics;

/// Construction-time options for an adaptive layout.
///
/// Deserializable from JSON so hosts can ship layout tuning alongside the
/// rest of their configuration. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutSettings {
    /// Axis along which body and secondary body are split.
    pub orientation: Axis,
    /// Share of the remaining extent given to the body, strictly inside (0, 1).
    pub body_ratio: Option<f64>,
    /// When false, region geometry snaps to its target without tweening.
    pub internal_animations: bool,
    pub animation_duration_ms: u64,
    /// Duration of slot enter/exit transitions.
    pub switch_duration_ms: u64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            orientation: Axis::Horizontal,
            body_ratio: None,
            internal_animations: true,
            animation_duration_ms: 1000,
            switch_duration_ms: 1000,
        }
    }
}

impl LayoutSettings {
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: LayoutSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn with_orientation(mut self, orientation: Axis) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_body_ratio(mut self, ratio: f64) -> Self {
        self.body_ratio = Some(ratio);
        self
    }

    pub fn with_internal_animations(mut self, enabled: bool) -> Self {
        self.internal_animations = enabled;
        self
    }

    pub fn with_animation_duration(mut self, duration: Duration) -> Self {
        self.animation_duration_ms = duration.as_millis() as u64;
        self
    }

    pub fn with_switch_duration(mut self, duration: Duration) -> Self {
        self.switch_duration_ms = duration.as_millis() as u64;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(ratio) = self.body_ratio {
            if !ratio.is_finite() || ratio <= 0.0 || ratio >= 1.0 {
                return Err(LayoutError::InvalidRatio(ratio));
            }
        }
        if self.internal_animations && self.animation_duration_ms == 0 {
            return Err(LayoutError::InvalidDuration);
        }
        Ok(())
    }

    /// Effective tween duration; zero when internal animations are off.
    pub fn animation_duration(&self) -> Duration {
        if self.internal_animations {
            Duration::from_millis(self.animation_duration_ms)
        } else {
            Duration::ZERO
        }
    }

    pub fn switch_duration(&self) -> Duration {
        Duration::from_millis(self.switch_duration_ms)
    }
}

/// Engine configuration: validated settings plus optional observability.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    pub settings: LayoutSettings,
    /// Optional structured logger used by the engine.
    pub logger: Option<Logger>,
    /// Metrics accumulator shared with the host.
    pub metrics: Option<Arc<Mutex<LayoutMetrics>>>,
    /// Target field used for engine log events.
    pub log_target: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            settings: LayoutSettings::default(),
            logger: None,
            metrics: None,
            log_target: LAYOUT_TARGET.to_string(),
        }
    }
}

impl LayoutConfig {
    pub fn new(settings: LayoutSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            ..Self::default()
        })
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(LayoutMetrics::new())));
        }
    }

    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    pub fn metrics_handle(&self) -> Option<Arc<Mutex<LayoutMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}
