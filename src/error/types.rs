use thiserror::Error;

/// Unified result type for the adaptive layout crate.
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Errors surfaced while configuring the adaptive layout engine.
///
/// Everything here is raised at construction time. A layout pass itself never
/// fails.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("body ratio {0} must lie strictly between 0 and 1")]
    InvalidRatio(f64),
    #[error("animation duration must be non-zero while internal animations are enabled")]
    InvalidDuration,
    #[error("slot key `{key}` is bound to more than one breakpoint entry")]
    DuplicateKey { key: String },
    #[error("slot content needs a non-empty key; the empty key means \"render nothing\"")]
    EmptyKey,
    #[error("breakpoint `{name}` is invalid: {reason}")]
    InvalidBreakpoint { name: String, reason: String },
    #[error("viewport {width}x{height} is not a valid size")]
    InvalidViewport { width: f64, height: f64 },
    #[error("display feature bounds are invalid: {0}")]
    InvalidHinge(String),
    #[error("navigation needs at least two destinations, got {0}")]
    TooFewDestinations(usize),
    #[error("destination index {index} out of range for {len} destinations")]
    DestinationOutOfRange { index: usize, len: usize },
    #[error("layout settings error: {0}")]
    Settings(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
