//! Error orchestrator; the variants live in the private `types` module.

mod types;

pub use types::{LayoutError, Result};
