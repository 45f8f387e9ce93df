//! Terminal preview of layout frames.

mod core;

pub use core::{CellRect, PreviewRenderer, PreviewSettings};
