//! Slot resolution: which config a region shows at the current breakpoint,
//! and how the region transitions when that choice changes.

mod config;
mod id;
mod resolver;
mod switcher;
pub mod transitions;

pub use config::{ContentBuilder, SlotConfig, Transition, TransitionFn};
pub use id::{SlotId, SlotKey, SlotMap};
pub use resolver::{SlotEntry, SlotLayout, SlotLayoutBuilder};
pub use switcher::{
    ChildPhase, DEFAULT_SWITCH_DURATION, RenderedChild, SlotSwitcher, render_switch,
};
