use std::collections::HashSet;
use std::fmt;

use crate::breakpoint::Breakpoint;
use crate::environment::Environment;
use crate::error::{LayoutError, Result};

use super::config::SlotConfig;

/// One row of a slot's breakpoint table. `config == None` is an explicit
/// override to render nothing while the breakpoint is active.
pub struct SlotEntry<C> {
    pub breakpoint: Breakpoint,
    pub config: Option<SlotConfig<C>>,
}

/// Ordered breakpoint table for a single slot.
///
/// When several breakpoints are active at once the entry inserted **last**
/// wins. The table is a `Vec` so that order is part of the type, not an
/// accident of hashing.
pub struct SlotLayout<C> {
    entries: Vec<SlotEntry<C>>,
}

impl<C> Clone for SlotEntry<C> {
    fn clone(&self) -> Self {
        Self {
            breakpoint: self.breakpoint.clone(),
            config: self.config.clone(),
        }
    }
}

impl<C> fmt::Debug for SlotEntry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotEntry")
            .field("breakpoint", &self.breakpoint)
            .field("config", &self.config)
            .finish()
    }
}

impl<C> Clone for SlotLayout<C> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<C> fmt::Debug for SlotLayout<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.entries).finish()
    }
}

impl<C> SlotLayout<C> {
    pub fn builder() -> SlotLayoutBuilder<C> {
        SlotLayoutBuilder::new()
    }

    /// Build from `(breakpoint, config)` pairs, rejecting duplicate keys and
    /// content that borrows the empty key.
    pub fn new(
        entries: impl IntoIterator<Item = (Breakpoint, Option<SlotConfig<C>>)>,
    ) -> Result<Self> {
        let entries: Vec<_> = entries
            .into_iter()
            .map(|(breakpoint, config)| SlotEntry { breakpoint, config })
            .collect();

        let mut seen = HashSet::new();
        for config in entries.iter().filter_map(|entry| entry.config.as_ref()) {
            if config.key().is_empty() {
                if config.has_content() {
                    return Err(LayoutError::EmptyKey);
                }
                continue;
            }
            if !seen.insert(config.key().as_str()) {
                return Err(LayoutError::DuplicateKey {
                    key: config.key().to_string(),
                });
            }
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[SlotEntry<C>] {
        &self.entries
    }

    /// Last active entry, whether it carries a config or an empty override.
    pub fn resolve_entry(&self, env: &Environment) -> Option<&SlotEntry<C>> {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.breakpoint.is_active(env))
    }

    /// Config to render now. `None` when no breakpoint is active or the
    /// winning entry is an empty override; neither case is an error.
    pub fn resolve(&self, env: &Environment) -> Option<&SlotConfig<C>> {
        self.resolve_entry(env)
            .and_then(|entry| entry.config.as_ref())
    }

    pub fn active_breakpoint(&self, env: &Environment) -> Option<&Breakpoint> {
        self.resolve_entry(env).map(|entry| &entry.breakpoint)
    }
}

pub struct SlotLayoutBuilder<C> {
    entries: Vec<(Breakpoint, Option<SlotConfig<C>>)>,
}

impl<C> SlotLayoutBuilder<C> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Render `config` while `breakpoint` is the last active entry.
    pub fn at(mut self, breakpoint: Breakpoint, config: SlotConfig<C>) -> Self {
        self.entries.push((breakpoint, Some(config)));
        self
    }

    /// Render nothing while `breakpoint` is the last active entry.
    pub fn hide_at(mut self, breakpoint: Breakpoint) -> Self {
        self.entries.push((breakpoint, None));
        self
    }

    pub fn build(self) -> Result<SlotLayout<C>> {
        SlotLayout::new(self.entries)
    }
}

impl<C> Default for SlotLayoutBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}
