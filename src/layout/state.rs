use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use crate::animation::{Curve, Timeline, TimelineStatus};
use crate::environment::Environment;
use crate::geometry::Rect;
use crate::slot::{SlotId, SlotKey, SlotMap, SlotSwitcher};

use super::delegate::Geometry;

// Rect differences below this are float noise, not a size change.
const RECT_EPSILON: f64 = 1e-6;

/// Everything a layout engine remembers between passes.
///
/// Owned by exactly one engine and threaded explicitly through each pass.
/// Committed rects are where regions last settled; targets are where the
/// latest geometry pass put them. A slot in the animating set tweens from
/// committed to target on the shared timeline.
pub struct LayoutState<C> {
    pub(crate) switchers: SlotMap<SlotSwitcher<C>>,
    pub(crate) keys: SlotMap<Option<SlotKey>>,
    pub(crate) committed: SlotMap<Option<Rect>>,
    pub(crate) targets: SlotMap<Option<Rect>>,
    pub(crate) animating: BTreeSet<SlotId>,
    pub(crate) timeline: Timeline,
    pub(crate) last_env: Option<Environment>,
    pub(crate) geometry: Option<Geometry>,
    pub(crate) fingerprint: Option<blake3::Hash>,
}

impl<C> LayoutState<C> {
    pub fn new(animation: Duration, switch: Duration) -> Self {
        Self {
            switchers: SlotMap::from_fn(|_| SlotSwitcher::new(switch)),
            keys: SlotMap::default(),
            committed: SlotMap::default(),
            targets: SlotMap::default(),
            animating: BTreeSet::new(),
            timeline: Timeline::completed(animation),
            last_env: None,
            geometry: None,
            fingerprint: None,
        }
    }

    pub fn resolved_key(&self, slot: SlotId) -> Option<&SlotKey> {
        self.keys[slot].as_ref()
    }

    pub fn committed(&self, slot: SlotId) -> Option<Rect> {
        self.committed[slot]
    }

    pub fn target(&self, slot: SlotId) -> Option<Rect> {
        self.targets[slot]
    }

    pub fn is_animating(&self, slot: SlotId) -> bool {
        self.timeline.is_running() && self.animating.contains(&slot)
    }

    pub fn animating(&self) -> impl Iterator<Item = SlotId> + '_ {
        self.animating.iter().copied()
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn switcher(&self, slot: SlotId) -> &SlotSwitcher<C> {
        &self.switchers[slot]
    }

    pub fn geometry(&self) -> Option<&Geometry> {
        self.geometry.as_ref()
    }

    pub fn last_environment(&self) -> Option<&Environment> {
        self.last_env.as_ref()
    }

    /// Hash of the slot-to-config mapping that produced the cached geometry.
    pub fn fingerprint(&self) -> Option<[u8; 32]> {
        self.fingerprint.map(|hash| *hash.as_bytes())
    }

    /// True while either the shared tween or a content switch is running.
    pub fn is_in_motion(&self) -> bool {
        self.timeline.is_running()
            || self
                .switchers
                .iter()
                .any(|(_, switcher)| switcher.is_transitioning())
    }

    /// Box to draw for `slot` at the current timeline value.
    pub fn displayed(&self, slot: SlotId) -> Option<Rect> {
        let target = self.targets[slot]?;
        if !self.is_animating(slot) {
            return Some(target);
        }
        let from = self.committed[slot].unwrap_or(target);
        let t = Curve::EaseInOutCubic.transform(self.timeline.value());
        Some(from.lerp(target, t))
    }

    /// Fold the new geometry into the targets. Returns the slots whose
    /// target moved, plus any in `forced` whose content identity changed.
    pub(crate) fn retarget(&mut self, geometry: &Geometry, forced: &[SlotId]) -> Vec<SlotId> {
        let mut changed = Vec::new();
        for slot in SlotId::ALL {
            let next = geometry.rect(slot);
            match (self.targets[slot], next) {
                (_, None) => {
                    self.targets[slot] = None;
                    self.committed[slot] = None;
                    self.animating.remove(&slot);
                }
                (None, Some(rect)) => {
                    self.targets[slot] = Some(rect);
                    self.committed[slot] = Some(rect);
                }
                (Some(previous), Some(rect)) => {
                    if !previous.approx_eq(&rect, RECT_EPSILON) || forced.contains(&slot) {
                        changed.push(slot);
                    }
                }
            }
        }

        if changed.is_empty() {
            return changed;
        }

        // Restarting cancels whatever was in flight; those slots settle at
        // their old target before tweening towards the new one.
        self.timeline.reset();
        self.commit_targets();

        for &slot in &changed {
            self.targets[slot] = geometry.rect(slot);
            self.animating.insert(slot);
        }
        self.timeline.forward();
        if !self.timeline.is_running() {
            self.commit_targets();
        }
        changed
    }

    /// Advance the shared timeline and every switcher. Returns the number of
    /// regions committed when the timeline completed on this tick.
    pub(crate) fn advance(&mut self, dt: Duration) -> Option<usize> {
        for (_, switcher) in self.switchers.iter_mut() {
            switcher.tick(dt);
        }
        match self.timeline.tick(dt) {
            Some(TimelineStatus::Completed) => Some(self.commit_targets()),
            _ => None,
        }
    }

    /// Move committed rects onto their targets and clear the animating set.
    fn commit_targets(&mut self) -> usize {
        let mut committed = 0;
        for slot in SlotId::ALL {
            if self.committed[slot] != self.targets[slot] {
                self.committed[slot] = self.targets[slot];
                committed += 1;
            }
        }
        self.animating.clear();
        committed
    }
}

impl<C> fmt::Debug for LayoutState<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutState")
            .field("keys", &self.keys)
            .field("committed", &self.committed)
            .field("targets", &self.targets)
            .field("animating", &self.animating)
            .field("timeline", &self.timeline)
            .field("fingerprint", &self.fingerprint.map(|hash| hash.to_hex()))
            .finish_non_exhaustive()
    }
}
