use std::collections::{BTreeMap, BTreeSet};

use blake3::Hash;

use crate::content::Labelled;
use crate::geometry::Rect;
use crate::layout::{LayoutFrame, RegionFrame};
use crate::slot::SlotId;

/// Last synced state of one region.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionState {
    pub rect: Rect,
    pub visible: bool,
    /// Keys of the rendered children, bottom to top.
    pub keys: Vec<String>,
    /// Covers child keys and labels, so relabelled content counts as a change.
    hash: Hash,
}

impl RegionState {
    fn new<C: Labelled>(region: &RegionFrame<C>) -> Self {
        Self {
            rect: region.rect,
            visible: region.visible,
            keys: child_keys(region),
            hash: content_hash(region),
        }
    }

    /// Apply `region`; returns whether anything a host would repaint changed.
    fn update<C: Labelled>(&mut self, region: &RegionFrame<C>) -> bool {
        let hash = content_hash(region);
        let changed =
            self.rect != region.rect || self.visible != region.visible || self.hash != hash;
        if changed {
            self.rect = region.rect;
            self.visible = region.visible;
            self.keys = child_keys(region);
            self.hash = hash;
        }
        changed
    }
}

fn child_keys<C>(region: &RegionFrame<C>) -> Vec<String> {
    region.child_keys().map(|key| key.to_string()).collect()
}

fn content_hash<C: Labelled>(region: &RegionFrame<C>) -> Hash {
    let mut hasher = blake3::Hasher::new();
    for child in &region.children {
        hasher.update(child.key.as_str().as_bytes());
        hasher.update(&[0]);
        hasher.update(child.content.label().as_bytes());
        hasher.update(&[0]);
    }
    hasher.finalize()
}

/// Tracks which regions changed between frames so hosts repaint only those.
#[derive(Debug, Default)]
pub struct RegionRegistry {
    entries: BTreeMap<SlotId, RegionState>,
    dirty: BTreeSet<SlotId>,
}

impl RegionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sync<C: Labelled>(&mut self, frame: &LayoutFrame<C>) {
        for region in &frame.regions {
            match self.entries.get_mut(&region.slot) {
                Some(state) => {
                    if state.update(region) {
                        self.dirty.insert(region.slot);
                    }
                }
                None => {
                    self.entries.insert(region.slot, RegionState::new(region));
                    self.dirty.insert(region.slot);
                }
            }
        }

        // Drop regions no longer present.
        self.entries
            .retain(|slot, _| frame.regions.iter().any(|region| region.slot == *slot));
        let entries = &self.entries;
        self.dirty.retain(|slot| entries.contains_key(slot));
    }

    /// Drain dirty regions in layout order.
    pub fn take_dirty(&mut self) -> Vec<(SlotId, RegionState)> {
        let ids = std::mem::take(&mut self.dirty);
        ids.into_iter()
            .filter_map(|slot| {
                self.entries
                    .get(&slot)
                    .map(|state| (slot, state.clone()))
            })
            .collect()
    }

    pub fn rect_of(&self, slot: SlotId) -> Option<Rect> {
        self.entries.get(&slot).map(|state| state.rect)
    }

    pub fn state_of(&self, slot: SlotId) -> Option<&RegionState> {
        self.entries.get(&slot)
    }

    pub fn has_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Block;
    use crate::geometry::Size;
    use crate::slot::{ChildPhase, RenderedChild, SlotKey};

    fn region(slot: SlotId, rect: Rect, keys: &[&str]) -> RegionFrame<Block> {
        RegionFrame {
            slot,
            rect,
            target: rect,
            visible: true,
            animating: false,
            children: keys
                .iter()
                .map(|key| RenderedChild {
                    key: SlotKey::new(*key),
                    phase: ChildPhase::Present,
                    content: Block::new(*key),
                })
                .collect(),
        }
    }

    fn frame(regions: Vec<RegionFrame<Block>>) -> LayoutFrame<Block> {
        LayoutFrame {
            viewport: Size::new(1000.0, 800.0),
            regions,
            progress: 1.0,
            relayout: true,
        }
    }

    fn body_rect() -> Rect {
        Rect::new(72.0, 0.0, 428.0, 800.0)
    }

    #[test]
    fn sync_flags_new_regions_as_dirty() {
        let mut registry = RegionRegistry::new();
        registry.sync(&frame(vec![region(SlotId::Body, body_rect(), &["body"])]));
        let dirty = registry.take_dirty();
        assert_eq!(dirty.len(), 1);
        assert_eq!(dirty[0].0, SlotId::Body);
        assert!(!registry.has_dirty());
        assert_eq!(registry.rect_of(SlotId::Body), Some(body_rect()));
    }

    #[test]
    fn unchanged_frame_is_clean() {
        let mut registry = RegionRegistry::new();
        let first = frame(vec![region(SlotId::Body, body_rect(), &["body"])]);
        registry.sync(&first);
        registry.take_dirty();
        registry.sync(&first);
        assert!(registry.take_dirty().is_empty());
    }

    #[test]
    fn child_key_changes_mark_dirty() {
        let mut registry = RegionRegistry::new();
        registry.sync(&frame(vec![region(SlotId::Body, body_rect(), &["body"])]));
        registry.take_dirty();

        registry.sync(&frame(vec![region(
            SlotId::Body,
            body_rect(),
            &["body", "small_body"],
        )]));
        let dirty = registry.take_dirty();
        assert_eq!(dirty.len(), 1);
        assert_eq!(dirty[0].1.keys, vec!["body", "small_body"]);
    }

    #[test]
    fn removed_regions_are_forgotten() {
        let mut registry = RegionRegistry::new();
        registry.sync(&frame(vec![
            region(SlotId::Body, body_rect(), &["body"]),
            region(SlotId::SecondaryBody, body_rect(), &["secondary"]),
        ]));
        registry.sync(&frame(vec![region(SlotId::Body, body_rect(), &["body"])]));
        assert!(registry.rect_of(SlotId::SecondaryBody).is_none());
        let dirty: Vec<SlotId> = registry.take_dirty().into_iter().map(|(slot, _)| slot).collect();
        assert_eq!(dirty, vec![SlotId::Body]);
    }

    #[test]
    fn relabelled_content_marks_dirty() {
        let mut registry = RegionRegistry::new();
        let rail = Rect::new(0.0, 0.0, 72.0, 800.0);
        let mut nav = region(SlotId::PrimaryNavigation, rail, &["rail"]);
        nav.children[0].content = Block::new("Rail [Inbox]");
        registry.sync(&frame(vec![nav.clone()]));
        registry.take_dirty();

        registry.sync(&frame(vec![nav.clone()]));
        assert!(!registry.has_dirty());

        nav.children[0].content = Block::new("Rail [Chat]");
        registry.sync(&frame(vec![nav]));
        let dirty = registry.take_dirty();
        assert_eq!(dirty.len(), 1);
        assert_eq!(dirty[0].1.keys, vec!["rail"]);
    }
}
