use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// The six fixed regions of an adaptive layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotId {
    TopNavigation,
    BottomNavigation,
    PrimaryNavigation,
    SecondaryNavigation,
    Body,
    SecondaryBody,
}

impl SlotId {
    /// Every slot, in the order the delegate consumes space.
    pub const ALL: [SlotId; 6] = [
        SlotId::TopNavigation,
        SlotId::BottomNavigation,
        SlotId::PrimaryNavigation,
        SlotId::SecondaryNavigation,
        SlotId::Body,
        SlotId::SecondaryBody,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SlotId::TopNavigation => "top_navigation",
            SlotId::BottomNavigation => "bottom_navigation",
            SlotId::PrimaryNavigation => "primary_navigation",
            SlotId::SecondaryNavigation => "secondary_navigation",
            SlotId::Body => "body",
            SlotId::SecondaryBody => "secondary_body",
        }
    }

    pub fn is_navigation(self) -> bool {
        !matches!(self, SlotId::Body | SlotId::SecondaryBody)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fixed-size map keyed by [`SlotId`]; iteration follows [`SlotId::ALL`].
#[derive(Debug, Clone, PartialEq)]
pub struct SlotMap<T>([T; 6]);

impl<T: Default> Default for SlotMap<T> {
    fn default() -> Self {
        Self(Default::default())
    }
}

impl<T> SlotMap<T> {
    pub fn from_fn(mut f: impl FnMut(SlotId) -> T) -> Self {
        Self(SlotId::ALL.map(&mut f))
    }

    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> {
        SlotId::ALL.into_iter().zip(self.0.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (SlotId, &mut T)> {
        SlotId::ALL.into_iter().zip(self.0.iter_mut())
    }

    pub fn map<U>(&self, mut f: impl FnMut(SlotId, &T) -> U) -> SlotMap<U> {
        SlotMap::from_fn(|slot| f(slot, &self[slot]))
    }
}

impl<T> Index<SlotId> for SlotMap<T> {
    type Output = T;

    fn index(&self, slot: SlotId) -> &T {
        &self.0[slot.index()]
    }
}

impl<T> IndexMut<SlotId> for SlotMap<T> {
    fn index_mut(&mut self, slot: SlotId) -> &mut T {
        &mut self.0[slot.index()]
    }
}

/// Identity of a slot selection. Two configs with equal keys are the same
/// logical content and never trigger a transition between each other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotKey(String);

impl SlotKey {
    /// Key shared by every empty config.
    pub const EMPTY: &'static str = "";

    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for SlotKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SlotKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_map_iterates_in_layout_order() {
        let map = SlotMap::from_fn(|slot| slot.name().len());
        let order: Vec<_> = map.iter().map(|(slot, _)| slot).collect();
        assert_eq!(order, SlotId::ALL.to_vec());
        assert_eq!(map[SlotId::Body], 4);
    }

    #[test]
    fn slot_map_index_mut() {
        let mut map: SlotMap<Option<u8>> = SlotMap::default();
        map[SlotId::SecondaryBody] = Some(3);
        assert_eq!(map[SlotId::SecondaryBody], Some(3));
        assert_eq!(map[SlotId::Body], None);
    }

    #[test]
    fn navigation_classification() {
        assert!(SlotId::PrimaryNavigation.is_navigation());
        assert!(!SlotId::SecondaryBody.is_navigation());
        assert_eq!(SlotId::SecondaryBody.to_string(), "secondary_body");
    }
}
