use crate::geometry::{Rect, Size};
use crate::slot::{ChildPhase, RenderedChild, SlotId, SlotKey};

/// One region as it should be drawn this frame.
#[derive(Debug, Clone)]
pub struct RegionFrame<C> {
    pub slot: SlotId,
    /// Displayed box; differs from `target` while the region tweens.
    pub rect: Rect,
    pub target: Rect,
    pub visible: bool,
    pub animating: bool,
    /// Rendered children, bottom to top.
    pub children: Vec<RenderedChild<C>>,
}

impl<C> RegionFrame<C> {
    /// The child drawn on top, normally the current content.
    pub fn top_child(&self) -> Option<&RenderedChild<C>> {
        self.children.last()
    }

    pub fn child_keys(&self) -> impl Iterator<Item = &SlotKey> {
        self.children.iter().map(|child| &child.key)
    }

    pub fn is_transitioning(&self) -> bool {
        self.animating
            || self
                .children
                .iter()
                .any(|child| child.phase != ChildPhase::Present)
    }
}

/// Result of a layout pass: every present region in layout order.
#[derive(Debug, Clone)]
pub struct LayoutFrame<C> {
    pub viewport: Size,
    pub regions: Vec<RegionFrame<C>>,
    /// Raw shared timeline value in `[0, 1]`.
    pub progress: f64,
    /// Whether geometry was re-solved for this frame.
    pub relayout: bool,
}

impl<C> LayoutFrame<C> {
    pub fn region(&self, slot: SlotId) -> Option<&RegionFrame<C>> {
        self.regions.iter().find(|region| region.slot == slot)
    }

    pub fn rect(&self, slot: SlotId) -> Option<Rect> {
        self.region(slot).map(|region| region.rect)
    }

    /// Content currently on top of `slot`, if any.
    pub fn content(&self, slot: SlotId) -> Option<&C> {
        self.region(slot)
            .and_then(RegionFrame::top_child)
            .map(|child| &child.content)
    }

    pub fn is_animating(&self) -> bool {
        self.regions.iter().any(RegionFrame::is_transitioning)
    }
}
