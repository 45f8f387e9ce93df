use serde::Serialize;

use crate::environment::Environment;
use crate::geometry::{Axis, Offset, Rect, Size, TextDirection};
use crate::slot::{SlotId, SlotMap};

use super::config::LayoutSettings;

/// Where a region goes and whether it draws anything.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub rect: Rect,
    pub visible: bool,
}

impl Placement {
    fn shown(rect: Rect) -> Self {
        Self {
            rect,
            visible: true,
        }
    }

    fn hidden(rect: Rect) -> Self {
        Self {
            rect,
            visible: false,
        }
    }
}

/// Space consumed by navigation regions, in physical edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Margins {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Margins {
    pub fn leading(&self, direction: TextDirection) -> f64 {
        if direction.is_ltr() {
            self.left
        } else {
            self.right
        }
    }

    pub fn trailing(&self, direction: TextDirection) -> f64 {
        if direction.is_ltr() {
            self.right
        } else {
            self.left
        }
    }

    fn add_leading(&mut self, direction: TextDirection, amount: f64) {
        if direction.is_ltr() {
            self.left += amount;
        } else {
            self.right += amount;
        }
    }

    fn add_trailing(&mut self, direction: TextDirection, amount: f64) {
        if direction.is_ltr() {
            self.right += amount;
        } else {
            self.left += amount;
        }
    }
}

/// Output of one geometry pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    /// `None` for slots that were not present.
    pub regions: SlotMap<Option<Placement>>,
    pub margins: Margins,
    /// Extent left for body and secondary body once navigation is placed.
    pub remaining: Size,
}

impl Geometry {
    pub fn placement(&self, slot: SlotId) -> Option<Placement> {
        self.regions[slot]
    }

    pub fn rect(&self, slot: SlotId) -> Option<Rect> {
        self.regions[slot].map(|placement| placement.rect)
    }

    pub fn remaining_rect(&self) -> Rect {
        Rect::from_origin_size(
            Offset::new(self.margins.left, self.margins.top),
            self.remaining,
        )
    }
}

/// Pure six-region geometry pass.
///
/// Regions consume space in a fixed order: top, bottom, primary, secondary
/// navigation, then the body split. Each step only sees what earlier steps
/// left, so the order is part of the contract.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutDelegate;

impl LayoutDelegate {
    /// Solve every region for `env`.
    ///
    /// `present` marks slots that have a layout configured at all.
    /// `secondary_has_content` is false when the secondary body resolved to
    /// nothing renderable. `measure` reports a navigation region's intrinsic
    /// size against the space still available; results are clamped to that
    /// space.
    pub fn solve(
        env: &Environment,
        settings: &LayoutSettings,
        present: &SlotMap<bool>,
        secondary_has_content: bool,
        mut measure: impl FnMut(SlotId, Size) -> Size,
    ) -> Geometry {
        let width = env.width().max(0.0);
        let height = env.height().max(0.0);
        let direction = env.direction();
        let mut regions: SlotMap<Option<Placement>> = SlotMap::default();
        let mut margins = Margins::default();

        let remaining = |margins: &Margins| {
            Size::new(
                width - margins.left - margins.right,
                height - margins.top - margins.bottom,
            )
            .non_negative()
        };

        if present[SlotId::TopNavigation] {
            let available = remaining(&margins);
            let size = measure(SlotId::TopNavigation, available).constrain(available);
            regions[SlotId::TopNavigation] = Some(Placement::shown(Rect::new(
                0.0,
                0.0,
                width,
                size.height,
            )));
            margins.top += size.height;
        }

        if present[SlotId::BottomNavigation] {
            let available = remaining(&margins);
            let size = measure(SlotId::BottomNavigation, available).constrain(available);
            regions[SlotId::BottomNavigation] = Some(Placement::shown(Rect::new(
                0.0,
                height - size.height,
                width,
                size.height,
            )));
            margins.bottom += size.height;
        }

        for (slot, leading) in [
            (SlotId::PrimaryNavigation, true),
            (SlotId::SecondaryNavigation, false),
        ] {
            if !present[slot] {
                continue;
            }
            let available = remaining(&margins);
            let size = measure(slot, available).constrain(available);
            let at_left = leading == direction.is_ltr();
            let x = if at_left {
                margins.left
            } else {
                width - margins.right - size.width
            };
            regions[slot] = Some(Placement::shown(Rect::new(
                x,
                margins.top,
                size.width,
                available.height,
            )));
            if leading {
                margins.add_leading(direction, size.width);
            } else {
                margins.add_trailing(direction, size.width);
            }
        }

        let rest = remaining(&margins);
        let area = Rect::new(margins.left, margins.top, rest.width, rest.height);
        let body = present[SlotId::Body];
        let secondary = present[SlotId::SecondaryBody];

        match (body, secondary) {
            (true, true) if secondary_has_content => {
                let (body_rect, secondary_rect) =
                    split(env, settings, &margins, area, width, height);
                regions[SlotId::Body] = Some(Placement::shown(body_rect));
                regions[SlotId::SecondaryBody] = Some(Placement::shown(secondary_rect));
            }
            (true, _) => {
                regions[SlotId::Body] = Some(Placement::shown(area));
                if secondary {
                    regions[SlotId::SecondaryBody] = Some(Placement::hidden(trailing_edge(
                        area,
                        settings.orientation,
                        direction,
                    )));
                }
            }
            (false, true) => {
                regions[SlotId::SecondaryBody] = Some(Placement {
                    rect: area,
                    visible: secondary_has_content,
                });
            }
            (false, false) => {}
        }

        Geometry {
            regions,
            margins,
            remaining: rest,
        }
    }
}

/// Zero-extent box where a contentless secondary body would begin.
fn trailing_edge(area: Rect, orientation: Axis, direction: TextDirection) -> Rect {
    match orientation {
        Axis::Vertical => Rect::new(area.x, area.bottom(), area.width, 0.0),
        Axis::Horizontal if direction.is_ltr() => {
            Rect::new(area.right(), area.y, 0.0, area.height)
        }
        Axis::Horizontal => Rect::new(area.x, area.y, 0.0, area.height),
    }
}

/// Body and secondary body rects for the remaining `area`.
fn split(
    env: &Environment,
    settings: &LayoutSettings,
    margins: &Margins,
    area: Rect,
    width: f64,
    height: f64,
) -> (Rect, Rect) {
    match settings.orientation {
        Axis::Horizontal => {
            // (start x, width) of the region on the left, then on the right.
            let (left, right) = if let Some(hinge) = env.hinge() {
                (
                    (margins.left, hinge.left - margins.left),
                    (hinge.right, width - hinge.right - margins.right),
                )
            } else if let Some(ratio) = settings.body_ratio {
                let first = if env.direction().is_ltr() {
                    ratio
                } else {
                    1.0 - ratio
                };
                let left_width = area.width * first;
                (
                    (margins.left, left_width),
                    (margins.left + left_width, area.width - left_width),
                )
            } else {
                let half = width / 2.0;
                (
                    (margins.left, half - margins.left),
                    (half, half - margins.right),
                )
            };

            let left = Rect::new(left.0, area.y, left.1.max(0.0), area.height);
            let right = Rect::new(right.0, area.y, right.1.max(0.0), area.height);
            if env.direction().is_ltr() {
                (left, right)
            } else {
                (right, left)
            }
        }
        Axis::Vertical => {
            let (body_height, secondary_top, secondary_height) =
                if let Some(ratio) = settings.body_ratio {
                    let body_height = area.height * ratio;
                    (body_height, area.y + body_height, area.height - body_height)
                } else {
                    let half = height / 2.0;
                    (half - margins.top, half, half - margins.bottom)
                };
            (
                Rect::new(area.x, area.y, area.width, body_height.max(0.0)),
                Rect::new(area.x, secondary_top, area.width, secondary_height.max(0.0)),
            )
        }
    }
}
