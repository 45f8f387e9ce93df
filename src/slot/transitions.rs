//! Stock enter/exit transitions.
//!
//! Enter transitions see progress climbing from 0 (hidden) to 1 (settled).
//! Exit transitions see progress climbing from 0 (still fully shown) to 1
//! (gone).

use crate::animation::Curve;
use crate::content::Presentable;
use crate::geometry::Offset;

use super::config::Transition;

/// Opacity follows an ease-in cubic from 0 to 1.
pub fn fade_in<C: Presentable + 'static>() -> Transition<C> {
    Transition::animated(|content: C, t| content.with_opacity(Curve::EaseInCubic.transform(t)))
}

/// Opacity follows an ease-in cubic from 1 to 0.
pub fn fade_out<C: Presentable + 'static>() -> Transition<C> {
    Transition::animated(|content: C, t| {
        content.with_opacity(1.0 - Curve::EaseInCubic.transform(t))
    })
}

/// Keeps outgoing content fully visible until it is removed.
pub fn stay_on_screen<C: Presentable + 'static>() -> Transition<C> {
    Transition::animated(|content: C, _| content.with_opacity(1.0))
}

/// Slides up from one full height below its slot.
pub fn bottom_to_top<C: Presentable + 'static>() -> Transition<C> {
    slide(Offset::new(0.0, 1.0), Offset::ZERO)
}

/// Slides down by one full height.
pub fn top_to_bottom<C: Presentable + 'static>() -> Transition<C> {
    slide(Offset::ZERO, Offset::new(0.0, 1.0))
}

/// Slides in from one full width past the left edge.
pub fn left_out_in<C: Presentable + 'static>() -> Transition<C> {
    slide(Offset::new(-1.0, 0.0), Offset::ZERO)
}

/// Slides out across the left edge.
pub fn left_in_out<C: Presentable + 'static>() -> Transition<C> {
    slide(Offset::ZERO, Offset::new(-1.0, 0.0))
}

/// Slides in from one full width past the right edge.
pub fn right_out_in<C: Presentable + 'static>() -> Transition<C> {
    slide(Offset::new(1.0, 0.0), Offset::ZERO)
}

fn slide<C: Presentable + 'static>(from: Offset, to: Offset) -> Transition<C> {
    Transition::animated(move |content: C, t| content.with_translation(from.lerp(to, t)))
}
