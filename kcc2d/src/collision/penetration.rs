use super::{
    frame::Frame,
    types::{ProbeKind, Vec2},
};
use crate::query::RaycastWorld;

/// Clamp the horizontal component when the leading top corner would run into geometry.
///
/// One ray is cast from the inset top corner on the side of travel along `±x` for `|dx|`.
/// A hit scales `dx` by the hit fraction, keeping its sign. The vertical component is never
/// corrected here, and nothing is recorded as a contact or flag.
///
/// Casts against the horizontal mask, so one-way platforms are skipped here as in the
/// horizontal pass instead of being probed with the full platform mask.
pub fn correct_delta_movement<W: RaycastWorld + ?Sized>(frame: &mut Frame<'_, W>, delta: &mut Vec2) {
    if delta.x == 0.0 {
        return;
    }

    let going_right = delta.x > 0.0;
    let direction = if going_right { 1.0 } else { -1.0 };
    let distance = delta.x.abs();
    let origin = if going_right {
        frame.origins.top_right
    } else {
        frame.origins.top_left
    };
    let mask = frame.config.horizontal_mask();

    if let Some(hit) = frame.cast(
        ProbeKind::Penetration,
        origin,
        Vec2::new(direction, 0.0),
        distance,
        mask,
    ) {
        delta.x = hit.fraction * distance * direction;
    }
}
