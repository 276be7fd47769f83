use super::{
    frame::Frame,
    settings::SKIN_WIDTH_FUDGE,
    types::{Axis, Point2, ProbeKind, Vec2},
};
use crate::query::RaycastWorld;

/// Resolve the vertical component against floors and ceilings.
///
/// Rays are cast left-to-right from the leading vertical edge, shifted by the already resolved
/// `dx` so they start where the box will be after the horizontal move. One-way platforms are
/// ignored while moving up.
pub fn move_vertically<W: RaycastWorld + ?Sized>(frame: &mut Frame<'_, W>, delta: &mut Vec2) {
    let going_up = delta.y > 0.0;
    let skin = frame.skin_width();
    let direction = Vec2::new(0.0, if going_up { 1.0 } else { -1.0 });
    let initial = if going_up {
        frame.origins.top_left
    } else {
        frame.origins.bottom_left
    };
    let start_x = initial.x + delta.x;
    let mask = frame.config.vertical_mask(going_up);
    let step = frame.spacing.between_vertical_rays;
    let mut ray_distance = delta.y.abs() + skin;

    for i in 0..frame.config.vertical_rays {
        let origin = Point2::new(start_x + i as f32 * step, initial.y);
        let Some(hit) = frame.cast(ProbeKind::Vertical, origin, direction, ray_distance, mask)
        else {
            continue;
        };

        delta.y = hit.point.y - origin.y;
        ray_distance = delta.y.abs();

        if going_up {
            delta.y -= skin;
            frame.state.above = true;
        } else {
            delta.y += skin;
            frame.state.below = true;
        }

        frame.record(&hit, Axis::Vertical);

        if ray_distance < skin + SKIN_WIDTH_FUDGE {
            return;
        }
    }
}

/// Ground check for a call that requests no vertical movement.
///
/// The bottom row is probed downward for `skin + SKIN_WIDTH_FUDGE`. A hit only sets `below`;
/// the displacement is untouched and no contact is recorded, so a resting body stays grounded
/// without re-notifying its floor every tick.
pub fn probe_resting_contact<W: RaycastWorld + ?Sized>(frame: &mut Frame<'_, W>, delta: &Vec2) {
    let initial = frame.origins.bottom_left;
    let start_x = initial.x + delta.x;
    let mask = frame.config.vertical_mask(false);
    let step = frame.spacing.between_vertical_rays;
    let distance = frame.skin_width() + SKIN_WIDTH_FUDGE;

    for i in 0..frame.config.vertical_rays {
        let origin = Point2::new(start_x + i as f32 * step, initial.y);
        if frame
            .cast(ProbeKind::RestingContact, origin, -Vec2::y(), distance, mask)
            .is_some()
        {
            frame.state.below = true;
            return;
        }
    }
}
