use super::{
    frame::Frame,
    settings::SKIN_WIDTH_FUDGE,
    slope::{climb_slope, surface_angle},
    types::{Axis, Point2, ProbeKind, Vec2},
};
use crate::query::RaycastWorld;

/// Resolve the horizontal component against walls and ascending slopes.
///
/// Rays are cast bottom-to-top from the leading side of the inset box. Only the lowest ray may
/// hand over to the slope policy; once it does, the scan ends and the slope result stands.
/// Every other hit clamps `dx` to the wall minus the skin, and the remaining rays are shortened
/// to match.
pub fn move_horizontally<W: RaycastWorld + ?Sized>(frame: &mut Frame<'_, W>, delta: &mut Vec2) {
    let going_right = delta.x > 0.0;
    let skin = frame.skin_width();
    let direction = Vec2::new(if going_right { 1.0 } else { -1.0 }, 0.0);
    let initial = if going_right {
        frame.origins.bottom_right
    } else {
        frame.origins.bottom_left
    };
    let mask = frame.config.horizontal_mask();
    let step = frame.spacing.between_horizontal_rays;
    let mut ray_distance = delta.x.abs() + skin;

    for i in 0..frame.config.horizontal_rays {
        let origin = Point2::new(initial.x, initial.y + i as f32 * step);
        let Some(hit) = frame.cast(ProbeKind::Horizontal, origin, direction, ray_distance, mask)
        else {
            continue;
        };

        if i == 0 {
            let angle = surface_angle(&hit.normal);
            if climb_slope(frame, delta, angle, going_right) {
                frame.record(&hit, Axis::Horizontal);
                break;
            }
        }

        delta.x = hit.point.x - origin.x;
        ray_distance = delta.x.abs();

        if going_right {
            delta.x -= skin;
            frame.state.right = true;
        } else {
            delta.x += skin;
            frame.state.left = true;
        }

        frame.record(&hit, Axis::Horizontal);

        if ray_distance < skin + SKIN_WIDTH_FUDGE {
            break;
        }
    }
}
