use super::types::{BoxCollider, Point2, RaySpacing, RaycastOrigins, Transform2, Vec2};

/// Compute the four corners of the collider box inset by `skin_width`.
///
/// Top corners are pulled down, bottom corners pulled up, left corners pushed right and
/// right corners pushed left, so no ray starts on a face that is already touching something.
/// Must be recomputed every call: scale and collider size may change between frames.
/// Degenerate extents (smaller than twice the skin) yield crossed but well-defined corners.
pub fn raycast_origins(
    transform: &Transform2,
    collider: &BoxCollider,
    skin_width: f32,
) -> RaycastOrigins {
    let half = collider.scaled_half_extents(transform.scale);
    let center = transform.position + collider.scaled_offset(transform.scale);

    let corner = |sx: f32, sy: f32| -> Point2 {
        Point2::new(
            center.x + sx * (half.x - skin_width),
            center.y + sy * (half.y - skin_width),
        )
    };

    RaycastOrigins {
        top_left: corner(-1.0, 1.0),
        top_right: corner(1.0, 1.0),
        bottom_left: corner(-1.0, -1.0),
        bottom_right: corner(1.0, -1.0),
    }
}

/// Distance between neighbouring rays across the inset extents.
///
/// Ray counts are validated to be at least two; the divisor is still floored at one so a
/// hand-built count can never divide by zero.
pub fn ray_spacing(
    collider: &BoxCollider,
    scale: Vec2,
    skin_width: f32,
    horizontal_rays: usize,
    vertical_rays: usize,
) -> RaySpacing {
    let useable_height = collider.size.y * scale.y.abs() - 2.0 * skin_width;
    let useable_width = collider.size.x * scale.x.abs() - 2.0 * skin_width;

    RaySpacing {
        between_horizontal_rays: useable_height / gaps(horizontal_rays),
        between_vertical_rays: useable_width / gaps(vertical_rays),
    }
}

#[inline]
fn gaps(rays: usize) -> f32 {
    rays.saturating_sub(1).max(1) as f32
}
