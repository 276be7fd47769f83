//! The environment interface the controller consumes.
//!
//! The controller never owns collision geometry. It only asks a [`RaycastWorld`] for the
//! nearest hit along a ray, filtered by a [`LayerMask`]. The trigger proxy additionally
//! needs a [`TriggerQuery`] to find overlapping trigger regions.
//!
//! [`crate::rapier_world::RapierQueryWorld`] implements both on top of rapier2d.

use crate::collision::types::{Point2, Vec2};
use crate::layers::LayerMask;

/// Stable identifier of a body in the query world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

/// Nearest hit returned by a ray query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// World-space hit point.
    pub point: Point2,
    /// Unit surface normal at the hit point.
    pub normal: Vec2,
    /// Distance along the ray.
    pub distance: f32,
    /// `distance / max_distance`, in 0..=1.
    pub fraction: f32,
    pub body: BodyId,
}

impl RayHit {
    /// Build a hit from a cast `origin + direction * distance`.
    ///
    /// `direction` must be unit length.
    pub fn along(
        origin: Point2,
        direction: Vec2,
        distance: f32,
        max_distance: f32,
        normal: Vec2,
        body: BodyId,
    ) -> Self {
        let fraction = if max_distance > 0.0 {
            (distance / max_distance).clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            point: origin + direction * distance,
            normal,
            distance,
            fraction,
            body,
        }
    }
}

/// Ray queries against static collision geometry.
pub trait RaycastWorld {
    /// Cast a ray from `origin` along the unit `direction` and return the nearest hit within
    /// `max_distance` on any layer in `mask`. Trigger regions are never hit.
    fn cast_ray(
        &self,
        origin: Point2,
        direction: Vec2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit>;
}

/// Overlap queries against trigger regions.
pub trait TriggerQuery {
    /// Ids of every trigger region whose bounds overlap the box `mins..maxs`.
    fn overlapping_triggers(&self, mins: Point2, maxs: Point2) -> Vec<BodyId>;
}

impl<W: RaycastWorld + ?Sized> RaycastWorld for &W {
    fn cast_ray(
        &self,
        origin: Point2,
        direction: Vec2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit> {
        (**self).cast_ray(origin, direction, max_distance, mask)
    }
}
