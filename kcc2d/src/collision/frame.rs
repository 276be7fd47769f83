use log::trace;

use super::{
    state::CollisionState,
    types::{Axis, ContactRecord, Point2, ProbeKind, RaySpacing, RaycastOrigins, Vec2},
};
use crate::{
    config::ControllerConfig,
    layers::LayerMask,
    query::{RayHit, RaycastWorld},
};

/// Receives every ray the controller casts, hit or not.
///
/// Hosts use this to draw probe rays; `ray` is `direction * distance`.
pub trait RayDebugSink {
    fn ray(&mut self, kind: ProbeKind, origin: Point2, ray: Vec2);
}

/// Per-call resolver context.
///
/// Borrows the controller's state and contact sequence for the duration of one
/// `move_by` call; origins are computed fresh for the call and dropped with it.
pub struct Frame<'a, W: ?Sized> {
    pub world: &'a W,
    pub config: &'a ControllerConfig,
    pub spacing: RaySpacing,
    pub origins: RaycastOrigins,
    pub state: &'a mut CollisionState,
    pub contacts: &'a mut Vec<ContactRecord>,
    pub debug: &'a mut Option<Box<dyn RayDebugSink + Send>>,
}

impl<W: RaycastWorld + ?Sized> Frame<'_, W> {
    #[inline]
    pub fn skin_width(&self) -> f32 {
        self.config.skin_width
    }

    /// Cast one probe ray, reporting it to the debug sink first.
    pub fn cast(
        &mut self,
        kind: ProbeKind,
        origin: Point2,
        direction: Vec2,
        distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit> {
        if let Some(sink) = self.debug.as_mut() {
            sink.ray(kind, origin, direction * distance);
        }

        let hit = self.world.cast_ray(origin, direction, distance, mask);
        if let Some(hit) = &hit {
            trace!(
                "{kind:?} ray hit body {} at distance {:.4} (fraction {:.3})",
                hit.body.0, hit.distance, hit.fraction
            );
        }
        hit
    }

    /// Append an accepted hit to this call's contact sequence.
    #[inline]
    pub fn record(&mut self, hit: &RayHit, axis: Axis) {
        self.contacts.push(ContactRecord::from_hit(hit, axis));
    }
}
