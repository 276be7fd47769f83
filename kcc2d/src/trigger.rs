//! Trigger proxy: turns overlap queries into enter/stay/exit notifications.
//!
//! The controller box never lives in the query world, so nothing reports trigger overlaps
//! for it. `TriggerProxy` stands in for that: a slightly shrunken copy of the box queried
//! once per tick, diffed against the previous tick's overlaps.

use std::collections::BTreeSet;

use crate::collision::{
    settings::DEFAULT_TRIGGER_PROXY_SCALE,
    types::{Point2, Vec2},
};
use crate::config::{ConfigError, validate_trigger_scale};
use crate::controller::CharacterController2D;
use crate::query::{BodyId, TriggerQuery};

#[derive(Clone, Debug, PartialEq)]
pub struct TriggerProxy {
    scale: f32,
    inside: BTreeSet<BodyId>,
}

impl Default for TriggerProxy {
    fn default() -> Self {
        Self {
            scale: DEFAULT_TRIGGER_PROXY_SCALE,
            inside: BTreeSet::new(),
        }
    }
}

impl TriggerProxy {
    /// `scale` shrinks the footprint so that resting against a solid does not also report
    /// the trigger regions laid over it.
    pub fn new(scale: f32) -> Result<Self, ConfigError> {
        validate_trigger_scale(scale)?;
        Ok(Self {
            scale,
            inside: BTreeSet::new(),
        })
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Triggers overlapped at the last `sync`, in id order.
    pub fn inside(&self) -> impl Iterator<Item = BodyId> + '_ {
        self.inside.iter().copied()
    }

    /// World-space `(mins, maxs)` of the proxy box for the controller's current pose.
    pub fn footprint(&self, controller: &CharacterController2D) -> (Point2, Point2) {
        let transform = controller.transform();
        let collider = controller.collider();
        let center = transform.position + collider.scaled_offset(transform.scale);
        let half = proxy_half_extents(collider.size.component_mul(&transform.scale), self.scale);
        (center - half, center + half)
    }

    /// Query the world and forward the overlap changes to the controller's listeners:
    /// enters first, then stays, then exits, each in id order.
    pub fn sync<Q: TriggerQuery + ?Sized>(
        &mut self,
        world: &Q,
        controller: &mut CharacterController2D,
    ) {
        let (mins, maxs) = self.footprint(controller);
        let now: BTreeSet<BodyId> = world.overlapping_triggers(mins, maxs).into_iter().collect();

        for &body in now.difference(&self.inside) {
            controller.on_trigger_enter(body);
        }
        for &body in now.intersection(&self.inside) {
            controller.on_trigger_stay(body);
        }
        for &body in self.inside.difference(&now) {
            controller.on_trigger_exit(body);
        }

        self.inside = now;
    }

    /// Forget every overlap without notifying, e.g. after a teleport.
    pub fn clear(&mut self) {
        self.inside.clear();
    }
}

/// Half extents of a box of `size` shrunk by `scale`.
#[inline]
pub fn proxy_half_extents(size: Vec2, scale: f32) -> Vec2 {
    size.abs() * (0.5 * scale)
}
