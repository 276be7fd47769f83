//! Rapier-based query world built from immutable level geometry.
//!
//! The controller only needs ray casts and trigger overlaps, so this builds a collision-only
//! Rapier scene: parentless colliders, a broad-phase BVH, and a borrowed `QueryPipeline` per
//! query.
//!
//! Design goals
//! - Deterministic: given the same inputs (sorted by `id`), build identical in-memory sets.
//! - Query-focused: no dynamics, nothing moves after construction.
//! - Layered: every collider carries its body id and collision layer in `user_data`.

// Re-export Rapier so hosts can build shapes without depending on `rapier2d` directly.
pub use rapier2d;

use rapier2d::na::UnitComplex;
use rapier2d::prelude::*;

use crate::collision::types::{Point2, Vec2};
use crate::layers::LayerMask;
use crate::query::{BodyId, RayHit, RaycastWorld, TriggerQuery};

/// Packed `user_data` of every collider in the world.
///
/// # Bit layout
/// - bits 0..=31  : body id (u32)
/// - bits 32..=39 : layer index (u8)
/// - bits 40..=127: reserved, zero
pub type ColliderTag = u128;

pub fn pack_tag(body: BodyId, layer: u8) -> ColliderTag {
    (body.0 as u128) | ((layer as u128) << u32::BITS)
}

pub fn unpack_body(tag: ColliderTag) -> BodyId {
    BodyId((tag & u32::MAX as u128) as u32)
}

pub fn unpack_layer(tag: ColliderTag) -> u8 {
    ((tag >> u32::BITS) & u8::MAX as u128) as u8
}

/// Canonical definition of an immutable world collider.
///
/// Conventions
/// - `rotation` is in radians, counter-clockwise.
/// - Half-spaces take their normal from the pose as `rotation * +Y`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldStaticDef {
    /// Stable unique identifier; reported back as the hit [`BodyId`].
    pub id: u32,
    /// World-space translation.
    pub translation: Vec2,
    pub rotation: f32,
    pub shape: ColliderShapeDef,
    /// Collision layer index, matched against query masks.
    pub layer: u8,
    /// Trigger regions are invisible to rays and only show up in overlap queries.
    pub trigger: bool,
}

impl WorldStaticDef {
    pub fn solid(id: u32, translation: Vec2, shape: ColliderShapeDef, layer: u8) -> Self {
        Self {
            id,
            translation,
            rotation: 0.0,
            shape,
            layer,
            trigger: false,
        }
    }

    pub fn trigger(id: u32, translation: Vec2, shape: ColliderShapeDef) -> Self {
        Self {
            trigger: true,
            ..Self::solid(id, translation, shape, 0)
        }
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    fn pose(&self) -> Isometry<Real> {
        let rotation = UnitComplex::new(self.rotation);
        let translation = match self.shape {
            ColliderShapeDef::HalfSpace {
                offset_along_normal,
            } => self.translation + (rotation * Vector::y()) * offset_along_normal,
            _ => self.translation,
        };
        Isometry::from_parts(translation.into(), rotation)
    }
}

/// Supported static collider shapes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColliderShapeDef {
    /// Infinite half-plane whose outward normal is `rotation * +Y`, shifted along that normal.
    HalfSpace { offset_along_normal: f32 },

    /// Oriented box with given half-extents.
    Cuboid { half_extents: Vec2 },

    Ball { radius: f32 },

    /// Y-aligned capsule.
    CapsuleY { radius: f32, half_height: f32 },

    /// Two-sided line segment, in local coordinates.
    Segment { a: Point2, b: Point2 },
}

/// Build a Rapier collider from a [`WorldStaticDef`], pose included.
pub fn collider_from_def(def: &WorldStaticDef) -> Collider {
    let builder = match def.shape {
        ColliderShapeDef::HalfSpace { .. } => ColliderBuilder::halfspace(Vector::y_axis()),
        ColliderShapeDef::Cuboid { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y)
        }
        ColliderShapeDef::Ball { radius } => ColliderBuilder::ball(radius),
        ColliderShapeDef::CapsuleY {
            radius,
            half_height,
        } => ColliderBuilder::capsule_y(half_height, radius),
        ColliderShapeDef::Segment { a, b } => ColliderBuilder::segment(a, b),
    };

    let mut collider = builder
        .sensor(def.trigger)
        .user_data(pack_tag(BodyId(def.id), def.layer))
        .build();
    collider.set_position(def.pose());
    collider
}

/// In-memory Rapier structures needed for scene queries against a static world.
pub struct RapierQueryWorld {
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    pub broad_phase: BroadPhaseBvh,
    pub narrow_phase: NarrowPhase,
}

impl RapierQueryWorld {
    /// Build a query world from a list of static collider definitions.
    ///
    /// The input is sorted by `id` before insertion. NaN or otherwise invalid values must be
    /// filtered by the caller.
    pub fn build(mut defs: Vec<WorldStaticDef>) -> Self {
        defs.sort_by_key(|d| d.id);

        let bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();
        let mut modified_colliders = Vec::with_capacity(defs.len());

        for def in &defs {
            let handle = colliders.insert(collider_from_def(def));
            modified_colliders.push(handle);
        }

        let mut broad_phase = BroadPhaseBvh::new();
        let mut events = Vec::new();
        broad_phase.update(
            &IntegrationParameters::default(),
            &colliders,
            &bodies,
            &modified_colliders,
            &[],
            &mut events,
        );

        Self {
            bodies,
            colliders,
            broad_phase,
            narrow_phase: NarrowPhase::default(),
        }
    }

    /// Create a borrowed `QueryPipeline` view; it lives as long as the borrow of `self`.
    pub fn query_pipeline<'a>(&'a self, filter: QueryFilter<'a>) -> QueryPipeline<'a> {
        self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            filter,
        )
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colliders.len() == 0
    }
}

impl RaycastWorld for RapierQueryWorld {
    fn cast_ray(
        &self,
        origin: Point2,
        direction: Vec2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit> {
        if mask.is_empty() {
            return None;
        }

        let in_mask = |_: ColliderHandle, collider: &Collider| {
            mask.contains_index(unpack_layer(collider.user_data))
        };
        let filter = QueryFilter::default().exclude_sensors().predicate(&in_mask);
        let pipeline = self.query_pipeline(filter);

        let ray = Ray::new(origin, direction);
        let (handle, hit) = pipeline.cast_ray_and_get_normal(&ray, max_distance.max(0.0), true)?;
        let body = unpack_body(self.colliders.get(handle)?.user_data);

        Some(RayHit::along(
            origin,
            direction,
            hit.time_of_impact,
            max_distance,
            hit.normal,
            body,
        ))
    }
}

impl TriggerQuery for RapierQueryWorld {
    fn overlapping_triggers(&self, mins: Point2, maxs: Point2) -> Vec<BodyId> {
        self.colliders
            .iter()
            .filter(|(_, collider)| collider.is_sensor())
            .filter(|(_, collider)| {
                let aabb = collider.compute_aabb();
                !(aabb.maxs.x < mins.x
                    || aabb.mins.x > maxs.x
                    || aabb.maxs.y < mins.y
                    || aabb.mins.y > maxs.y)
            })
            .map(|(_, collider)| unpack_body(collider.user_data))
            .collect()
    }
}
