/*!
Core collision types and math aliases shared by the collision submodules.

This module intentionally contains no algorithms. It defines the data types
exchanged between:
- the geometry probe (raycast origins and ray spacing)
- the resolvers (horizontal, vertical, slope)
- the controller (contact records drained into notifications)
*/

use nalgebra as na;

use crate::query::{BodyId, RayHit};

/// Common math aliases for clarity and consistency.
pub type Vec2 = na::Vector2<f32>;
pub type Point2 = na::Point2<f32>;

/// Position and scale of the character in world space.
///
/// Rotation is not supported: the controller box is always axis-aligned.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform2 {
    pub position: Point2,
    /// Local scale; only its magnitude affects extents, its sign flips the collider offset.
    pub scale: Vec2,
}

impl Transform2 {
    #[inline]
    pub fn new(position: Point2, scale: Vec2) -> Self {
        Self { position, scale }
    }

    #[inline]
    pub fn at(position: Point2) -> Self {
        Self::new(position, Vec2::new(1.0, 1.0))
    }
}

impl Default for Transform2 {
    fn default() -> Self {
        Self::at(Point2::origin())
    }
}

/// Axis-aligned box used purely for geometric queries. It is never inserted into the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxCollider {
    /// Unscaled full size (width, height).
    pub size: Vec2,
    /// Unscaled centre offset from the transform position.
    pub offset: Vec2,
}

impl BoxCollider {
    #[inline]
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            offset: Vec2::zeros(),
        }
    }

    #[inline]
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Half extents after applying `|scale|`.
    #[inline]
    pub fn scaled_half_extents(&self, scale: Vec2) -> Vec2 {
        Vec2::new(self.size.x * scale.x.abs(), self.size.y * scale.y.abs()) * 0.5
    }

    /// Centre offset after applying the signed scale.
    #[inline]
    pub fn scaled_offset(&self, scale: Vec2) -> Vec2 {
        self.offset.component_mul(&scale)
    }
}

/// The four corners of the collider box, inset by the skin width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RaycastOrigins {
    pub top_left: Point2,
    pub top_right: Point2,
    pub bottom_left: Point2,
    pub bottom_right: Point2,
}

/// Distance between neighbouring rays of each resolver.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RaySpacing {
    /// Vertical gap between the horizontal rays.
    pub between_horizontal_rays: f32,
    /// Horizontal gap between the vertical rays.
    pub between_vertical_rays: f32,
}

/// The resolver pass that accepted a contact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Which probe cast a ray. Reported to ray debug sinks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProbeKind {
    Penetration,
    SlopeDescent,
    Horizontal,
    Vertical,
    RestingContact,
}

/// A ray hit accepted by a resolver during one `move_by` call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContactRecord {
    /// World-space surface point.
    pub point: Point2,
    /// Surface normal at `point`.
    pub normal: Vec2,
    /// Fraction (0..1) of the ray length where the hit occurred.
    pub fraction: f32,
    /// The body that was hit.
    pub body: BodyId,
    /// Pass that accepted the hit.
    pub axis: Axis,
}

impl ContactRecord {
    #[inline]
    pub fn from_hit(hit: &RayHit, axis: Axis) -> Self {
        Self {
            point: hit.point,
            normal: hit.normal,
            fraction: hit.fraction,
            body: hit.body,
            axis,
        }
    }
}
