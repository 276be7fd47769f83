//! Analytic segment world for resolver tests.

use crate::collision::types::{Point2, Vec2};
use crate::layers::LayerMask;
use crate::query::{BodyId, RayHit, RaycastWorld};

#[derive(Clone, Copy, Debug)]
pub struct Segment {
    pub id: u32,
    pub a: Point2,
    pub b: Point2,
    pub layer: u8,
}

/// Two-sided line segments; the reported normal always faces the incoming ray.
#[derive(Default)]
pub struct SegmentWorld {
    segments: Vec<Segment>,
}

impl SegmentWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: u32, a: (f32, f32), b: (f32, f32), layer: u8) -> Self {
        self.segments.push(Segment {
            id,
            a: Point2::new(a.0, a.1),
            b: Point2::new(b.0, b.1),
            layer,
        });
        self
    }

    /// Infinite-ish vertical wall at `x`.
    pub fn wall(self, id: u32, x: f32, layer: u8) -> Self {
        self.with(id, (x, -100.0), (x, 100.0), layer)
    }

    /// Infinite-ish horizontal floor at `y`.
    pub fn floor(self, id: u32, y: f32, layer: u8) -> Self {
        self.with(id, (-100.0, y), (100.0, y), layer)
    }

    /// Ramp starting at `start` and rising (or falling, for negative angles) to the right.
    pub fn ramp(self, id: u32, start: (f32, f32), degrees: f32, layer: u8) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let end = (start.0 + 100.0 * cos, start.1 + 100.0 * sin);
        self.with(id, start, end, layer)
    }
}

fn cross(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

impl RaycastWorld for SegmentWorld {
    fn cast_ray(
        &self,
        origin: Point2,
        direction: Vec2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit> {
        let mut best: Option<(f32, Vec2, BodyId)> = None;

        for segment in &self.segments {
            if !mask.contains_index(segment.layer) {
                continue;
            }

            let edge = segment.b - segment.a;
            let denom = cross(direction, edge);
            if denom.abs() < 1.0e-9 {
                continue;
            }

            let to_start = segment.a - origin;
            let t = cross(to_start, edge) / denom;
            let s = cross(to_start, direction) / denom;
            if !(0.0..=max_distance).contains(&t) || !(0.0..=1.0).contains(&s) {
                continue;
            }
            if best.is_some_and(|(nearest, _, _)| nearest <= t) {
                continue;
            }

            let mut normal = Vec2::new(-edge.y, edge.x).normalize();
            if normal.dot(&direction) > 0.0 {
                normal = -normal;
            }
            best = Some((t, normal, BodyId(segment.id)));
        }

        best.map(|(t, normal, body)| RayHit::along(origin, direction, t, max_distance, normal, body))
    }
}
