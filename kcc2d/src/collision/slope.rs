use log::debug;
use serde::{Deserialize, Serialize};

use super::{
    frame::Frame,
    settings::{DEFAULT_SLOPE_SPEED_KEYS, SLOPE_JUMP_THRESHOLD, WALL_ANGLE_DEG},
    types::{Point2, ProbeKind, Vec2},
};
use crate::config::{ConfigError, rejected};
use crate::query::RaycastWorld;

/// One sample of the slope-speed curve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Surface angle in degrees; negative for descents.
    pub angle: f32,
    pub multiplier: f32,
}

/// Maps a surface angle to a horizontal speed multiplier.
///
/// Keys are kept sorted by angle. Between two keys the curve is a cubic Hermite segment with
/// flat tangents, so it eases in and out of every key. Outside the key range it is clamped
/// to the first/last key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Keyframe>", into = "Vec<Keyframe>")]
pub struct SlopeSpeedCurve {
    keys: Vec<Keyframe>,
}

impl SlopeSpeedCurve {
    /// Build a curve from `(angle_deg, multiplier)` pairs in any order.
    pub fn from_keys(keys: impl IntoIterator<Item = (f32, f32)>) -> Result<Self, ConfigError> {
        let mut keys: Vec<Keyframe> = keys
            .into_iter()
            .map(|(angle, multiplier)| Keyframe { angle, multiplier })
            .collect();
        if keys.is_empty() {
            return Err(rejected(ConfigError::EmptySlopeCurve));
        }
        keys.sort_by(|a, b| a.angle.total_cmp(&b.angle));
        Ok(Self { keys })
    }

    /// A curve that never changes speed.
    pub fn constant(multiplier: f32) -> Self {
        Self {
            keys: vec![Keyframe {
                angle: 0.0,
                multiplier,
            }],
        }
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    pub fn evaluate(&self, angle: f32) -> f32 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 1.0,
        };
        if angle <= first.angle {
            return first.multiplier;
        }
        if angle >= last.angle {
            return last.multiplier;
        }

        // First key strictly past `angle`; exists because angle < last.angle.
        let upper = self.keys.partition_point(|k| k.angle <= angle);
        let (a, b) = (self.keys[upper - 1], self.keys[upper]);
        let span = b.angle - a.angle;
        if span <= 0.0 {
            return b.multiplier;
        }

        let t = (angle - a.angle) / span;
        let eased = t * t * (3.0 - 2.0 * t);
        a.multiplier + (b.multiplier - a.multiplier) * eased
    }
}

impl Default for SlopeSpeedCurve {
    fn default() -> Self {
        Self {
            keys: DEFAULT_SLOPE_SPEED_KEYS
                .iter()
                .map(|&(angle, multiplier)| Keyframe { angle, multiplier })
                .collect(),
        }
    }
}

impl TryFrom<Vec<Keyframe>> for SlopeSpeedCurve {
    type Error = ConfigError;

    fn try_from(keys: Vec<Keyframe>) -> Result<Self, Self::Error> {
        Self::from_keys(keys.into_iter().map(|k| (k.angle, k.multiplier)))
    }
}

impl From<SlopeSpeedCurve> for Vec<Keyframe> {
    fn from(curve: SlopeSpeedCurve) -> Self {
        curve.keys
    }
}

/// Unsigned angle in degrees between a surface normal and world up.
pub fn surface_angle(normal: &Vec2) -> f32 {
    let len = normal.norm();
    if len <= f32::EPSILON {
        return 0.0;
    }
    (normal.y / len).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Whether an angle counts as a wall: it rounds (ties to even) to exactly 90°.
#[inline]
pub fn is_wall_angle(angle: f32) -> bool {
    angle.round_ties_even() == WALL_ANGLE_DEG
}

/// Sign with zero counted as positive.
#[inline]
fn sign(v: f32) -> f32 {
    if v >= 0.0 { 1.0 } else { -1.0 }
}

/// Ascending-slope policy, run for a hit on the lowest horizontal ray.
///
/// Returns `false` for walls so the caller falls back to wall resolution. Any other angle is
/// handled here and ends the horizontal scan:
/// - climbable and not jumping: `dx` is scaled by the curve and stripped of the skin, `dy` is
///   rebuilt as `|tan(angle) * dx|` and the slope counts as ground.
/// - too steep: `dx` is zeroed and the hit is reported like a wall.
pub fn climb_slope<W: RaycastWorld + ?Sized>(
    frame: &mut Frame<'_, W>,
    delta: &mut Vec2,
    angle: f32,
    going_right: bool,
) -> bool {
    if is_wall_angle(angle) {
        return false;
    }

    if angle < frame.config.slope_limit {
        if delta.y < SLOPE_JUMP_THRESHOLD {
            let skin = frame.skin_width();
            delta.x *= frame.config.slope_speed_curve.evaluate(angle);
            if going_right {
                delta.x -= skin;
            } else {
                delta.x += skin;
            }
            delta.y = (angle.to_radians().tan() * delta.x).abs();
            frame.state.below = true;
        }
    } else {
        debug!(
            "slope of {angle:.1} degrees is steeper than the {:.1} degree limit",
            frame.config.slope_limit
        );
        delta.x = 0.0;
        if going_right {
            frame.state.right = true;
        } else {
            frame.state.left = true;
        }
    }

    true
}

/// Descending-slope probe, run before the resolvers when moving down while grounded.
///
/// Casts one ray down from the centre of the inset bottom edge. When the surface falls away in
/// the direction of travel (or is flat) the vertical component is set to reach the surface,
/// and the horizontal component is scaled by the curve at `-angle`.
pub fn descend_slope<W: RaycastWorld + ?Sized>(frame: &mut Frame<'_, W>, delta: &mut Vec2) {
    let bottom_left = frame.origins.bottom_left;
    let center_x = (bottom_left.x + frame.origins.bottom_right.x) * 0.5;
    let origin = Point2::new(center_x, bottom_left.y);
    let mask = frame.config.solid_mask();
    let length = frame.config.slope_probe_length;

    let Some(hit) = frame.cast(ProbeKind::SlopeDescent, origin, -Vec2::y(), length, mask) else {
        return;
    };

    let angle = surface_angle(&hit.normal);
    let moving_down_slope = angle == 0.0 || sign(hit.normal.x) == sign(delta.x);
    if !moving_down_slope {
        return;
    }

    delta.y = hit.point.y - origin.y;
    delta.x *= frame.config.slope_speed_curve.evaluate(-angle);
    frame.state.moving_down_slope = true;
    frame.state.slope_angle = angle;
    debug!("descending slope of {angle:.1} degrees, dy snapped to {:.4}", delta.y);
}
