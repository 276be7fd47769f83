/*!
Raycast controller settings and tolerances.

These constants centralize the defaults and valid ranges used by the
controller configuration, the resolvers and the trigger proxy. Keeping them
together makes tuning easier.

Notes
- Distances are in world units, angles in degrees.
- Ranges are enforced by `ControllerConfig::validate` and the controller setters.
*/

/// Remaining probe distances below `skin_width + SKIN_WIDTH_FUDGE` count as direct contact
/// and end the scan of the current resolver pass.
pub const SKIN_WIDTH_FUDGE: f32 = 0.001;

/// Ascending slopes only rewrite the vertical component while it stays below this value,
/// so the slope policy does not fight an active jump.
pub const SLOPE_JUMP_THRESHOLD: f32 = 0.07;

/// Surfaces whose angle to "up" rounds to this value are walls, never slopes.
pub const WALL_ANGLE_DEG: f32 = 90.0;

/// Default inset from the collider edges that rays are cast from.
/// Zero-extent casts from a touching face produce unwanted hits.
pub const DEFAULT_SKIN_WIDTH: f32 = 0.02;
pub const MIN_SKIN_WIDTH: f32 = 0.001;
pub const MAX_SKIN_WIDTH: f32 = 0.3;

/// Steepest slope angle that can be climbed.
pub const DEFAULT_SLOPE_LIMIT_DEG: f32 = 30.0;
pub const MAX_SLOPE_LIMIT_DEG: f32 = 90.0;

pub const DEFAULT_HORIZONTAL_RAYS: usize = 8;
pub const DEFAULT_VERTICAL_RAYS: usize = 4;
/// Spacing divides by `rays - 1`, so fewer than two rays is rejected.
pub const MIN_RAYS: usize = 2;

/// Length of the downward centre ray used to detect descending slopes.
pub const DEFAULT_SLOPE_PROBE_LENGTH: f32 = 2.0;

/// Trigger proxy footprint relative to the controller box.
/// Slightly smaller so touching a solid does not report as a trigger overlap.
pub const DEFAULT_TRIGGER_PROXY_SCALE: f32 = 0.95;
pub const MIN_TRIGGER_PROXY_SCALE: f32 = 0.8;
pub const MAX_TRIGGER_PROXY_SCALE: f32 = 0.999;

/// Default slope-speed curve keys as `(angle_deg, multiplier)`.
/// Negative angles are descents, positive angles ascents.
pub const DEFAULT_SLOPE_SPEED_KEYS: [(f32, f32); 3] = [(-90.0, 1.5), (0.0, 1.0), (90.0, 0.0)];
