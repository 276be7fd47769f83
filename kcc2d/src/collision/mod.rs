/*!
Collision root module.

This module holds the raycast resolver pipeline run by
`CharacterController2D::move_by`. Each pass reads and writes the shared
per-call [`frame::Frame`]:

- types:       shared data types (Transform2, BoxCollider, RaycastOrigins, ContactRecord)
- settings:    controller and tolerance constants
- probe:       inset raycast origins and ray spacing
- frame:       per-call context, ray casting and the ray debug hook
- penetration: leading top-corner pre-pass on the horizontal component
- slope:       slope-speed curve plus ascending and descending slope policy
- horizontal:  wall and ascending-slope resolution
- vertical:    floor and ceiling resolution, one-way platform filtering
- state:       per-call collision flags
*/

pub mod frame;
pub mod horizontal;
pub mod penetration;
pub mod probe;
pub mod settings;
pub mod slope;
pub mod state;
pub mod types;
pub mod vertical;

// Re-export commonly used types and functions.
pub use frame::{Frame, RayDebugSink};
pub use probe::{ray_spacing, raycast_origins};
pub use slope::{Keyframe, SlopeSpeedCurve, surface_angle};
pub use state::CollisionState;
pub use types::{
    Axis, BoxCollider, ContactRecord, Point2, ProbeKind, RaySpacing, RaycastOrigins, Transform2,
    Vec2,
};
