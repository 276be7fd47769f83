pub mod collision;
pub mod config;
pub mod controller;
pub mod events;
pub mod layers;
pub mod query;
pub mod rapier_world;
pub mod trigger;

#[cfg(test)]
mod test_world;

pub use collision::{
    BoxCollider, CollisionState, ContactRecord, Point2, ProbeKind, RayDebugSink, Transform2, Vec2,
};
pub use config::{ConfigError, ControllerConfig, MovementMode, SlopeSpeedCurve};
pub use controller::{CharacterController2D, MoveResult};
pub use events::{ControllerEvent, ListenerId};
pub use layers::{Layer, LayerMask};
pub use query::{BodyId, RayHit, RaycastWorld, TriggerQuery};
pub use rapier_world::{ColliderShapeDef, RapierQueryWorld, WorldStaticDef};
pub use trigger::TriggerProxy;
