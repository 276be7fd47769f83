use log::warn;

use crate::collision::{
    frame::{Frame, RayDebugSink},
    horizontal::move_horizontally,
    penetration::correct_delta_movement,
    probe::{ray_spacing, raycast_origins},
    slope::{SlopeSpeedCurve, descend_slope},
    state::CollisionState,
    types::{Axis, BoxCollider, ContactRecord, Point2, RaySpacing, Transform2, Vec2},
    vertical::{move_vertically, probe_resting_contact},
};
use crate::config::{
    ConfigError, ControllerConfig, MovementMode, validate_probe_length, validate_ray_count,
    validate_skin_width, validate_slope_limit,
};
use crate::events::{ControllerEvent, ListenerId, Listeners};
use crate::layers::LayerMask;
use crate::query::{BodyId, RaycastWorld};

/// Outcome of one [`CharacterController2D::move_by`] call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveResult {
    /// The displacement after collision resolution.
    pub displacement: Vec2,
    /// `displacement / dt`. In [`MovementMode::Velocity`] this is what the host should apply.
    pub velocity: Vec2,
    /// Whether `displacement` was already applied to the controller's transform.
    pub translated: bool,
}

/// Kinematic raycast controller for an axis-aligned box.
///
/// The box is never part of the query world. Each `move_by` casts rays from the inset box
/// against the world, clamps the requested displacement and reports what it touched.
pub struct CharacterController2D {
    transform: Transform2,
    collider: BoxCollider,
    config: ControllerConfig,
    spacing: RaySpacing,
    state: CollisionState,
    velocity: Vec2,
    contacts: Vec<ContactRecord>,
    listeners: Listeners,
    debug_sink: Option<Box<dyn RayDebugSink + Send>>,
}

impl CharacterController2D {
    pub fn new(
        transform: Transform2,
        collider: BoxCollider,
        mut config: ControllerConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut controller = Self {
            transform,
            collider,
            config,
            spacing: RaySpacing::default(),
            state: CollisionState::default(),
            velocity: Vec2::zeros(),
            contacts: Vec::new(),
            listeners: Listeners::default(),
            debug_sink: None,
        };
        controller.recalculate_distance_between_rays();
        Ok(controller)
    }

    /// Resolve `delta` against `world` and apply it.
    ///
    /// Order of passes: penetration pre-pass, slope descent (only when moving down and
    /// grounded at call start), horizontal, then vertical using the resolved `dx`. Collision
    /// notifications fire after the state is final, horizontal hits first.
    pub fn move_by<W: RaycastWorld + ?Sized>(
        &mut self,
        world: &W,
        delta: Vec2,
        dt: f32,
    ) -> MoveResult {
        let was_grounded = self.state.below;
        self.state.reset();
        self.contacts.clear();

        let mut delta = delta;
        let origins = raycast_origins(&self.transform, &self.collider, self.config.skin_width);
        {
            let mut frame = Frame {
                world,
                config: &self.config,
                spacing: self.spacing,
                origins,
                state: &mut self.state,
                contacts: &mut self.contacts,
                debug: &mut self.debug_sink,
            };

            correct_delta_movement(&mut frame, &mut delta);

            if delta.y < 0.0 && was_grounded {
                descend_slope(&mut frame, &mut delta);
            }

            if delta.x != 0.0 {
                move_horizontally(&mut frame, &mut delta);
            }

            if delta.y != 0.0 {
                move_vertically(&mut frame, &mut delta);
            } else {
                probe_resting_contact(&mut frame, &delta);
            }
        }

        let translated = self.apply(delta, dt);

        if !was_grounded && self.state.below {
            self.state.became_grounded_this_frame = true;
        }

        for contact in self.contacts.drain(..) {
            self.listeners.emit(&ControllerEvent::Collided(contact));
        }

        MoveResult {
            displacement: delta,
            velocity: self.velocity,
            translated,
        }
    }

    fn apply(&mut self, delta: Vec2, dt: f32) -> bool {
        match self.config.movement_mode {
            MovementMode::Translate => {
                self.transform.position += delta;
                // Keep the last velocity for a zero-length tick.
                if dt > 0.0 {
                    self.velocity = delta / dt;
                }
                true
            }
            MovementMode::Velocity => {
                if dt > 0.0 {
                    self.velocity = delta / dt;
                } else {
                    warn!("velocity movement needs a positive dt, got {dt}; reporting zero velocity");
                    self.velocity = Vec2::zeros();
                }
                false
            }
        }
    }

    /// Recompute the gap between rays. Needed after any change to the collider size, the
    /// scale, the skin width or the ray counts; every setter here already calls it.
    pub fn recalculate_distance_between_rays(&mut self) {
        self.spacing = ray_spacing(
            &self.collider,
            self.transform.scale,
            self.config.skin_width,
            self.config.horizontal_rays,
            self.config.vertical_rays,
        );
    }

    // --- State ---
    #[inline]
    pub fn state(&self) -> &CollisionState {
        &self.state
    }

    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.state.below
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    #[inline]
    pub fn position(&self) -> Point2 {
        self.transform.position
    }

    #[inline]
    pub fn transform(&self) -> &Transform2 {
        &self.transform
    }

    #[inline]
    pub fn collider(&self) -> &BoxCollider {
        &self.collider
    }

    #[inline]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    #[inline]
    pub fn ray_spacing(&self) -> RaySpacing {
        self.spacing
    }

    // --- Transform and collider ---
    /// Teleport without collision checks. Used by hosts in velocity mode to write back the
    /// position their physics step produced.
    pub fn set_position(&mut self, position: Point2) {
        self.transform.position = position;
    }

    pub fn set_scale(&mut self, scale: Vec2) {
        self.transform.scale = scale;
        self.recalculate_distance_between_rays();
    }

    pub fn set_collider(&mut self, collider: BoxCollider) {
        self.collider = collider;
        self.recalculate_distance_between_rays();
    }

    // --- Configuration ---
    pub fn set_skin_width(&mut self, skin_width: f32) -> Result<(), ConfigError> {
        validate_skin_width(skin_width)?;
        self.config.skin_width = skin_width;
        self.recalculate_distance_between_rays();
        Ok(())
    }

    pub fn set_ray_counts(&mut self, horizontal: usize, vertical: usize) -> Result<(), ConfigError> {
        validate_ray_count(Axis::Horizontal, horizontal)?;
        validate_ray_count(Axis::Vertical, vertical)?;
        self.config.horizontal_rays = horizontal;
        self.config.vertical_rays = vertical;
        self.recalculate_distance_between_rays();
        Ok(())
    }

    /// The one-way mask stays part of the platform mask.
    pub fn set_platform_mask(&mut self, mask: LayerMask) {
        self.config.platform_mask = mask | self.config.one_way_platform_mask;
    }

    pub fn set_one_way_platform_mask(&mut self, mask: LayerMask) {
        self.config.one_way_platform_mask = mask;
        self.config.platform_mask = self.config.platform_mask | mask;
    }

    pub fn set_slope_limit(&mut self, degrees: f32) -> Result<(), ConfigError> {
        validate_slope_limit(degrees)?;
        self.config.slope_limit = degrees;
        Ok(())
    }

    pub fn set_slope_speed_curve(&mut self, curve: SlopeSpeedCurve) {
        self.config.slope_speed_curve = curve;
    }

    pub fn set_slope_probe_length(&mut self, length: f32) -> Result<(), ConfigError> {
        validate_probe_length(length)?;
        self.config.slope_probe_length = length;
        Ok(())
    }

    pub fn set_movement_mode(&mut self, mode: MovementMode) {
        self.config.movement_mode = mode;
    }

    /// Replace the whole configuration. On error the current one is kept.
    pub fn set_config(&mut self, mut config: ControllerConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        self.recalculate_distance_between_rays();
        Ok(())
    }

    // --- Notifications ---
    pub fn subscribe<F>(&mut self, callback: F) -> ListenerId
    where
        F: FnMut(&ControllerEvent) + Send + 'static,
    {
        self.listeners.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn on_trigger_enter(&mut self, body: BodyId) {
        self.listeners.emit(&ControllerEvent::TriggerEntered(body));
    }

    pub fn on_trigger_stay(&mut self, body: BodyId) {
        self.listeners.emit(&ControllerEvent::TriggerStayed(body));
    }

    pub fn on_trigger_exit(&mut self, body: BodyId) {
        self.listeners.emit(&ControllerEvent::TriggerExited(body));
    }

    /// Install or remove the sink that receives every cast ray.
    pub fn set_ray_debug_sink(&mut self, sink: Option<Box<dyn RayDebugSink + Send>>) {
        self.debug_sink = sink;
    }
}

impl std::fmt::Debug for CharacterController2D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CharacterController2D")
            .field("transform", &self.transform)
            .field("collider", &self.collider)
            .field("state", &self.state)
            .field("velocity", &self.velocity)
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::types::ProbeKind;
    use crate::rapier_world::{ColliderShapeDef, RapierQueryWorld, WorldStaticDef};
    use crate::test_world::SegmentWorld;
    use std::sync::{Arc, Mutex};

    const EPS: f32 = 1.0e-4;
    const DT: f32 = 1.0 / 60.0;
    const SOLID: u8 = 0;
    const ONE_WAY: u8 = 1;

    fn config() -> ControllerConfig {
        ControllerConfig {
            platform_mask: LayerMask::from_index(SOLID),
            one_way_platform_mask: LayerMask::from_index(ONE_WAY),
            ..ControllerConfig::default()
        }
    }

    /// 1x2 box whose bottom edge sits at `bottom`.
    fn controller(x: f32, bottom: f32) -> CharacterController2D {
        CharacterController2D::new(
            Transform2::at(Point2::new(x, bottom + 1.0)),
            BoxCollider::new(Vec2::new(1.0, 2.0)),
            config(),
        )
        .unwrap()
    }

    fn bottom(c: &CharacterController2D) -> f32 {
        c.position().y - 1.0
    }

    fn record_events(c: &mut CharacterController2D) -> Arc<Mutex<Vec<ControllerEvent>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        c.subscribe(move |event| sink.lock().unwrap().push(*event));
        events
    }

    fn curve(angle: f32) -> f32 {
        SlopeSpeedCurve::default().evaluate(angle)
    }

    #[test]
    fn new_rejects_invalid_config() {
        let bad = ControllerConfig {
            vertical_rays: 1,
            ..config()
        };
        let err = CharacterController2D::new(
            Transform2::default(),
            BoxCollider::new(Vec2::new(1.0, 1.0)),
            bad,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::TooFewRays {
                axis: Axis::Vertical,
                count: 1
            }
        );
    }

    #[test]
    fn unobstructed_move_is_unchanged() {
        let world = SegmentWorld::new();
        let mut c = controller(0.0, 0.0);
        let events = record_events(&mut c);

        let result = c.move_by(&world, Vec2::new(0.3, 0.2), DT);
        assert_eq!(result.displacement, Vec2::new(0.3, 0.2));
        assert!(result.translated);
        assert!(!c.state().has_collision());
        assert!(!c.state().became_grounded_this_frame);
        assert!((c.position().x - 0.3).abs() < EPS);
        assert!((bottom(&c) - 0.2).abs() < EPS);
        assert!((c.velocity().x - 0.3 / DT).abs() < 1.0e-2);
        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn wall_clamps_horizontal_move() {
        let world = SegmentWorld::new().wall(1, 1.0, SOLID);
        let mut c = controller(0.0, 0.0);

        let result = c.move_by(&world, Vec2::new(1.0, 0.0), DT);
        // Right face starts 0.5 from the wall.
        assert!((result.displacement.x - 0.5).abs() < EPS);
        assert_eq!(result.displacement.y, 0.0);
        assert!(c.state().right);
        assert!(!c.state().left && !c.state().below && !c.state().above);

        let result = c.move_by(&world, Vec2::new(-0.25, 0.0), DT);
        assert!((result.displacement.x + 0.25).abs() < EPS);
        assert!(!c.state().right);
    }

    #[test]
    fn wall_on_the_left_sets_left() {
        let world = SegmentWorld::new().wall(1, -1.0, SOLID);
        let mut c = controller(0.0, 0.0);

        let result = c.move_by(&world, Vec2::new(-2.0, 0.0), DT);
        assert!((result.displacement.x + 0.5).abs() < EPS);
        assert!(c.state().left);
        assert!(!c.state().right);
    }

    #[test]
    fn landing_sets_below_and_grounded_once() {
        let world = SegmentWorld::new().floor(1, 0.0, SOLID);
        let mut c = controller(0.0, 0.5);

        let result = c.move_by(&world, Vec2::new(0.0, -1.0), DT);
        assert!((result.displacement.y + 0.5).abs() < EPS);
        assert!(c.state().below);
        assert!(c.state().became_grounded_this_frame);
        assert!(bottom(&c).abs() < EPS);

        c.move_by(&world, Vec2::new(0.0, -1.0), DT);
        assert!(c.state().below);
        assert!(!c.state().became_grounded_this_frame);
        assert!(bottom(&c).abs() < EPS);
    }

    #[test]
    fn became_grounded_fires_exactly_once_per_landing() {
        let world = SegmentWorld::new().floor(1, 0.0, SOLID);
        let mut c = controller(0.0, 0.5);

        let flags: Vec<bool> = (0..4)
            .map(|_| {
                c.move_by(&world, Vec2::new(0.0, -0.3), DT);
                c.state().became_grounded_this_frame
            })
            .collect();
        assert_eq!(flags, vec![false, true, false, false]);
        assert!(c.is_grounded());
    }

    #[test]
    fn resting_with_zero_displacement_is_idempotent() {
        let world = SegmentWorld::new().floor(1, 0.0, SOLID);
        let mut c = controller(0.0, 0.5);
        c.move_by(&world, Vec2::new(0.0, -1.0), DT);
        let events = record_events(&mut c);
        let rest = c.position();

        for _ in 0..3 {
            let result = c.move_by(&world, Vec2::zeros(), DT);
            assert_eq!(result.displacement, Vec2::zeros());
            assert!(c.state().below);
            assert!(!c.state().right && !c.state().left && !c.state().above);
            assert!(!c.state().became_grounded_this_frame);
            assert_eq!(c.position(), rest);
        }
        // Resting contact is not a collision notification.
        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn one_way_platform_passes_upward_and_blocks_landing() {
        let world = SegmentWorld::new().floor(1, 3.0, ONE_WAY);

        let mut c = controller(0.0, 0.5);
        let result = c.move_by(&world, Vec2::new(0.0, 1.0), DT);
        assert_eq!(result.displacement.y, 1.0);
        assert!(!c.state().has_collision());

        let mut c = controller(0.0, 3.5);
        let result = c.move_by(&world, Vec2::new(0.0, -1.0), DT);
        assert!((result.displacement.y + 0.5).abs() < EPS);
        assert!(c.state().below);
    }

    #[test]
    fn ceiling_clamps_upward_move() {
        let world = SegmentWorld::new().floor(1, 3.0, SOLID);
        let mut c = controller(0.0, 0.5);
        let events = record_events(&mut c);

        let result = c.move_by(&world, Vec2::new(0.0, 1.0), DT);
        // Top edge starts 0.5 below the ceiling.
        assert!((result.displacement.y - 0.5).abs() < EPS);
        assert_eq!(result.displacement.x, 0.0);
        assert!(c.state().above);
        assert!(!c.state().below && !c.state().left && !c.state().right);

        let events = events.lock().unwrap();
        assert!(!events.is_empty());
        for event in events.iter() {
            match event {
                ControllerEvent::Collided(contact) => {
                    assert_eq!(contact.axis, Axis::Vertical);
                    assert_eq!(contact.body, BodyId(1));
                }
                other => panic!("unexpected event {other:?}"),
            }
        }
    }

    #[test]
    fn overhang_above_one_ray_reports_one_contact() {
        // Only the leftmost upward ray (x = -0.48) reaches the overhang.
        let world = SegmentWorld::new().with(1, (-0.6, 3.0), (-0.4, 3.0), SOLID);
        let mut c = controller(0.0, 0.5);
        let events = record_events(&mut c);

        let result = c.move_by(&world, Vec2::new(0.0, 1.0), DT);
        assert!((result.displacement.y - 0.5).abs() < EPS);
        assert!(c.state().above);
        assert_eq!(events.lock().unwrap().len(), 1);
    }

    #[test]
    fn one_way_platform_never_blocks_sideways() {
        let world = SegmentWorld::new().wall(1, 1.0, ONE_WAY);
        let mut c = controller(0.0, 0.0);

        let result = c.move_by(&world, Vec2::new(1.0, 0.0), DT);
        assert_eq!(result.displacement.x, 1.0);
        assert!(!c.state().right);
    }

    #[test]
    fn climbable_slope_synthesizes_vertical_motion() {
        let world = SegmentWorld::new().ramp(1, (0.6, 0.0), 20.0, SOLID);
        let mut c = controller(0.0, 0.0);
        let events = record_events(&mut c);

        let result = c.move_by(&world, Vec2::new(0.3, -0.05), DT);
        let dx = 0.3 * curve(20.0) - 0.02;
        let dy = (20.0_f32.to_radians().tan() * dx).abs();
        assert!((result.displacement.x - dx).abs() < EPS);
        assert!((result.displacement.y - dy).abs() < EPS);
        assert!(c.state().below);
        assert!(!c.state().right);
        assert!(c.state().became_grounded_this_frame);

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 1);
        match events[0] {
            ControllerEvent::Collided(contact) => {
                assert_eq!(contact.axis, Axis::Horizontal);
                assert_eq!(contact.body, BodyId(1));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn slope_steeper_than_limit_blocks() {
        let world = SegmentWorld::new().ramp(1, (0.6, 0.0), 45.0, SOLID);
        let mut c = controller(0.0, 0.0);

        let result = c.move_by(&world, Vec2::new(0.3, -0.05), DT);
        assert_eq!(result.displacement.x, 0.0);
        assert!(c.state().right);
        assert!(!c.state().below);
    }

    #[test]
    fn climbable_slope_to_the_left() {
        let world = SegmentWorld::new().ramp(1, (-0.6, 0.0), 160.0, SOLID);
        let mut c = controller(0.0, 0.0);

        let result = c.move_by(&world, Vec2::new(-0.3, -0.05), DT);
        let dx = -0.3 * curve(20.0) + 0.02;
        let dy = (20.0_f32.to_radians().tan() * dx).abs();
        assert!((result.displacement.x - dx).abs() < EPS);
        assert!((result.displacement.y - dy).abs() < EPS);
        assert!(c.state().below);
        assert!(!c.state().left);
    }

    #[test]
    fn slope_steeper_than_limit_blocks_to_the_left() {
        let world = SegmentWorld::new().ramp(1, (-0.6, 0.0), 135.0, SOLID);
        let mut c = controller(0.0, 0.0);

        let result = c.move_by(&world, Vec2::new(-0.3, -0.05), DT);
        assert_eq!(result.displacement.x, 0.0);
        assert!(c.state().left);
        assert!(!c.state().right && !c.state().below);
    }

    #[test]
    fn slope_is_not_climbed_while_jumping() {
        let world = SegmentWorld::new().ramp(1, (0.6, 0.0), 20.0, SOLID);
        let mut c = controller(0.0, 0.0);

        let result = c.move_by(&world, Vec2::new(0.3, 0.2), DT);
        // The slope still ends the horizontal scan, but leaves the jump untouched.
        assert_eq!(result.displacement.x, 0.3);
        assert!(!c.state().below);
        assert!(!c.state().right);
    }

    #[test]
    fn descending_slope_snaps_and_speeds_up() {
        let tan = 20.0_f32.to_radians().tan();
        let world = SegmentWorld::new().ramp(1, (-50.0, 50.0 * tan), -20.0, SOLID);
        let mut c = controller(0.0, 0.5);

        c.move_by(&world, Vec2::new(0.0, -1.0), DT);
        assert!(c.is_grounded());
        assert!(!c.state().moving_down_slope);

        let result = c.move_by(&world, Vec2::new(0.2, -0.1), DT);
        assert!(c.state().moving_down_slope);
        assert!((c.state().slope_angle - 20.0).abs() < 1.0e-3);
        assert!((result.displacement.x - 0.2 * curve(-20.0)).abs() < EPS);
        assert!(c.state().below);

        // The inset bottom-left ray lands on the surface.
        let expected = -tan * (c.position().x - 0.48);
        assert!((bottom(&c) - expected).abs() < EPS);
    }

    #[test]
    fn descending_slope_to_the_left() {
        let tan = 20.0_f32.to_radians().tan();
        let world = SegmentWorld::new().ramp(1, (-50.0, -50.0 * tan), 20.0, SOLID);
        let mut c = controller(0.0, 0.5);

        c.move_by(&world, Vec2::new(0.0, -1.0), DT);
        assert!(c.is_grounded());

        let result = c.move_by(&world, Vec2::new(-0.2, -0.1), DT);
        assert!(c.state().moving_down_slope);
        assert!((c.state().slope_angle - 20.0).abs() < 1.0e-3);
        assert!((result.displacement.x + 0.2 * curve(-20.0)).abs() < EPS);
        assert!(c.state().below);
        assert!(!c.state().left);

        // The inset bottom-right ray lands on the surface.
        let expected = tan * (c.position().x + 0.48);
        assert!((bottom(&c) - expected).abs() < EPS);
    }

    #[test]
    fn slope_rising_ahead_is_not_a_descent() {
        let world = SegmentWorld::new().floor(1, 0.0, SOLID);
        let mut c = controller(0.0, 0.5);
        c.move_by(&world, Vec2::new(0.0, -1.0), DT);

        // Walking right on flat ground still counts as "moving down slope" at 0 degrees.
        c.move_by(&world, Vec2::new(0.2, -0.1), DT);
        assert!(c.state().moving_down_slope);
        assert_eq!(c.state().slope_angle, 0.0);
        assert!(bottom(&c).abs() < EPS);

        let tan = 20.0_f32.to_radians().tan();
        let uphill = SegmentWorld::new().ramp(1, (-50.0, -50.0 * tan), 20.0, SOLID);
        let mut c = controller(0.0, 0.5);
        c.move_by(&uphill, Vec2::new(0.0, -1.0), DT);
        c.move_by(&uphill, Vec2::new(0.2, -0.1), DT);
        assert!(!c.state().moving_down_slope);
    }

    #[test]
    fn diagonal_into_corner_reports_horizontal_before_vertical() {
        let world = SegmentWorld::new().wall(1, 1.0, SOLID).floor(2, 0.0, SOLID);
        let mut c = controller(0.0, 0.0);
        let events = record_events(&mut c);

        let result = c.move_by(&world, Vec2::new(1.0, -1.0), DT);
        assert!((result.displacement.x - 0.5).abs() < EPS);
        assert!(result.displacement.y.abs() < EPS);
        assert!(c.state().right && c.state().below);

        let axes: Vec<Axis> = events
            .lock()
            .unwrap()
            .iter()
            .map(|event| match event {
                ControllerEvent::Collided(contact) => contact.axis,
                other => panic!("unexpected event {other:?}"),
            })
            .collect();
        assert!(axes.len() >= 2);
        assert_eq!(axes[0], Axis::Horizontal);
        assert_eq!(axes[axes.len() - 1], Axis::Vertical);
        let first_vertical = axes.iter().position(|a| *a == Axis::Vertical).unwrap();
        assert!(axes[first_vertical..].iter().all(|a| *a == Axis::Vertical));
    }

    #[test]
    fn velocity_mode_reports_without_translating() {
        let world = SegmentWorld::new();
        let mut c = controller(0.0, 0.0);
        c.set_movement_mode(MovementMode::Velocity);
        let start = c.position();

        let result = c.move_by(&world, Vec2::new(0.3, 0.0), 0.5);
        assert!(!result.translated);
        assert_eq!(c.position(), start);
        assert!((result.velocity.x - 0.6).abs() < EPS);
        assert_eq!(c.velocity(), result.velocity);

        let result = c.move_by(&world, Vec2::new(0.3, 0.0), 0.0);
        assert_eq!(result.velocity, Vec2::zeros());
    }

    #[test]
    fn translate_mode_keeps_velocity_on_zero_dt() {
        let world = SegmentWorld::new();
        let mut c = controller(0.0, 0.0);

        c.move_by(&world, Vec2::new(0.5, 0.0), 0.5);
        let result = c.move_by(&world, Vec2::new(0.1, 0.0), 0.0);
        assert!(result.translated);
        assert!((result.velocity.x - 1.0).abs() < EPS);
        assert!((c.position().x - 0.6).abs() < EPS);
    }

    struct KindLog(Arc<Mutex<Vec<ProbeKind>>>);

    impl RayDebugSink for KindLog {
        fn ray(&mut self, kind: ProbeKind, _origin: Point2, ray: Vec2) {
            assert!(ray.norm() > 0.0);
            self.0.lock().unwrap().push(kind);
        }
    }

    #[test]
    fn debug_sink_sees_every_ray() {
        let world = SegmentWorld::new();
        let mut c = controller(0.0, 0.0);
        let kinds = Arc::new(Mutex::new(Vec::new()));
        c.set_ray_debug_sink(Some(Box::new(KindLog(Arc::clone(&kinds)))));

        c.move_by(&world, Vec2::new(0.3, 0.0), DT);
        let mut expected = vec![ProbeKind::Penetration];
        expected.extend([ProbeKind::Horizontal; 8]);
        expected.extend([ProbeKind::RestingContact; 4]);
        assert_eq!(*kinds.lock().unwrap(), expected);

        kinds.lock().unwrap().clear();
        c.set_ray_debug_sink(None);
        c.move_by(&world, Vec2::new(0.3, 0.0), DT);
        assert!(kinds.lock().unwrap().is_empty());
    }

    #[test]
    fn setters_validate_and_recompute_spacing() {
        let mut c = controller(0.0, 0.0);
        assert!((c.ray_spacing().between_horizontal_rays - 0.28).abs() < 1.0e-5);

        assert!(c.set_skin_width(0.5).is_err());
        assert_eq!(c.config().skin_width, 0.02);
        c.set_skin_width(0.05).unwrap();
        assert!((c.ray_spacing().between_horizontal_rays - 1.9 / 7.0).abs() < 1.0e-5);

        assert!(c.set_ray_counts(1, 4).is_err());
        assert_eq!(c.config().horizontal_rays, 8);
        c.set_ray_counts(3, 2).unwrap();
        assert!((c.ray_spacing().between_horizontal_rays - 0.95).abs() < 1.0e-5);
        assert!((c.ray_spacing().between_vertical_rays - 0.9).abs() < 1.0e-5);

        c.set_scale(Vec2::new(2.0, -1.0));
        assert!((c.ray_spacing().between_vertical_rays - 1.9).abs() < 1.0e-5);

        c.set_collider(BoxCollider::new(Vec2::new(1.0, 4.0)));
        assert!((c.ray_spacing().between_horizontal_rays - 1.95).abs() < 1.0e-5);

        assert!(c.set_slope_limit(120.0).is_err());
        c.set_slope_limit(45.0).unwrap();
        assert!(c.set_slope_probe_length(-1.0).is_err());
        assert_eq!(c.config().slope_probe_length, 2.0);
    }

    #[test]
    fn one_way_mask_stays_in_platform_mask() {
        let mut c = controller(0.0, 0.0);
        assert!(c.config().platform_mask.contains_index(ONE_WAY));

        c.set_platform_mask(LayerMask::from_index(4));
        assert!(c.config().platform_mask.contains_index(4));
        assert!(c.config().platform_mask.contains_index(ONE_WAY));

        c.set_one_way_platform_mask(LayerMask::from_index(6));
        assert!(c.config().platform_mask.contains_index(6));
        assert_eq!(c.config().horizontal_mask(), LayerMask::from_indices(&[1, 4]));
    }

    #[test]
    fn set_config_keeps_old_config_on_error() {
        let mut c = controller(0.0, 0.0);
        let bad = ControllerConfig {
            skin_width: 1.0,
            ..config()
        };
        assert!(c.set_config(bad).is_err());
        assert_eq!(c.config().skin_width, 0.02);

        let good = ControllerConfig {
            vertical_rays: 2,
            ..config()
        };
        c.set_config(good).unwrap();
        assert!((c.ray_spacing().between_vertical_rays - 0.96).abs() < 1.0e-5);
    }

    #[test]
    fn trigger_forwarding_and_unsubscribe() {
        let mut c = controller(0.0, 0.0);
        let events = record_events(&mut c);
        let other = c.subscribe(|_| {});

        c.on_trigger_enter(BodyId(3));
        c.on_trigger_stay(BodyId(3));
        c.on_trigger_exit(BodyId(3));
        assert_eq!(
            *events.lock().unwrap(),
            vec![
                ControllerEvent::TriggerEntered(BodyId(3)),
                ControllerEvent::TriggerStayed(BodyId(3)),
                ControllerEvent::TriggerExited(BodyId(3)),
            ]
        );
        assert!(c.unsubscribe(other));
        assert!(!c.unsubscribe(other));
    }

    #[test]
    fn lands_on_rapier_world() {
        let world = RapierQueryWorld::build(vec![
            WorldStaticDef::solid(
                1,
                Vec2::new(0.0, -0.5),
                ColliderShapeDef::Cuboid {
                    half_extents: Vec2::new(10.0, 0.5),
                },
                SOLID,
            ),
            WorldStaticDef::solid(
                2,
                Vec2::new(3.0, 2.0),
                ColliderShapeDef::Cuboid {
                    half_extents: Vec2::new(0.5, 2.0),
                },
                SOLID,
            ),
        ]);
        let mut c = controller(0.0, 0.5);
        let events = record_events(&mut c);

        c.move_by(&world, Vec2::new(0.0, -1.0), DT);
        assert!(c.is_grounded());
        assert!(bottom(&c).abs() < EPS);
        assert!(matches!(
            events.lock().unwrap().first(),
            Some(ControllerEvent::Collided(ContactRecord { body: BodyId(1), .. }))
        ));

        // Wall face at x = 2.5, right face at 0.5.
        let result = c.move_by(&world, Vec2::new(3.0, 0.0), DT);
        assert!((result.displacement.x - 2.0).abs() < EPS);
        assert!(c.state().right);
        assert!(c.state().below);
    }
}
