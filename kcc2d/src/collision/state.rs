use std::fmt;

/// Collision flags produced by one `move_by` call.
///
/// Reset at the start of every call and read-only to callers afterwards.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CollisionState {
    pub right: bool,
    pub left: bool,
    pub above: bool,
    pub below: bool,
    /// True only on the call during which `below` went from false to true.
    pub became_grounded_this_frame: bool,
    pub moving_down_slope: bool,
    /// Angle in degrees of the slope reported by the descent probe.
    pub slope_angle: f32,
}

impl CollisionState {
    #[inline]
    pub fn has_collision(&self) -> bool {
        self.below || self.right || self.left || self.above
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Display for CollisionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[CollisionState] r: {}, l: {}, a: {}, b: {}, movingDownSlope: {}, angle: {}",
            self.right, self.left, self.above, self.below, self.moving_down_slope, self.slope_angle
        )
    }
}
