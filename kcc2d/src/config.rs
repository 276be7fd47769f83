//! Controller configuration and its validation.

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use crate::collision::slope::{Keyframe, SlopeSpeedCurve};
use crate::collision::{settings::*, types::Axis};
use crate::layers::LayerMask;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("skin width {0} is outside [0.001, 0.3]")]
    SkinWidthOutOfRange(f32),

    #[error("{axis:?} ray count {count} is below the minimum of 2")]
    TooFewRays { axis: Axis, count: usize },

    #[error("slope limit {0} is outside [0, 90] degrees")]
    SlopeLimitOutOfRange(f32),

    #[error("slope probe length must be positive, got {0}")]
    NonPositiveProbeLength(f32),

    /// Returned when building or loading a curve with no keyframes.
    #[error("slope speed curve needs at least one keyframe")]
    EmptySlopeCurve,

    #[error("trigger proxy scale {0} is outside [0.8, 0.999]")]
    TriggerScaleOutOfRange(f32),
}

/// How a resolved displacement is handed back to the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementMode {
    /// The controller moves its own transform and derives a velocity from `dt`.
    #[default]
    Translate,
    /// The controller leaves its transform alone and reports `resolved / dt` for an external
    /// physics step to apply.
    Velocity,
}

/// Tunables for one controller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub skin_width: f32,
    /// Layers that block movement.
    pub platform_mask: LayerMask,
    /// Layers that only block downward movement. Always folded into `platform_mask`.
    pub one_way_platform_mask: LayerMask,
    /// Steepest climbable slope, in degrees.
    pub slope_limit: f32,
    pub slope_speed_curve: SlopeSpeedCurve,
    pub horizontal_rays: usize,
    pub vertical_rays: usize,
    /// Length of the downward descent probe.
    pub slope_probe_length: f32,
    pub movement_mode: MovementMode,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            skin_width: DEFAULT_SKIN_WIDTH,
            platform_mask: LayerMask::empty(),
            one_way_platform_mask: LayerMask::empty(),
            slope_limit: DEFAULT_SLOPE_LIMIT_DEG,
            slope_speed_curve: SlopeSpeedCurve::default(),
            horizontal_rays: DEFAULT_HORIZONTAL_RAYS,
            vertical_rays: DEFAULT_VERTICAL_RAYS,
            slope_probe_length: DEFAULT_SLOPE_PROBE_LENGTH,
            movement_mode: MovementMode::Translate,
        }
    }
}

impl ControllerConfig {
    /// Check every range and fold the one-way mask into the platform mask.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        validate_skin_width(self.skin_width)?;
        validate_ray_count(Axis::Horizontal, self.horizontal_rays)?;
        validate_ray_count(Axis::Vertical, self.vertical_rays)?;
        validate_slope_limit(self.slope_limit)?;
        validate_probe_length(self.slope_probe_length)?;
        self.platform_mask = self.platform_mask | self.one_way_platform_mask;
        Ok(())
    }

    /// Every blocking layer, one-way platforms included.
    #[inline]
    pub fn solid_mask(&self) -> LayerMask {
        self.platform_mask | self.one_way_platform_mask
    }

    /// Layers probed sideways. One-way platforms never block horizontal movement.
    #[inline]
    pub fn horizontal_mask(&self) -> LayerMask {
        self.solid_mask().without(self.one_way_platform_mask)
    }

    /// Layers probed vertically; one-way platforms are skipped on the way up.
    #[inline]
    pub fn vertical_mask(&self, going_up: bool) -> LayerMask {
        if going_up {
            self.horizontal_mask()
        } else {
            self.solid_mask()
        }
    }
}

pub fn validate_skin_width(skin_width: f32) -> Result<(), ConfigError> {
    if (MIN_SKIN_WIDTH..=MAX_SKIN_WIDTH).contains(&skin_width) {
        Ok(())
    } else {
        Err(rejected(ConfigError::SkinWidthOutOfRange(skin_width)))
    }
}

pub fn validate_ray_count(axis: Axis, count: usize) -> Result<(), ConfigError> {
    if count >= MIN_RAYS {
        Ok(())
    } else {
        Err(rejected(ConfigError::TooFewRays { axis, count }))
    }
}

pub fn validate_slope_limit(limit: f32) -> Result<(), ConfigError> {
    if (0.0..=MAX_SLOPE_LIMIT_DEG).contains(&limit) {
        Ok(())
    } else {
        Err(rejected(ConfigError::SlopeLimitOutOfRange(limit)))
    }
}

pub fn validate_probe_length(length: f32) -> Result<(), ConfigError> {
    // Also rejects NaN.
    if length > 0.0 {
        Ok(())
    } else {
        Err(rejected(ConfigError::NonPositiveProbeLength(length)))
    }
}

pub fn validate_trigger_scale(scale: f32) -> Result<(), ConfigError> {
    if (MIN_TRIGGER_PROXY_SCALE..=MAX_TRIGGER_PROXY_SCALE).contains(&scale) {
        Ok(())
    } else {
        Err(rejected(ConfigError::TriggerScaleOutOfRange(scale)))
    }
}

pub(crate) fn rejected(err: ConfigError) -> ConfigError {
    warn!("rejected controller configuration: {err}");
    err
}
