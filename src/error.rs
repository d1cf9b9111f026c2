//! Error types.

use thiserror::Error;

/// A tunable in [`ControllerConfig`](crate::config::ControllerConfig) that is
/// outside its valid range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("`{field}` must be finite and non-negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("`velocity_power` must be finite and greater than zero, got {0}")]
    VelocityPower(f32),

    #[error("ground sensor size must be positive on both axes, got {0}")]
    SensorSize(bevy::math::Vec2),
}
