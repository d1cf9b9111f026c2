//! Configuration for horizontal running.

use bevy::prelude::*;

/// Configuration for horizontal running.
///
/// Speeds are in world units per second and rates are per unit mass, so the
/// same config produces the same feel regardless of collider density.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct RunningConfig {
    /// Maximum horizontal speed reached at full input (units/second).
    pub max_speed: f32,

    /// Rate used while steering toward a non-zero target speed.
    pub acceleration: f32,

    /// Rate used while the horizontal input is released.
    pub deceleration: f32,

    /// Exponent of the driving force curve. Applied to the magnitude only.
    pub velocity_power: f32,

    /// Largest velocity change the ground friction impulse removes per tick.
    pub friction: f32,

    /// Axis values with a smaller magnitude count as no input.
    pub input_deadzone: f32,
}

impl Default for RunningConfig {
    fn default() -> Self {
        Self {
            max_speed: 9.0,
            acceleration: 13.0,
            deceleration: 16.0,
            velocity_power: 0.96,
            friction: 0.22,
            input_deadzone: 0.01,
        }
    }
}

impl RunningConfig {
    /// Whether an axis value is outside the deadzone.
    #[inline]
    pub fn is_active(&self, axis: f32) -> bool {
        axis.abs() > self.input_deadzone
    }
}
