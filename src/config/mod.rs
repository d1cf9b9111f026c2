//! Controller configuration.
//!
//! All tunables live on [`ControllerConfig`], split into one sub-config per
//! concern. A config is set once when the actor is spawned; the systems read
//! it every frame but never write it.

mod falling;
mod jumping;
mod running;
mod sensors;

pub use falling::FallingConfig;
pub use jumping::JumpingConfig;
pub use running::RunningConfig;
pub use sensors::GroundSensorConfig;

use bevy::prelude::*;

use crate::error::ConfigError;

/// Tunable parameters for a platformer actor.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq, Default)]
#[reflect(Component)]
pub struct ControllerConfig {
    /// Horizontal running.
    pub running: RunningConfig,
    /// Jump launch, buffering and coyote time.
    pub jumping: JumpingConfig,
    /// Gravity shaping while airborne.
    pub falling: FallingConfig,
    /// Ground overlap sensor.
    pub ground_sensor: GroundSensorConfig,
}

impl ControllerConfig {
    /// Create a config optimized for responsive player control.
    ///
    /// Slightly longer buffer and coyote windows than the default, which
    /// forgive human timing without being noticeable.
    pub fn player() -> Self {
        Self {
            jumping: JumpingConfig {
                input_buffer_time: 0.15,
                ..default()
            },
            ..default()
        }
    }

    /// Builder: set max speed.
    pub fn with_max_speed(mut self, max_speed: f32) -> Self {
        self.running.max_speed = max_speed;
        self
    }

    /// Builder: set acceleration and deceleration rates.
    pub fn with_run_rates(mut self, acceleration: f32, deceleration: f32) -> Self {
        self.running.acceleration = acceleration;
        self.running.deceleration = deceleration;
        self
    }

    /// Builder: set the driving force exponent.
    pub fn with_velocity_power(mut self, power: f32) -> Self {
        self.running.velocity_power = power;
        self
    }

    /// Builder: set ground friction.
    pub fn with_friction(mut self, friction: f32) -> Self {
        self.running.friction = friction;
        self
    }

    /// Builder: set jump launch force.
    pub fn with_jump_force(mut self, force: f32) -> Self {
        self.jumping.force = force;
        self
    }

    /// Builder: set jump buffer time.
    pub fn with_jump_buffer_time(mut self, time: f32) -> Self {
        self.jumping.input_buffer_time = time;
        self
    }

    /// Builder: set coyote time.
    pub fn with_coyote_time(mut self, time: f32) -> Self {
        self.jumping.coyote_time = time;
        self
    }

    /// Builder: set the base gravity scale.
    pub fn with_gravity_scale(mut self, scale: f32) -> Self {
        self.falling.gravity_scale = scale;
        self
    }

    /// Builder: set fall and fast-fall gravity multipliers.
    pub fn with_fall_gravity(mut self, fall: f32, fast_fall: f32) -> Self {
        self.falling.fall_gravity_mult = fall;
        self.falling.fast_fall_gravity_mult = fast_fall;
        self
    }

    /// Builder: set fall and fast-fall terminal speeds.
    pub fn with_max_fall_speeds(mut self, fall: f32, fast_fall: f32) -> Self {
        self.falling.max_fall_speed = fall;
        self.falling.max_fast_fall_speed = fast_fall;
        self
    }

    /// Builder: set the ground sensor box size.
    pub fn with_ground_sensor_size(mut self, size: Vec2) -> Self {
        self.ground_sensor.size = size;
        self
    }

    /// Builder: set the collision layers that count as ground.
    pub fn with_ground_layers(mut self, layers: u32) -> Self {
        self.ground_sensor.ground_layers = layers;
        self
    }

    /// Check every tunable against its valid range.
    ///
    /// The controller never rejects a config; the plugin only logs the
    /// first violation when a config is added.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let running = &self.running;
        let jumping = &self.jumping;
        let falling = &self.falling;

        let non_negative = [
            ("max_speed", running.max_speed),
            ("acceleration", running.acceleration),
            ("deceleration", running.deceleration),
            ("friction", running.friction),
            ("input_deadzone", running.input_deadzone),
            ("jump force", jumping.force),
            ("input_buffer_time", jumping.input_buffer_time),
            ("coyote_time", jumping.coyote_time),
            ("gravity_scale", falling.gravity_scale),
            ("fall_gravity_mult", falling.fall_gravity_mult),
            ("fast_fall_gravity_mult", falling.fast_fall_gravity_mult),
            ("max_fall_speed", falling.max_fall_speed),
            ("max_fast_fall_speed", falling.max_fast_fall_speed),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        if !running.velocity_power.is_finite() || running.velocity_power <= 0.0 {
            return Err(ConfigError::VelocityPower(running.velocity_power));
        }

        let size = self.ground_sensor.size;
        if !(size.x > 0.0 && size.y > 0.0) {
            return Err(ConfigError::SensorSize(size));
        }

        Ok(())
    }
}
