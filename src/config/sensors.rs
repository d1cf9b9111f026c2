//! Configuration for the ground overlap sensor.

use bevy::prelude::*;

/// Configuration for the ground overlap sensor.
///
/// The sensor box is centred on the bottom of the actor's collider, shifted by
/// `offset`.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct GroundSensorConfig {
    /// Full width and height of the sensor box.
    pub size: Vec2,

    /// Offset of the sensor centre from the collider bottom.
    pub offset: Vec2,

    /// Collision layer bits that count as ground.
    pub ground_layers: u32,
}

impl Default for GroundSensorConfig {
    fn default() -> Self {
        Self {
            size: Vec2::new(0.49, 0.03),
            offset: Vec2::ZERO,
            ground_layers: u32::MAX,
        }
    }
}
