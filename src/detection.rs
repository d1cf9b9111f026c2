//! Ground sensor results.
//!
//! Backends run the actual overlap query and store the result here; the
//! controller only ever reads [`GroundContact`].

use bevy::prelude::*;

/// Result of this frame's ground overlap query.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq)]
pub struct GroundContact {
    /// Whether the sensor box overlapped any ground geometry.
    pub overlapping: bool,
    /// World-space centre of the sensor box.
    pub sensor_center: Vec2,
}

impl GroundContact {
    /// Create a result with no overlap.
    pub fn miss(sensor_center: Vec2) -> Self {
        Self {
            overlapping: false,
            sensor_center,
        }
    }

    /// Create a result with an overlap.
    pub fn hit(sensor_center: Vec2) -> Self {
        Self {
            overlapping: true,
            sensor_center,
        }
    }
}

/// World-space centre of the ground sensor.
///
/// `bottom_offset` is the distance from the body position to the bottom of
/// its collider.
#[inline]
pub fn ground_sensor_center(position: Vec2, bottom_offset: f32, offset: Vec2) -> Vec2 {
    position + Vec2::NEG_Y * bottom_offset + offset
}
