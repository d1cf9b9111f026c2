//! Configuration for gravity shaping while airborne.

use bevy::prelude::*;

/// Configuration for gravity shaping while airborne.
///
/// The controller owns the body's gravity scale and rewrites it every frame
/// from these values.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct FallingConfig {
    /// Gravity scale used while grounded or ascending normally.
    pub gravity_scale: f32,

    /// Multiplier on `gravity_scale` while falling.
    pub fall_gravity_mult: f32,

    /// Multiplier on `gravity_scale` while fast-falling or after a jump cut.
    pub fast_fall_gravity_mult: f32,

    /// Terminal downward speed while falling (units/second).
    pub max_fall_speed: f32,

    /// Terminal downward speed while fast-falling or after a jump cut.
    pub max_fast_fall_speed: f32,
}

impl Default for FallingConfig {
    fn default() -> Self {
        Self {
            gravity_scale: 1.0,
            fall_gravity_mult: 2.0,
            fast_fall_gravity_mult: 3.0,
            max_fall_speed: 25.0,
            max_fast_fall_speed: 30.0,
        }
    }
}

impl FallingConfig {
    /// Gravity scale while falling.
    #[inline]
    pub fn fall_scale(&self) -> f32 {
        self.gravity_scale * self.fall_gravity_mult
    }

    /// Gravity scale while fast-falling or jump-cut.
    #[inline]
    pub fn fast_fall_scale(&self) -> f32 {
        self.gravity_scale * self.fast_fall_gravity_mult
    }
}
