//! Configuration for jump launch and leniency windows.

use bevy::prelude::*;

/// Configuration for jump launch and leniency windows.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct JumpingConfig {
    /// Launch velocity (per unit mass). Downward velocity is cancelled on top
    /// of this so every launch reaches the same apex.
    pub force: f32,

    /// How long (seconds) a jump press stays buffered while the character
    /// cannot jump yet.
    pub input_buffer_time: f32,

    /// How long (seconds) after leaving the ground a jump is still allowed.
    pub coyote_time: f32,
}

impl Default for JumpingConfig {
    fn default() -> Self {
        Self {
            force: 13.0,
            input_buffer_time: 0.1,
            coyote_time: 0.1,
        }
    }
}
