//! Movement intent components.
//!
//! Intents represent the desired movement from player input, AI, replays or
//! the network. The controller samples them once per frame; nothing else in
//! the crate polls input devices.

use bevy::prelude::*;

/// An edge of the jump button.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpEdge {
    /// The button went down. Re-arms the jump buffer.
    Pressed,
    /// The button went up. May cut an ascending jump short.
    Released,
}

/// Movement intent for a platformer actor.
///
/// Axis values are stored clamped to `[-1, 1]`. Jump edges are queued in the
/// order they happened and drained by the controller on its next frame
/// update, so several edges within one frame are all honored.
///
/// # Example
///
/// ```rust
/// use tight_platformer_controller::prelude::*;
///
/// let mut intent = MovementIntent::new();
/// intent.set_horizontal(1.0);
/// intent.press_jump();
/// assert!(intent.has_pending_jump_edges());
///
/// intent.clear();
/// assert_eq!(intent.horizontal, 0.0);
/// ```
#[derive(Component, Reflect, Debug, Clone, Default, PartialEq)]
#[reflect(Component)]
pub struct MovementIntent {
    /// Horizontal axis (-1.0 = left, 1.0 = right).
    pub horizontal: f32,
    /// Vertical axis (-1.0 = down, 1.0 = up).
    pub vertical: f32,
    pending: Vec<JumpEdge>,
}

impl MovementIntent {
    /// Create a new empty movement intent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the horizontal axis.
    pub fn set_horizontal(&mut self, axis: f32) {
        self.horizontal = axis.clamp(-1.0, 1.0);
    }

    /// Set the vertical axis.
    pub fn set_vertical(&mut self, axis: f32) {
        self.vertical = axis.clamp(-1.0, 1.0);
    }

    /// Queue a jump press edge.
    pub fn press_jump(&mut self) {
        self.pending.push(JumpEdge::Pressed);
    }

    /// Queue a jump release edge.
    pub fn release_jump(&mut self) {
        self.pending.push(JumpEdge::Released);
    }

    /// Whether any jump edges are waiting for the next frame update.
    pub fn has_pending_jump_edges(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Take all queued jump edges in the order they were pushed.
    pub fn drain_jump_edges(&mut self) -> Vec<JumpEdge> {
        std::mem::take(&mut self.pending)
    }

    /// Clear both axes and any queued edges.
    pub fn clear(&mut self) {
        self.horizontal = 0.0;
        self.vertical = 0.0;
        self.pending.clear();
    }
}
