//! Controller state.
//!
//! [`MovementController`] is the per-actor state the update functions in
//! [`crate::movement`] read and write: leniency timers, the jump phase, the
//! cached input sample and this frame's ground contact.

use bevy::prelude::*;

use crate::config::{ControllerConfig, JumpingConfig};
use crate::detection::GroundContact;
use crate::intent::MovementIntent;

/// Countdown timers, in seconds.
///
/// Both saturate at zero. Only positivity is ever inspected.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq)]
pub struct MovementTimers {
    /// Remaining coyote time. Re-armed every frame the ground sensor overlaps.
    pub last_on_ground: f32,
    /// Remaining jump buffer. Re-armed by a jump press.
    pub last_pressed_jump: f32,
}

impl MovementTimers {
    /// Count both timers down by `dt`.
    pub fn tick(&mut self, dt: f32) {
        self.last_on_ground = (self.last_on_ground - dt).max(0.0);
        self.last_pressed_jump = (self.last_pressed_jump - dt).max(0.0);
    }

    /// Whether a jump is still allowed from the ground (including coyote time).
    #[inline]
    pub fn on_ground(&self) -> bool {
        self.last_on_ground > 0.0
    }

    /// Whether a jump press is still buffered.
    #[inline]
    pub fn jump_buffered(&self) -> bool {
        self.last_pressed_jump > 0.0
    }

    /// Expire both timers.
    pub fn clear(&mut self) {
        self.last_on_ground = 0.0;
        self.last_pressed_jump = 0.0;
    }
}

/// Axis values sampled once per frame and reused by every fixed tick until
/// the next sample.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSample {
    /// Horizontal axis in `[-1, 1]`.
    pub horizontal: f32,
    /// Vertical axis in `[-1, 1]`.
    pub vertical: f32,
}

impl InputSample {
    /// Copy the axes out of an intent.
    pub fn from_intent(intent: &MovementIntent) -> Self {
        Self {
            horizontal: intent.horizontal,
            vertical: intent.vertical,
        }
    }

    /// Whether the vertical axis is pushed down past `deadzone`.
    #[inline]
    pub fn holding_down(&self, deadzone: f32) -> bool {
        self.vertical < -deadzone
    }
}

/// Where the actor is in its jump arc.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum JumpPhase {
    /// Standing or walking on ground.
    #[default]
    Grounded,
    /// Rising after a launch with the jump button held.
    Ascending,
    /// Rising after the jump button was released early.
    AscendingCut,
    /// Moving downward.
    Falling,
    /// Moving downward with the down input held.
    FastFalling,
}

/// Inputs to a single [`JumpPhase::next`] transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseContext {
    /// A jump launched this frame.
    pub launched: bool,
    /// The ground sensor overlaps this frame.
    pub grounded: bool,
    /// Vertical velocity after any launch impulse.
    pub vertical_velocity: f32,
    /// The down input is held.
    pub holding_down: bool,
}

impl JumpPhase {
    /// Whether the phase is one of the falling phases.
    #[inline]
    pub fn is_falling(self) -> bool {
        matches!(self, Self::Falling | Self::FastFalling)
    }

    /// Whether the actor is off the ground.
    #[inline]
    pub fn is_airborne(self) -> bool {
        self != Self::Grounded
    }

    /// Apply a jump release. Only a rising jump that is still moving up is cut.
    pub fn release(self, vertical_velocity: f32) -> Self {
        match self {
            Self::Ascending if vertical_velocity > 0.0 => Self::AscendingCut,
            other => other,
        }
    }

    /// Advance the phase by one frame.
    pub fn next(self, ctx: PhaseContext) -> Self {
        if ctx.launched {
            return Self::Ascending;
        }

        let vy = ctx.vertical_velocity;
        let falling = if ctx.holding_down {
            Self::FastFalling
        } else {
            Self::Falling
        };

        match self {
            Self::Grounded if !ctx.grounded && vy < 0.0 => falling,
            Self::Grounded => Self::Grounded,
            _ if ctx.grounded && vy <= 0.0 => Self::Grounded,
            Self::Ascending | Self::AscendingCut if vy < 0.0 => falling,
            Self::Ascending => Self::Ascending,
            Self::AscendingCut => Self::AscendingCut,
            Self::Falling | Self::FastFalling => falling,
        }
    }
}

/// Core platformer controller component.
///
/// Spawn it next to a [`ControllerConfig`] and a [`MovementIntent`] (both
/// are inserted with defaults when missing). The physics components a
/// backend writes to are registered as required by that backend's plugin,
/// so an actor only gets the bodies of the backend the app runs.
#[derive(Component, Reflect, Debug, Clone, PartialEq)]
#[reflect(Component)]
#[require(ControllerConfig, MovementIntent)]
pub struct MovementController {
    /// Coyote and jump buffer timers.
    pub timers: MovementTimers,
    /// Current jump phase.
    pub phase: JumpPhase,
    /// The jump button has been held since the last launch. A new jump needs
    /// a release first.
    pub jump_latched: bool,
    /// Most recent per-frame input sample.
    pub input: InputSample,
    /// Most recent ground sensor result.
    pub ground: GroundContact,
    /// Gravity scale chosen by the last frame update.
    pub gravity_scale: f32,

    // Force bookkeeping for backends that commit forces once per tick.
    pub(crate) accumulated_force: Vec2,
    pub(crate) applied_force: Vec2,
}

impl Default for MovementController {
    fn default() -> Self {
        Self {
            timers: MovementTimers::default(),
            phase: JumpPhase::Grounded,
            jump_latched: false,
            input: InputSample::default(),
            ground: GroundContact::default(),
            gravity_scale: 1.0,
            accumulated_force: Vec2::ZERO,
            applied_force: Vec2::ZERO,
        }
    }
}

impl MovementController {
    /// Create a new controller in the grounded phase with expired timers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-arm the jump buffer.
    ///
    /// Calling this repeatedly never extends the buffer past
    /// `input_buffer_time` from the latest call.
    pub fn register_jump_press(&mut self, config: &JumpingConfig) {
        self.timers.last_pressed_jump = config.input_buffer_time;
    }

    /// Whether the ground sensor overlapped on the last frame.
    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.ground.overlapping
    }

    /// Whether a jump is still allowed from the ground (including coyote time).
    #[inline]
    pub fn in_coyote_time(&self) -> bool {
        self.timers.on_ground()
    }

    /// Whether the current jump was cut short.
    #[inline]
    pub fn is_jump_cut(&self) -> bool {
        self.phase == JumpPhase::AscendingCut
    }

    /// Add a force to this tick's accumulator.
    pub fn add_force(&mut self, force: Vec2) {
        self.accumulated_force += force;
    }

    /// Start a new tick: returns the force committed last tick so the backend
    /// can remove it, and clears the accumulator.
    pub fn prepare_new_tick(&mut self) -> Vec2 {
        self.accumulated_force = Vec2::ZERO;
        std::mem::take(&mut self.applied_force)
    }

    /// Finish a tick: returns the accumulated force and remembers it as
    /// committed.
    pub fn finalize_tick(&mut self) -> Vec2 {
        self.applied_force = self.accumulated_force;
        self.applied_force
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(grounded: bool, vertical_velocity: f32, holding_down: bool) -> PhaseContext {
        PhaseContext {
            launched: false,
            grounded,
            vertical_velocity,
            holding_down,
        }
    }

    #[test]
    fn timers_saturate_at_zero() {
        let mut timers = MovementTimers {
            last_on_ground: 0.05,
            last_pressed_jump: 0.2,
        };
        timers.tick(0.1);
        assert_eq!(timers.last_on_ground, 0.0);
        assert!((timers.last_pressed_jump - 0.1).abs() < 1e-6);
        assert!(!timers.on_ground());
        assert!(timers.jump_buffered());

        timers.tick(10.0);
        assert_eq!(timers.last_pressed_jump, 0.0);
    }

    #[test]
    fn register_jump_press_does_not_stack() {
        let config = JumpingConfig::default();
        let mut controller = MovementController::new();

        controller.register_jump_press(&config);
        controller.timers.tick(0.04);
        controller.register_jump_press(&config);
        controller.register_jump_press(&config);

        assert_eq!(controller.timers.last_pressed_jump, config.input_buffer_time);
    }

    #[test]
    fn launch_always_ascends() {
        for phase in [
            JumpPhase::Grounded,
            JumpPhase::Falling,
            JumpPhase::FastFalling,
            JumpPhase::AscendingCut,
        ] {
            let next = phase.next(PhaseContext {
                launched: true,
                ..ctx(true, -3.0, true)
            });
            assert_eq!(next, JumpPhase::Ascending);
        }
    }

    #[test]
    fn release_cuts_only_rising_jump() {
        assert_eq!(JumpPhase::Ascending.release(2.0), JumpPhase::AscendingCut);
        assert_eq!(JumpPhase::Ascending.release(0.0), JumpPhase::Ascending);
        assert_eq!(JumpPhase::Falling.release(2.0), JumpPhase::Falling);
        assert_eq!(JumpPhase::Grounded.release(2.0), JumpPhase::Grounded);
    }

    #[test]
    fn ascending_turns_into_falling_at_apex() {
        assert_eq!(JumpPhase::Ascending.next(ctx(false, 1.0, false)), JumpPhase::Ascending);
        assert_eq!(JumpPhase::Ascending.next(ctx(false, -0.1, false)), JumpPhase::Falling);
        assert_eq!(
            JumpPhase::AscendingCut.next(ctx(false, -0.1, true)),
            JumpPhase::FastFalling
        );
    }

    #[test]
    fn ascending_stays_while_sensor_still_overlaps() {
        assert_eq!(JumpPhase::Ascending.next(ctx(true, 12.0, false)), JumpPhase::Ascending);
    }

    #[test]
    fn falling_follows_down_input() {
        assert_eq!(JumpPhase::Falling.next(ctx(false, -5.0, true)), JumpPhase::FastFalling);
        assert_eq!(JumpPhase::FastFalling.next(ctx(false, -5.0, false)), JumpPhase::Falling);
    }

    #[test]
    fn landing_returns_to_grounded() {
        assert_eq!(JumpPhase::Falling.next(ctx(true, -2.0, false)), JumpPhase::Grounded);
        assert_eq!(JumpPhase::AscendingCut.next(ctx(true, 0.0, false)), JumpPhase::Grounded);
    }

    #[test]
    fn walking_off_ledge_starts_falling() {
        assert_eq!(JumpPhase::Grounded.next(ctx(true, -0.5, false)), JumpPhase::Grounded);
        assert_eq!(JumpPhase::Grounded.next(ctx(false, -0.5, false)), JumpPhase::Falling);
        assert_eq!(JumpPhase::Grounded.next(ctx(false, 0.0, false)), JumpPhase::Grounded);
    }

    #[test]
    fn force_bookkeeping_roundtrip() {
        let mut controller = MovementController::new();
        controller.add_force(Vec2::new(3.0, 0.0));
        controller.add_force(Vec2::new(1.0, 0.0));
        assert_eq!(controller.finalize_tick(), Vec2::new(4.0, 0.0));

        assert_eq!(controller.prepare_new_tick(), Vec2::new(4.0, 0.0));
        assert_eq!(controller.finalize_tick(), Vec2::ZERO);
    }

    #[test]
    fn holding_down_uses_deadzone() {
        let sample = InputSample {
            horizontal: 0.0,
            vertical: -0.005,
        };
        assert!(!sample.holding_down(0.01));
        let sample = InputSample {
            horizontal: 0.0,
            vertical: -1.0,
        };
        assert!(sample.holding_down(0.01));
    }
}
