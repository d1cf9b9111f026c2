//! Per-frame and per-tick movement updates.
//!
//! These are plain functions over [`MovementController`] and
//! [`ControllerConfig`]; they never touch the ECS or a physics engine. The
//! systems in [`crate::systems`] feed them the body's velocity and apply what
//! they return. All force and impulse values are per unit mass.

use bevy::prelude::*;

use crate::config::{ControllerConfig, FallingConfig, RunningConfig};
use crate::detection::GroundContact;
use crate::intent::JumpEdge;
use crate::state::{InputSample, JumpPhase, MovementController, PhaseContext};

/// Which gravity rule the frame update selected.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GravityBranch {
    /// Falling with the down input held.
    FastFall,
    /// Falling.
    Fall,
    /// Rising after a jump cut.
    JumpCut,
    /// Everything else.
    Base,
}

impl GravityBranch {
    /// Pick the branch. Checked in priority order: fast-fall, fall, jump cut.
    pub fn select(vertical_velocity: f32, holding_down: bool, phase: JumpPhase) -> Self {
        match (vertical_velocity < 0.0, holding_down, phase) {
            (true, true, _) => Self::FastFall,
            (true, false, _) => Self::Fall,
            (false, _, JumpPhase::AscendingCut) => Self::JumpCut,
            _ => Self::Base,
        }
    }

    /// Gravity scale for this branch.
    pub fn gravity_scale(self, config: &FallingConfig) -> f32 {
        match self {
            Self::FastFall | Self::JumpCut => config.fast_fall_scale(),
            Self::Fall => config.fall_scale(),
            Self::Base => config.gravity_scale,
        }
    }

    /// Lowest allowed vertical velocity for this branch, if it clamps.
    pub fn vertical_floor(self, config: &FallingConfig) -> Option<f32> {
        match self {
            Self::FastFall | Self::JumpCut => Some(-config.max_fast_fall_speed),
            Self::Fall => Some(-config.max_fall_speed),
            Self::Base => None,
        }
    }
}

/// What a frame update asks the backend to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutput {
    /// Upward velocity change to apply as an impulse, if a jump launched.
    pub launch_impulse: Option<f32>,
    /// Gravity scale to set on the body.
    pub gravity_scale: f32,
    /// Lowest allowed vertical velocity after the impulse, if clamped.
    pub vertical_floor: Option<f32>,
    /// The gravity rule that produced the two fields above.
    pub branch: GravityBranch,
}

impl FrameOutput {
    /// Apply the vertical clamp. Only ever raises the velocity.
    #[inline]
    pub fn clamp_vertical(&self, vertical_velocity: f32) -> f32 {
        match self.vertical_floor {
            Some(floor) => vertical_velocity.max(floor),
            None => vertical_velocity,
        }
    }
}

/// What a fixed tick asks the backend to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunOutput {
    /// Continuous horizontal force.
    pub force: f32,
    /// Horizontal friction impulse (zero when friction does not apply).
    pub friction_impulse: f32,
}

/// Launch impulse that brings any downward velocity to zero before adding
/// `force`, so every jump reaches the same apex.
#[inline]
pub fn launch_impulse(force: f32, vertical_velocity: f32) -> f32 {
    force - vertical_velocity.min(0.0)
}

/// Horizontal driving force toward `target`.
///
/// `(|diff| * rate) ^ power`, signed by the direction of the difference. The
/// power is only ever applied to a non-negative base.
#[inline]
pub fn driving_force(target: f32, current: f32, rate: f32, power: f32) -> f32 {
    let diff = target - current;
    (diff.abs() * rate).powf(power).copysign(diff)
}

/// Friction impulse opposing `velocity`, never larger than the velocity itself.
#[inline]
pub fn friction_impulse(velocity: f32, friction: f32) -> f32 {
    -velocity.abs().min(friction.abs()).copysign(velocity)
}

/// Run the per-frame update.
///
/// Counts down the timers, stores the input sample and ground contact,
/// consumes the jump edges, launches a jump when allowed and selects the
/// gravity rule. `velocity` is the body's velocity before this frame's
/// impulse.
pub fn update_frame(
    controller: &mut MovementController,
    config: &ControllerConfig,
    sample: InputSample,
    edges: &[JumpEdge],
    ground: GroundContact,
    velocity: Vec2,
    dt: f32,
) -> FrameOutput {
    controller.timers.tick(dt);
    controller.input = sample;
    controller.ground = ground;

    if ground.overlapping {
        controller.timers.last_on_ground = config.jumping.coyote_time;
    }

    for edge in edges {
        match edge {
            JumpEdge::Pressed => controller.register_jump_press(&config.jumping),
            JumpEdge::Released => {
                controller.jump_latched = false;
                controller.phase = controller.phase.release(velocity.y);
            }
        }
    }

    let mut vertical_velocity = velocity.y;
    let launch = if can_jump(controller) {
        controller.jump_latched = true;
        controller.timers.clear();
        let impulse = launch_impulse(config.jumping.force, vertical_velocity);
        vertical_velocity += impulse;
        Some(impulse)
    } else {
        None
    };

    let holding_down = sample.holding_down(config.running.input_deadzone);
    controller.phase = controller.phase.next(PhaseContext {
        launched: launch.is_some(),
        grounded: ground.overlapping,
        vertical_velocity,
        holding_down,
    });

    let branch = GravityBranch::select(vertical_velocity, holding_down, controller.phase);
    let gravity_scale = branch.gravity_scale(&config.falling);
    controller.gravity_scale = gravity_scale;

    FrameOutput {
        launch_impulse: launch,
        gravity_scale,
        vertical_floor: branch.vertical_floor(&config.falling),
        branch,
    }
}

/// Run the per-tick horizontal update against the cached input sample.
pub fn update_run(
    controller: &MovementController,
    config: &RunningConfig,
    horizontal_velocity: f32,
) -> RunOutput {
    let horizontal = controller.input.horizontal;
    let target = horizontal * config.max_speed;
    let rate = if config.is_active(target) {
        config.acceleration
    } else {
        config.deceleration
    };

    let friction = if controller.timers.on_ground() && !config.is_active(horizontal) {
        friction_impulse(horizontal_velocity, config.friction)
    } else {
        0.0
    };

    // The impulse lands before the force integrates, so drive from the
    // post-friction velocity. An actor friction has stopped gets no force.
    let force = driving_force(
        target,
        horizontal_velocity + friction,
        rate,
        config.velocity_power,
    );

    RunOutput {
        force,
        friction_impulse: friction,
    }
}

fn can_jump(controller: &MovementController) -> bool {
    controller.timers.on_ground() && !controller.jump_latched && controller.timers.jump_buffered()
}
