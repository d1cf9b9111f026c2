//! # `tight_platformer_controller`
//!
//! A responsive 2D platformer movement controller with physics backend
//! abstraction.
//!
//! This crate turns directional and jump input into forces on a dynamic
//! rigid body and provides:
//! - Power-curve horizontal acceleration with separate accel/decel rates
//! - Ground friction that brings the actor to rest without input
//! - Jump buffering and coyote time
//! - Variable jump height (releasing jump mid-ascent cuts the jump)
//! - Heavier fall gravity, fast-fall on down input, and terminal fall speeds
//! - Launch compensation: every jump reaches the same apex, even when
//!   jumping while already falling (coyote jumps)
//! - A physics backend trait (Avian2D and a headless body included)
//!
//! ## System Order
//!
//! Systems run in clearly defined phases using [`PlatformerControllerSet`].
//! Once per frame, before the fixed timestep loop:
//!
//! 1. **Input** - Sample input into `MovementIntent`
//! 2. **Sensors** - Ground overlap query
//! 3. **FrameUpdate** - Timers, jump edges, jump launch, gravity selection
//!
//! Once per fixed tick:
//!
//! 4. **Preparation** - Remove the force committed last tick
//! 5. **Run** - Horizontal driving force and friction
//! 6. **FinalApplication** - Commit accumulated forces to physics
//!
//! ## Usage
//!
//! ```rust
//! use tight_platformer_controller::prelude::*;
//!
//! // Create controller components
//! let controller = MovementController::new();
//! let config = ControllerConfig::player();
//! let intent = MovementIntent::default();
//!
//! // These can be spawned with physics components
//! assert!(config.validate().is_ok());
//! ```

use bevy::app::{RunFixedMainLoop, RunFixedMainLoopSystems};
use bevy::prelude::*;

pub mod backend;
pub mod config;
pub mod detection;
pub mod error;
pub mod input;
pub mod intent;
pub mod movement;
pub mod state;

// Systems are internal - they're added automatically by the plugin
pub(crate) mod systems;

/// System sets for platformer controller phases.
///
/// `Input`, `Sensors` and `FrameUpdate` run in [`RunFixedMainLoop`] before
/// the fixed loop, once per frame. `Preparation`, `Run` and
/// `FinalApplication` run in [`FixedUpdate`], once per tick.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformerControllerSet {
    /// Per frame: write `MovementIntent` from an input source.
    Input,
    /// Per frame: ground overlap query.
    Sensors,
    /// Per frame: timers, jump state, gravity scale.
    FrameUpdate,
    /// Per tick: remove last tick's controller force.
    Preparation,
    /// Per tick: horizontal force and friction.
    Run,
    /// Per tick: commit accumulated forces to the physics engine.
    FinalApplication,
}

/// Message written when an actor launches a jump.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct JumpLaunched {
    /// The actor that jumped.
    pub entity: Entity,
    /// Upward velocity change applied, including fall compensation.
    pub impulse: f32,
}

pub mod prelude {
    //! Convenient re-exports for common usage.
    //!
    //! ```rust,no_run
    //! use avian2d::prelude::*;
    //! use bevy::prelude::*;
    //! use tight_platformer_controller::prelude::*;
    //!
    //! fn spawn_player(mut commands: Commands) {
    //!     commands.spawn((
    //!         Transform::from_xyz(0.0, 2.0, 0.0),
    //!         MovementController::new(),
    //!         ControllerConfig::player(),
    //!         KeyboardBindings::default(),
    //!         Collider::capsule(0.25, 0.5),
    //!         LockedAxes::ROTATION_LOCKED,
    //!     ));
    //! }
    //! ```

    pub use crate::JumpLaunched;
    pub use crate::PlatformerControllerPlugin;
    pub use crate::PlatformerControllerSet;
    pub use crate::backend::{HeadlessBackend, HeadlessBody, HeadlessGravity, PlatformerPhysicsBackend};
    pub use crate::config::{
        ControllerConfig, FallingConfig, GroundSensorConfig, JumpingConfig, RunningConfig,
    };
    pub use crate::detection::GroundContact;
    pub use crate::error::ConfigError;
    pub use crate::input::{KeyboardBindings, KeyboardInputPlugin};
    pub use crate::intent::{JumpEdge, MovementIntent};
    pub use crate::movement::GravityBranch;
    pub use crate::state::{JumpPhase, MovementController, MovementTimers};

    #[cfg(feature = "avian2d")]
    pub use crate::backend::Avian2dBackend;
}

/// Main plugin for the platformer controller.
///
/// This plugin is generic over a physics backend `B` which provides the
/// actual physics operations (velocity, gravity scale, forces, ground query).
///
/// # Examples
///
/// With the Avian2D backend:
/// ```rust,no_run
/// use avian2d::prelude::*;
/// use bevy::prelude::*;
/// use tight_platformer_controller::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(PhysicsPlugins::default())
///     .add_plugins(PlatformerControllerPlugin::<Avian2dBackend>::default())
///     .add_plugins(KeyboardInputPlugin)
///     .run();
/// ```
pub struct PlatformerControllerPlugin<B: backend::PlatformerPhysicsBackend> {
    _marker: std::marker::PhantomData<B>,
}

impl<B: backend::PlatformerPhysicsBackend> Default for PlatformerControllerPlugin<B> {
    fn default() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }
}

impl<B: backend::PlatformerPhysicsBackend> PlatformerControllerPlugin<B> {
    /// Create a new platformer controller plugin.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<B: backend::PlatformerPhysicsBackend> Plugin for PlatformerControllerPlugin<B> {
    fn build(&self, app: &mut App) {
        // Register core types
        app.register_type::<config::ControllerConfig>();
        app.register_type::<state::MovementController>();
        app.register_type::<intent::MovementIntent>();
        app.add_message::<JumpLaunched>();

        // Add the physics backend plugin
        app.add_plugins(B::plugin());

        // Frame phases run before the fixed loop so ticks see this frame's sample
        app.configure_sets(
            RunFixedMainLoop,
            (
                PlatformerControllerSet::Input,
                PlatformerControllerSet::Sensors,
                PlatformerControllerSet::FrameUpdate,
            )
                .chain()
                .in_set(RunFixedMainLoopSystems::BeforeFixedMainLoop),
        );
        app.configure_sets(
            FixedUpdate,
            (
                PlatformerControllerSet::Preparation,
                PlatformerControllerSet::Run,
                PlatformerControllerSet::FinalApplication,
            )
                .chain(),
        );

        app.add_systems(
            RunFixedMainLoop,
            (
                systems::warn_invalid_configs,
                systems::update_controllers_frame::<B>,
            )
                .chain()
                .in_set(PlatformerControllerSet::FrameUpdate),
        );
        app.add_systems(
            FixedUpdate,
            systems::update_controllers_run::<B>.in_set(PlatformerControllerSet::Run),
        );
    }
}
