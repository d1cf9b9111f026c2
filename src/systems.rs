//! Core controller systems.
//!
//! These systems glue the update functions in [`crate::movement`] to the
//! ECS. They are generic over the physics backend to allow different physics
//! engines to be used.

use bevy::prelude::*;

use crate::backend::PlatformerPhysicsBackend;
use crate::config::ControllerConfig;
use crate::intent::MovementIntent;
use crate::movement;
use crate::state::{InputSample, MovementController};
use crate::JumpLaunched;

/// Log every newly added config that fails validation.
pub fn warn_invalid_configs(q: Query<(Entity, &ControllerConfig), Added<ControllerConfig>>) {
    for (entity, config) in &q {
        if let Err(err) = config.validate() {
            warn!("invalid ControllerConfig on {entity}: {err}");
        }
    }
}

/// Per-frame update: timers, input sample, jump edges, launch and gravity.
///
/// Runs once per rendered frame, before that frame's fixed steps, so every
/// tick reads the sample taken here.
pub fn update_controllers_frame<B: PlatformerPhysicsBackend>(world: &mut World) {
    let dt = world
        .get_resource::<Time>()
        .map(|t| t.delta_secs())
        .unwrap_or(0.0);

    let entities: Vec<Entity> = world
        .query_filtered::<Entity, (With<MovementController>, With<ControllerConfig>)>()
        .iter(world)
        .collect();

    for entity in entities {
        let Some(config) = world.get::<ControllerConfig>(entity).copied() else {
            continue;
        };
        let velocity = B::get_velocity(world, entity);

        let (sample, edges) = match world.get_mut::<MovementIntent>(entity) {
            Some(mut intent) => (InputSample::from_intent(&intent), intent.drain_jump_edges()),
            None => (InputSample::default(), Vec::new()),
        };

        let Some(mut controller) = world.get_mut::<MovementController>(entity) else {
            continue;
        };
        let ground = controller.ground;
        let output = movement::update_frame(
            &mut controller,
            &config,
            sample,
            &edges,
            ground,
            velocity,
            dt,
        );

        if let Some(impulse) = output.launch_impulse {
            let mass = B::get_mass(world, entity);
            B::apply_impulse(world, entity, Vec2::Y * impulse * mass);
            debug!("{entity} launched a jump (impulse {impulse:.2}, vy was {:.2})", velocity.y);
            world.write_message(JumpLaunched { entity, impulse });
        }

        if output.vertical_floor.is_some() {
            let velocity = B::get_velocity(world, entity);
            let clamped = output.clamp_vertical(velocity.y);
            if clamped != velocity.y {
                B::set_velocity(world, entity, Vec2::new(velocity.x, clamped));
            }
        }

        B::set_gravity_scale(world, entity, output.gravity_scale);
    }
}

/// Per-tick update: horizontal driving force and ground friction.
pub fn update_controllers_run<B: PlatformerPhysicsBackend>(world: &mut World) {
    let entities: Vec<(Entity, ControllerConfig, MovementController)> = world
        .query::<(Entity, &ControllerConfig, &MovementController)>()
        .iter(world)
        .map(|(e, config, controller)| (e, *config, controller.clone()))
        .collect();

    for (entity, config, controller) in entities {
        let mass = B::get_mass(world, entity);
        if mass <= 0.0 {
            continue;
        }

        let velocity = B::get_velocity(world, entity);
        let output = movement::update_run(&controller, &config.running, velocity.x);

        if output.force != 0.0 {
            B::apply_force(world, entity, Vec2::X * output.force * mass);
        }
        if output.friction_impulse != 0.0 {
            B::apply_impulse(world, entity, Vec2::X * output.friction_impulse * mass);
        }
    }
}
