//! Physics backend abstraction.
//!
//! This module defines the trait that physics backends must implement to
//! work with the platformer controller. The controller only ever nudges the
//! body: it reads velocity and mass, writes velocity and gravity scale, and
//! applies forces and impulses. Integration and collision stay with the
//! physics engine.

use bevy::prelude::*;

/// Trait for physics backend implementations.
///
/// Implement this trait to drive a rigid body from a physics engine. Every
/// method must tolerate entities that are missing the backend's components:
/// reads fall back to neutral values and writes are skipped.
///
/// Besides these methods, a backend's [`plugin`](Self::plugin) is expected
/// to run a ground sensor in
/// [`PlatformerControllerSet::Sensors`](crate::PlatformerControllerSet::Sensors)
/// that writes [`MovementController::ground`](crate::state::MovementController::ground),
/// and to commit the per-tick force accumulator in
/// [`PlatformerControllerSet::Preparation`](crate::PlatformerControllerSet::Preparation)
/// and [`PlatformerControllerSet::FinalApplication`](crate::PlatformerControllerSet::FinalApplication)
/// if [`apply_force`](Self::apply_force) defers to it.
pub trait PlatformerPhysicsBackend: 'static + Send + Sync {
    /// Returns the plugin that sets up this backend.
    fn plugin() -> impl Plugin;

    /// Get the current linear velocity of an entity.
    fn get_velocity(world: &World, entity: Entity) -> Vec2;

    /// Set the linear velocity of an entity.
    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec2);

    /// Set the gravity scale of an entity.
    fn set_gravity_scale(world: &mut World, entity: Entity, scale: f32);

    /// Apply an impulse to an entity.
    ///
    /// Impulse is an instantaneous change in momentum.
    fn apply_impulse(world: &mut World, entity: Entity, impulse: Vec2);

    /// Apply a force to an entity.
    ///
    /// Force is applied over the physics timestep.
    fn apply_force(world: &mut World, entity: Entity, force: Vec2);

    /// Get the mass of an entity.
    ///
    /// Used to scale forces so that config parameters produce consistent
    /// acceleration regardless of actual body mass. Returns 0.0 when the
    /// entity has no valid mass, which turns force application into a no-op.
    fn get_mass(world: &World, entity: Entity) -> f32;
}
