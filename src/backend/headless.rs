//! Headless backend.
//!
//! A minimal rigid body with no collision detection. It integrates velocity
//! and position under a constant gravity and takes its ground contact from a
//! flag, which makes the controller fully deterministic. Useful for tests,
//! replays, AI planning and server-side simulation.

use bevy::app::RunFixedMainLoop;
use bevy::prelude::*;

use crate::backend::PlatformerPhysicsBackend;
use crate::detection::GroundContact;
use crate::state::MovementController;
use crate::PlatformerControllerSet;

/// Rigid body state for the headless backend.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
pub struct HeadlessBody {
    /// World-space position.
    pub position: Vec2,
    /// Linear velocity.
    pub velocity: Vec2,
    /// Multiplier on [`HeadlessGravity`].
    pub gravity_scale: f32,
    /// Mass used to turn forces and impulses into velocity changes.
    pub mass: f32,
    /// Whether the body counts as touching ground. Set by the caller.
    pub grounded: bool,
    force: Vec2,
}

impl Default for HeadlessBody {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            gravity_scale: 1.0,
            mass: 1.0,
            grounded: false,
            force: Vec2::ZERO,
        }
    }
}

impl HeadlessBody {
    /// Create a body with unit mass at `position`.
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..default()
        }
    }

    /// Builder: set the initial velocity.
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Builder: set mass.
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    /// Builder: set the ground flag.
    pub fn with_grounded(mut self, grounded: bool) -> Self {
        self.grounded = grounded;
        self
    }

    /// Force accumulated since the last integration step.
    pub fn pending_force(&self) -> Vec2 {
        self.force
    }

    fn valid_mass(&self) -> Option<f32> {
        (self.mass > 0.0 && self.mass.is_finite()).then_some(self.mass)
    }
}

/// Gravity acceleration applied to every [`HeadlessBody`].
#[derive(Resource, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Resource)]
pub struct HeadlessGravity(pub Vec2);

impl Default for HeadlessGravity {
    fn default() -> Self {
        Self(Vec2::new(0.0, -9.81))
    }
}

/// Headless physics backend for the platformer controller.
pub struct HeadlessBackend;

impl PlatformerPhysicsBackend for HeadlessBackend {
    fn plugin() -> impl Plugin {
        HeadlessBackendPlugin
    }

    fn get_velocity(world: &World, entity: Entity) -> Vec2 {
        world
            .get::<HeadlessBody>(entity)
            .map(|b| b.velocity)
            .unwrap_or(Vec2::ZERO)
    }

    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec2) {
        if let Some(mut body) = world.get_mut::<HeadlessBody>(entity) {
            body.velocity = velocity;
        }
    }

    fn set_gravity_scale(world: &mut World, entity: Entity, scale: f32) {
        if let Some(mut body) = world.get_mut::<HeadlessBody>(entity) {
            body.gravity_scale = scale;
        }
    }

    fn apply_impulse(world: &mut World, entity: Entity, impulse: Vec2) {
        if let Some(mut body) = world.get_mut::<HeadlessBody>(entity) {
            if let Some(mass) = body.valid_mass() {
                body.velocity += impulse / mass;
            }
        }
    }

    fn apply_force(world: &mut World, entity: Entity, force: Vec2) {
        if let Some(mut body) = world.get_mut::<HeadlessBody>(entity) {
            body.force += force;
        }
    }

    fn get_mass(world: &World, entity: Entity) -> f32 {
        world
            .get::<HeadlessBody>(entity)
            .and_then(HeadlessBody::valid_mass)
            .unwrap_or(0.0)
    }
}

/// Plugin that sets up the headless body systems.
pub struct HeadlessBackendPlugin;

impl Plugin for HeadlessBackendPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<HeadlessBody>();
        app.init_resource::<HeadlessGravity>();

        app.add_systems(
            RunFixedMainLoop,
            headless_ground_detection.in_set(PlatformerControllerSet::Sensors),
        );
        app.add_systems(
            FixedUpdate,
            integrate_headless_bodies.after(PlatformerControllerSet::FinalApplication),
        );
    }
}

/// Copy each body's ground flag into its controller.
fn headless_ground_detection(mut q: Query<(&HeadlessBody, &mut MovementController)>) {
    for (body, mut controller) in &mut q {
        controller.ground = if body.grounded {
            GroundContact::hit(body.position)
        } else {
            GroundContact::miss(body.position)
        };
    }
}

/// Semi-implicit Euler step for every body. A grounded body cannot move
/// below its current height.
fn integrate_headless_bodies(
    time: Res<Time>,
    gravity: Res<HeadlessGravity>,
    mut q: Query<&mut HeadlessBody>,
) {
    let dt = time.delta_secs();
    for mut body in &mut q {
        let acceleration = match body.valid_mass() {
            Some(mass) => body.force / mass,
            None => Vec2::ZERO,
        };
        let gravity = gravity.0 * body.gravity_scale;

        body.velocity += (acceleration + gravity) * dt;
        if body.grounded && body.velocity.y < 0.0 {
            body.velocity.y = 0.0;
        }
        let velocity = body.velocity;
        body.position += velocity * dt;
        body.force = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impulse_scales_by_mass() {
        let mut world = World::new();
        let entity = world.spawn(HeadlessBody::default().with_mass(2.0)).id();

        HeadlessBackend::apply_impulse(&mut world, entity, Vec2::new(0.0, 10.0));
        assert_eq!(HeadlessBackend::get_velocity(&world, entity), Vec2::new(0.0, 5.0));
    }

    #[test]
    fn zero_mass_ignores_impulse() {
        let mut world = World::new();
        let entity = world.spawn(HeadlessBody::default().with_mass(0.0)).id();

        HeadlessBackend::apply_impulse(&mut world, entity, Vec2::X);
        assert_eq!(HeadlessBackend::get_velocity(&world, entity), Vec2::ZERO);
        assert_eq!(HeadlessBackend::get_mass(&world, entity), 0.0);
    }

    #[test]
    fn forces_accumulate_until_integration() {
        let mut world = World::new();
        let entity = world.spawn(HeadlessBody::default()).id();

        HeadlessBackend::apply_force(&mut world, entity, Vec2::X);
        HeadlessBackend::apply_force(&mut world, entity, Vec2::X);

        let body = world.get::<HeadlessBody>(entity).unwrap();
        assert_eq!(body.pending_force(), Vec2::new(2.0, 0.0));
    }

    #[test]
    fn missing_body_is_neutral() {
        let mut world = World::new();
        let entity = world.spawn_empty().id();

        HeadlessBackend::set_velocity(&mut world, entity, Vec2::ONE);
        HeadlessBackend::set_gravity_scale(&mut world, entity, 3.0);
        assert_eq!(HeadlessBackend::get_velocity(&world, entity), Vec2::ZERO);
        assert_eq!(HeadlessBackend::get_mass(&world, entity), 0.0);
    }

    #[cfg(feature = "avian2d")]
    #[test]
    fn headless_actor_gets_no_avian_body() {
        use crate::PlatformerControllerPlugin;

        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(PlatformerControllerPlugin::<HeadlessBackend>::default());

        let entity = app
            .world_mut()
            .spawn((MovementController::new(), HeadlessBody::default()))
            .id();
        app.update();

        assert!(app.world().get::<avian2d::prelude::RigidBody>(entity).is_none());
        assert!(app.world().get::<avian2d::prelude::LinearVelocity>(entity).is_none());
        assert!(app.world().get::<crate::config::ControllerConfig>(entity).is_some());
    }

    #[test]
    fn gravity_scale_is_written() {
        let mut world = World::new();
        let entity = world.spawn(HeadlessBody::default()).id();

        HeadlessBackend::set_gravity_scale(&mut world, entity, 2.5);
        assert_eq!(world.get::<HeadlessBody>(entity).unwrap().gravity_scale, 2.5);
    }
}
