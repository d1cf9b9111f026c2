//! Avian2D physics backend implementation.
//!
//! This module provides the physics backend for Avian2D (`avian2d`).
//! Enable with the `avian2d` feature.

use avian2d::prelude::*;
use bevy::app::RunFixedMainLoop;
use bevy::prelude::*;

use crate::backend::PlatformerPhysicsBackend;
use crate::config::ControllerConfig;
use crate::detection::{ground_sensor_center, GroundContact};
use crate::state::MovementController;

/// Avian2D physics backend for the platformer controller.
///
/// Velocity and gravity scale map onto `LinearVelocity` and `GravityScale`.
/// Forces are accumulated on the [`MovementController`] during a tick and
/// committed to `ConstantForce` once, so forces added by other systems are
/// left alone. Ground detection is handled by a dedicated system that uses
/// `SpatialQuery` as a system parameter.
pub struct Avian2dBackend;

impl PlatformerPhysicsBackend for Avian2dBackend {
    fn plugin() -> impl Plugin {
        Avian2dBackendPlugin
    }

    fn get_velocity(world: &World, entity: Entity) -> Vec2 {
        world
            .get::<LinearVelocity>(entity)
            .map(|v| v.0)
            .unwrap_or(Vec2::ZERO)
    }

    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec2) {
        if let Some(mut vel) = world.get_mut::<LinearVelocity>(entity) {
            vel.0 = velocity;
        }
    }

    fn set_gravity_scale(world: &mut World, entity: Entity, scale: f32) {
        if let Some(mut gravity_scale) = world.get_mut::<GravityScale>(entity) {
            gravity_scale.0 = scale;
        }
    }

    fn apply_impulse(world: &mut World, entity: Entity, impulse: Vec2) {
        // Impulse = mass * delta_v, so delta_v = impulse / mass
        let mass = Self::get_mass(world, entity);
        if mass <= 0.0 {
            return;
        }
        let delta_v = impulse / mass;
        if let Some(mut vel) = world.get_mut::<LinearVelocity>(entity) {
            vel.0 += delta_v;
        }
    }

    fn apply_force(world: &mut World, entity: Entity, force: Vec2) {
        // Committed to ConstantForce by apply_controller_forces.
        if let Some(mut controller) = world.get_mut::<MovementController>(entity) {
            controller.add_force(force);
        }
    }

    fn get_mass(world: &World, entity: Entity) -> f32 {
        let Some(computed_mass) = world.get::<ComputedMass>(entity) else {
            return 0.0;
        };
        let mass = computed_mass.value();
        if mass <= 0.0 || !mass.is_finite() {
            return 0.0;
        }
        mass
    }
}

/// Plugin that sets up Avian2D-specific systems for the platformer controller.
pub struct Avian2dBackendPlugin;

impl Plugin for Avian2dBackendPlugin {
    fn build(&self, app: &mut App) {
        use crate::PlatformerControllerSet;

        // Only apps running this backend give controllers an Avian body
        app.register_required_components::<MovementController, RigidBody>();
        app.register_required_components::<MovementController, LinearVelocity>();
        app.register_required_components::<MovementController, ConstantForce>();
        app.register_required_components::<MovementController, GravityScale>();

        app.add_systems(
            RunFixedMainLoop,
            avian_ground_detection.in_set(PlatformerControllerSet::Sensors),
        );

        app.add_systems(
            FixedUpdate,
            clear_controller_forces.in_set(PlatformerControllerSet::Preparation),
        );
        app.add_systems(
            FixedUpdate,
            apply_controller_forces.in_set(PlatformerControllerSet::FinalApplication),
        );
    }
}

/// Get the distance from collider center to bottom for a given collider.
/// For capsules, this is half_height + radius.
pub fn get_collider_bottom_offset(collider: &Collider) -> f32 {
    if let Some(capsule) = collider.shape_scaled().as_capsule() {
        let segment = capsule.segment;
        let half_height = (segment.a.y - segment.b.y).abs() / 2.0;
        half_height + capsule.radius
    } else if let Some(ball) = collider.shape_scaled().as_ball() {
        ball.radius
    } else if let Some(cuboid) = collider.shape_scaled().as_cuboid() {
        cuboid.half_extents.y
    } else {
        // Unknown shape: sense from the body position
        0.0
    }
}

/// Whether a box of `size` centred at `sensor_center` overlaps any collider on
/// `ground_layers`, ignoring `exclude`.
pub fn ground_overlap(
    spatial_query: &SpatialQuery,
    sensor_center: Vec2,
    size: Vec2,
    ground_layers: u32,
    exclude: Entity,
) -> bool {
    let shape = Collider::rectangle(size.x, size.y);
    let filter = SpatialQueryFilter::from_mask(ground_layers).with_excluded_entities([exclude]);

    !spatial_query
        .shape_intersections(&shape, sensor_center, 0.0, &filter)
        .is_empty()
}

/// Avian-specific ground detection system.
///
/// The sensor box sits at the bottom of the actor's collider, using the
/// physics `Position` rather than `Transform` so it sees the latest step.
fn avian_ground_detection(
    spatial_query: SpatialQuery,
    mut q_controllers: Query<(
        Entity,
        &Position,
        &ControllerConfig,
        &mut MovementController,
        Option<&Collider>,
    )>,
) {
    for (entity, position, config, mut controller, collider) in &mut q_controllers {
        let sensor = &config.ground_sensor;
        let bottom_offset = collider.map(get_collider_bottom_offset).unwrap_or(0.0);
        let sensor_center = ground_sensor_center(position.0, bottom_offset, sensor.offset);

        controller.ground = if ground_overlap(
            &spatial_query,
            sensor_center,
            sensor.size,
            sensor.ground_layers,
            entity,
        ) {
            GroundContact::hit(sensor_center)
        } else {
            GroundContact::miss(sensor_center)
        };
    }
}

/// Remove last tick's controller force before the new tick accumulates.
///
/// Subtracting (rather than zeroing) keeps forces other systems put on the
/// same `ConstantForce`.
pub fn clear_controller_forces(mut q: Query<(&mut MovementController, Option<&mut ConstantForce>)>) {
    for (mut controller, constant_force) in &mut q {
        let force_to_subtract = controller.prepare_new_tick();

        if let Some(mut force) = constant_force {
            force.0 -= force_to_subtract;
        }
    }
}

/// Commit this tick's accumulated controller force to `ConstantForce`.
pub fn apply_controller_forces(mut q: Query<(&mut MovementController, Option<&mut ConstantForce>)>) {
    for (mut controller, constant_force) in &mut q {
        let force_to_apply = controller.finalize_tick();

        if let Some(mut force) = constant_force {
            force.0 += force_to_apply;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlatformerControllerPlugin;

    fn create_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(bevy::transform::TransformPlugin);
        // Insert SceneSpawner resource required by Avian's ColliderHierarchyPlugin
        app.insert_resource(bevy::scene::SceneSpawner::default());
        app.add_plugins(PhysicsPlugins::default());
        app.insert_resource(Time::<Fixed>::from_hz(60.0));
        app.finish();
        app.cleanup();
        app
    }

    fn create_test_app_with_controller() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(bevy::transform::TransformPlugin);
        app.insert_resource(bevy::scene::SceneSpawner::default());
        app.add_plugins(PhysicsPlugins::default());
        app.add_plugins(PlatformerControllerPlugin::<Avian2dBackend>::default());
        app.insert_resource(Time::<Fixed>::from_hz(60.0));
        app.finish();
        app.cleanup();
        app
    }

    #[test]
    fn avian_backend_velocity() {
        let mut app = create_test_app();

        let entity = app
            .world_mut()
            .spawn((
                Transform::default(),
                RigidBody::Dynamic,
                LinearVelocity(Vec2::new(50.0, 30.0)),
            ))
            .id();

        app.update();

        let vel = Avian2dBackend::get_velocity(app.world(), entity);
        assert!((vel.x - 50.0).abs() < 0.01);
        assert!((vel.y - 30.0).abs() < 0.01);

        Avian2dBackend::set_velocity(app.world_mut(), entity, Vec2::new(100.0, 0.0));

        let vel = Avian2dBackend::get_velocity(app.world(), entity);
        assert!((vel.x - 100.0).abs() < 0.01);
        assert!(vel.y.abs() < 0.01);
    }

    #[test]
    fn avian_backend_gravity_scale() {
        let mut app = create_test_app();

        let entity = app
            .world_mut()
            .spawn((Transform::default(), RigidBody::Dynamic, GravityScale(1.0)))
            .id();

        Avian2dBackend::set_gravity_scale(app.world_mut(), entity, 2.5);
        assert_eq!(app.world().get::<GravityScale>(entity).unwrap().0, 2.5);
    }

    #[test]
    fn avian_backend_forces_are_deferred() {
        let mut app = create_test_app_with_controller();

        let entity = app
            .world_mut()
            .spawn((Transform::default(), MovementController::new()))
            .id();

        Avian2dBackend::apply_force(app.world_mut(), entity, Vec2::new(4.0, 0.0));

        let constant = app.world().get::<ConstantForce>(entity).unwrap().0;
        assert_eq!(constant, Vec2::ZERO);

        let mut controller = app.world_mut().get_mut::<MovementController>(entity).unwrap();
        assert_eq!(controller.finalize_tick(), Vec2::new(4.0, 0.0));
    }

    #[test]
    fn bottom_offset_for_shapes() {
        assert!((get_collider_bottom_offset(&Collider::capsule(0.25, 1.0)) - 0.75).abs() < 1e-4);
        assert!((get_collider_bottom_offset(&Collider::circle(0.5)) - 0.5).abs() < 1e-4);
        assert!((get_collider_bottom_offset(&Collider::rectangle(1.0, 2.0)) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn controller_requires_physics_components() {
        let mut app = create_test_app_with_controller();

        let entity = app
            .world_mut()
            .spawn((
                Transform::default(),
                MovementController::new(),
                Collider::capsule(0.25, 0.5),
            ))
            .id();

        app.update();

        // The backend plugin registers these as required by MovementController
        assert!(app.world().get::<RigidBody>(entity).is_some());
        assert!(app.world().get::<LinearVelocity>(entity).is_some());
        assert!(app.world().get::<ConstantForce>(entity).is_some());
        assert!(app.world().get::<GravityScale>(entity).is_some());
        assert!(app.world().get::<ControllerConfig>(entity).is_some());
    }
}
