//! Platformer Example
//!
//! A playable room with a floor, two walls and a few floating platforms.
//!
//! ## Controls
//! - **A/D** or **Left/Right**: Run
//! - **Space** (tap or hold): Jump, release early for a short hop
//! - **S/Down** (hold, in the air): Fast-fall
//! - **R**: Respawn
//!
//! The camera follows the player.
//!
//! ## Running
//! ```bash
//! cargo run --example platformer --features examples
//! ```

use avian2d::prelude::*;
use bevy::prelude::*;
use tight_platformer_controller::prelude::*;

// ==================== Constants ====================

const PLAYER_RADIUS: f32 = 0.25;
const PLAYER_LENGTH: f32 = 0.5;

const ROOM_WIDTH: f32 = 40.0;
const ROOM_HEIGHT: f32 = 20.0;
const WALL_THICKNESS: f32 = 1.0;

/// World units are meters; this many pixels per meter on screen.
const PX_PER_M: f32 = 32.0;

const SPAWN: Vec2 = Vec2::new(-15.0, -7.0);

#[derive(Component)]
struct Player;

#[derive(Component)]
struct StatusText;

// ==================== Main ====================

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Platformer - Tight Platformer Controller Example".into(),
                resolution: (1280, 720).into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(PhysicsPlugins::default())
        .add_plugins(PhysicsDebugPlugin::default())
        .add_plugins(PlatformerControllerPlugin::<Avian2dBackend>::default())
        .add_plugins(KeyboardInputPlugin)
        .add_systems(Startup, setup)
        .add_systems(Update, (respawn, camera_follow, update_status, log_jumps))
        .run();
}

// ==================== Setup ====================

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    commands.spawn((
        Camera2d,
        Projection::from(OrthographicProjection {
            scale: 1.0 / PX_PER_M,
            ..OrthographicProjection::default_2d()
        }),
        Transform::from_translation(SPAWN.extend(0.0)),
    ));

    spawn_room(&mut commands, &mut meshes, &mut materials);

    // Floating platforms, each a short jump above the last
    for (i, x) in [-10.0, -4.0, 2.0, 8.0, 14.0].into_iter().enumerate() {
        spawn_static_box(
            &mut commands,
            &mut meshes,
            &mut materials,
            Vec2::new(x, -6.5 + i as f32 * 2.5),
            Vec2::new(1.5, 0.25),
            Color::srgb(0.45, 0.45, 0.55),
        );
    }

    commands.spawn((
        Player,
        Transform::from_translation(SPAWN.extend(1.0)),
        MovementController::new(),
        ControllerConfig::player(),
        KeyboardBindings::default(),
        Collider::capsule(PLAYER_RADIUS, PLAYER_LENGTH),
        LockedAxes::ROTATION_LOCKED,
        Friction::ZERO.with_combine_rule(CoefficientCombine::Min),
        Mesh2d(meshes.add(Capsule2d::new(PLAYER_RADIUS, PLAYER_LENGTH))),
        MeshMaterial2d(materials.add(ColorMaterial::from_color(Color::srgb(0.9, 0.6, 0.2)))),
    ));

    commands.spawn((
        StatusText,
        Text::new(""),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            ..default()
        },
    ));
}

fn spawn_room(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<ColorMaterial>>,
) {
    let half_width = ROOM_WIDTH / 2.0;
    let half_height = ROOM_HEIGHT / 2.0;
    let half_wall = WALL_THICKNESS / 2.0;
    let color = Color::srgb(0.3, 0.3, 0.3);

    // Floor
    spawn_static_box(
        commands,
        meshes,
        materials,
        Vec2::new(0.0, -half_height - half_wall),
        Vec2::new(half_width, half_wall),
        color,
    );

    // Left wall
    spawn_static_box(
        commands,
        meshes,
        materials,
        Vec2::new(-half_width - half_wall, 0.0),
        Vec2::new(half_wall, half_height),
        color,
    );

    // Right wall
    spawn_static_box(
        commands,
        meshes,
        materials,
        Vec2::new(half_width + half_wall, 0.0),
        Vec2::new(half_wall, half_height),
        color,
    );
}

/// Spawns a static rectangular collider with a matching mesh.
fn spawn_static_box(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<ColorMaterial>>,
    position: Vec2,
    half_size: Vec2,
    color: Color,
) {
    commands.spawn((
        Transform::from_translation(position.extend(0.0)),
        RigidBody::Static,
        Collider::rectangle(half_size.x * 2.0, half_size.y * 2.0),
        Mesh2d(meshes.add(Rectangle::new(half_size.x * 2.0, half_size.y * 2.0))),
        MeshMaterial2d(materials.add(ColorMaterial::from_color(color))),
    ));
}

// ==================== Systems ====================

fn respawn(
    keys: Res<ButtonInput<KeyCode>>,
    mut q: Query<(&mut Position, &mut LinearVelocity), With<Player>>,
) {
    if !keys.just_pressed(KeyCode::KeyR) {
        return;
    }
    for (mut position, mut velocity) in &mut q {
        position.0 = SPAWN;
        velocity.0 = Vec2::ZERO;
    }
}

fn camera_follow(
    player: Query<&Transform, (With<Player>, Without<Camera2d>)>,
    mut camera: Query<&mut Transform, With<Camera2d>>,
    time: Res<Time>,
) {
    let Ok(player) = player.single() else {
        return;
    };
    let Ok(mut camera) = camera.single_mut() else {
        return;
    };

    let target = player.translation.truncate().extend(camera.translation.z);
    let t = (8.0 * time.delta_secs()).min(1.0);
    camera.translation = camera.translation.lerp(target, t);
}

fn update_status(
    player: Query<(&MovementController, &LinearVelocity, &GravityScale), With<Player>>,
    mut text: Query<&mut Text, With<StatusText>>,
) {
    let Ok((controller, velocity, gravity_scale)) = player.single() else {
        return;
    };
    let Ok(mut text) = text.single_mut() else {
        return;
    };

    text.0 = format!(
        "A/D: Run | Space: Jump | S: Fast-fall | R: Respawn\n\
         phase: {:?}  grounded: {}  coyote: {}\n\
         velocity: ({:.2}, {:.2})  gravity scale: {:.1}",
        controller.phase,
        controller.is_grounded(),
        controller.in_coyote_time(),
        velocity.x,
        velocity.y,
        gravity_scale.0,
    );
}

fn log_jumps(mut launches: MessageReader<JumpLaunched>) {
    for launch in launches.read() {
        info!("{} jumped (impulse {:.2})", launch.entity, launch.impulse);
    }
}
