//! Keyboard input sampler.
//!
//! Optional: anything that writes [`MovementIntent`] can drive the
//! controller. This plugin covers the common keyboard layout.

use bevy::app::{RunFixedMainLoop, RunFixedMainLoopSystems};
use bevy::prelude::*;

use crate::intent::MovementIntent;
use crate::PlatformerControllerSet;

/// Key bindings for one keyboard-driven actor.
#[derive(Component, Reflect, Debug, Clone, PartialEq)]
#[reflect(Component)]
#[require(MovementIntent)]
pub struct KeyboardBindings {
    pub left: Vec<KeyCode>,
    pub right: Vec<KeyCode>,
    pub up: Vec<KeyCode>,
    pub down: Vec<KeyCode>,
    pub jump: Vec<KeyCode>,
}

impl Default for KeyboardBindings {
    fn default() -> Self {
        Self {
            left: vec![KeyCode::KeyA, KeyCode::ArrowLeft],
            right: vec![KeyCode::KeyD, KeyCode::ArrowRight],
            up: vec![KeyCode::KeyW, KeyCode::ArrowUp],
            down: vec![KeyCode::KeyS, KeyCode::ArrowDown],
            jump: vec![KeyCode::Space],
        }
    }
}

impl KeyboardBindings {
    /// Horizontal axis from the current key state.
    pub fn horizontal(&self, keys: &ButtonInput<KeyCode>) -> f32 {
        axis(keys, &self.left, &self.right)
    }

    /// Vertical axis from the current key state.
    pub fn vertical(&self, keys: &ButtonInput<KeyCode>) -> f32 {
        axis(keys, &self.down, &self.up)
    }
}

fn axis(keys: &ButtonInput<KeyCode>, negative: &[KeyCode], positive: &[KeyCode]) -> f32 {
    let pressed = |codes: &[KeyCode]| {
        if keys.any_pressed(codes.iter().copied()) {
            1.0
        } else {
            0.0
        }
    };
    pressed(positive) - pressed(negative)
}

/// Plugin that samples the keyboard into [`MovementIntent`] every frame.
///
/// Requires Bevy's input plugin (part of `DefaultPlugins`).
#[derive(Default)]
pub struct KeyboardInputPlugin;

impl Plugin for KeyboardInputPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<KeyboardBindings>();
        app.configure_sets(
            RunFixedMainLoop,
            PlatformerControllerSet::Input.in_set(RunFixedMainLoopSystems::BeforeFixedMainLoop),
        );
        app.add_systems(
            RunFixedMainLoop,
            sample_keyboard.in_set(PlatformerControllerSet::Input),
        );
    }
}

/// Write axes and jump edges for every actor with [`KeyboardBindings`].
pub fn sample_keyboard(
    keys: Res<ButtonInput<KeyCode>>,
    mut q: Query<(&KeyboardBindings, &mut MovementIntent)>,
) {
    for (bindings, mut intent) in &mut q {
        intent.set_horizontal(bindings.horizontal(&keys));
        intent.set_vertical(bindings.vertical(&keys));

        if keys.any_just_pressed(bindings.jump.iter().copied()) {
            intent.press_jump();
        }
        if keys.any_just_released(bindings.jump.iter().copied()) {
            intent.release_jump();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::JumpEdge;

    fn create_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.init_resource::<ButtonInput<KeyCode>>();
        app.add_plugins(KeyboardInputPlugin);
        app
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut keys = ButtonInput::<KeyCode>::default();
        let bindings = KeyboardBindings::default();

        keys.press(KeyCode::KeyA);
        assert_eq!(bindings.horizontal(&keys), -1.0);

        keys.press(KeyCode::ArrowRight);
        assert_eq!(bindings.horizontal(&keys), 0.0);

        keys.press(KeyCode::KeyS);
        assert_eq!(bindings.vertical(&keys), -1.0);
    }

    #[test]
    fn sampler_writes_axes_and_edges() {
        let mut app = create_test_app();
        let entity = app.world_mut().spawn(KeyboardBindings::default()).id();

        {
            let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            keys.press(KeyCode::KeyD);
            keys.press(KeyCode::Space);
        }
        app.update();

        let intent = app.world().get::<MovementIntent>(entity).unwrap();
        assert_eq!(intent.horizontal, 1.0);
        assert!(intent.has_pending_jump_edges());

        {
            let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            keys.clear();
            keys.release(KeyCode::Space);
        }
        app.update();

        let mut intent = app.world_mut().get_mut::<MovementIntent>(entity).unwrap();
        assert_eq!(
            intent.drain_jump_edges(),
            vec![JumpEdge::Pressed, JumpEdge::Released]
        );
    }
}
