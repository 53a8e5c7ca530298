//! Input action definitions and cursor management.
//!
//! Gameplay actions are mapped with `leafwing-input-manager`. Cursor lock goes
//! through [`WindowCursor`], the windowing side of the controller's
//! [`CursorControl`] seam, so nothing else touches `CursorOptions` directly.

use bevy::{
    prelude::*,
    window::{CursorGrabMode, CursorOptions, PrimaryWindow},
};
use hookshot_core::CursorControl;
use leafwing_input_manager::{plugin::InputManagerSystem, prelude::*};

// ============================================================================
// Actions
// ============================================================================

/// Actions for the first-person player.
#[derive(Actionlike, PartialEq, Eq, Hash, Clone, Copy, Debug, Reflect)]
pub enum PlayerAction {
    /// WASD movement (x strafe, y forward).
    #[actionlike(DualAxis)]
    Move,
    /// Mouse look.
    #[actionlike(DualAxis)]
    Look,
    /// Fire or release the grapple (left click / E).
    Grapple,
    /// Grab cursor (left click when ungrabbed).
    GrabCursor,
    /// Release cursor (ESC).
    ReleaseCursor,
}

/// Create the default input map for player actions.
pub fn default_input_map() -> InputMap<PlayerAction> {
    InputMap::default()
        .with_dual_axis(PlayerAction::Move, VirtualDPad::wasd())
        .with_dual_axis(PlayerAction::Look, MouseMove::default())
        .with(PlayerAction::Grapple, MouseButton::Left)
        .with(PlayerAction::Grapple, KeyCode::KeyE)
        .with(PlayerAction::GrabCursor, MouseButton::Left)
        .with(PlayerAction::ReleaseCursor, KeyCode::Escape)
}

/// Actions that only make sense while the cursor is grabbed.
const GAMEPLAY_ACTIONS: &[PlayerAction] = &[
    PlayerAction::Move,
    PlayerAction::Look,
    PlayerAction::Grapple,
];

// ============================================================================
// Plugin
// ============================================================================

/// Plugin that registers the action type, input focus and cursor grab.
pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(InputManagerPlugin::<PlayerAction>::default())
            .add_systems(Startup, lock_cursor_on_startup)
            .add_systems(
                PreUpdate,
                manage_input_focus.after(InputManagerSystem::Update),
            )
            .add_systems(Update, cursor_grab_system);
    }
}

// ============================================================================
// Cursor
// ============================================================================

/// Cursor lock over the primary window.
pub struct WindowCursor<'a> {
    pub cursor: &'a mut CursorOptions,
    pub window: &'a mut Window,
}

impl CursorControl for WindowCursor<'_> {
    fn lock(&mut self) {
        set_cursor_grab(self.cursor, self.window, true);
    }

    fn release(&mut self) {
        set_cursor_grab(self.cursor, self.window, false);
    }
}

/// Set cursor grab state, centering the cursor when grabbing.
fn set_cursor_grab(cursor: &mut CursorOptions, window: &mut Window, grabbed: bool) {
    if grabbed {
        // Native: Use Locked mode for true mouse capture.
        // WASM: Use Confined mode (Locked not supported in browsers).
        #[cfg(not(target_family = "wasm"))]
        {
            cursor.grab_mode = CursorGrabMode::Locked;
        }
        #[cfg(target_family = "wasm")]
        {
            cursor.grab_mode = CursorGrabMode::Confined;
        }
        cursor.visible = false;
        let center = Vec2::new(window.width() / 2.0, window.height() / 2.0);
        window.set_cursor_position(Some(center));
    } else {
        cursor.grab_mode = CursorGrabMode::None;
        cursor.visible = true;
    }
}

fn lock_cursor_on_startup(
    mut cursor: Single<&mut CursorOptions>,
    mut window: Single<&mut Window, With<PrimaryWindow>>,
) {
    WindowCursor {
        cursor: &mut cursor,
        window: &mut window,
    }
    .lock();
}

/// Handle cursor grab/ungrab with ESC and left-click.
fn cursor_grab_system(
    action_query: Query<&ActionState<PlayerAction>>,
    mut cursor: Single<&mut CursorOptions>,
    mut window: Single<&mut Window, With<PrimaryWindow>>,
) {
    let Ok(action_state) = action_query.single() else {
        return;
    };

    let mut window_cursor = WindowCursor {
        cursor: &mut cursor,
        window: &mut window,
    };
    if action_state.just_pressed(&PlayerAction::ReleaseCursor) {
        window_cursor.release();
    } else if action_state.just_pressed(&PlayerAction::GrabCursor) {
        window_cursor.lock();
    }
}

/// Disable gameplay actions while the cursor is free, and the grab action
/// while it is held.
fn manage_input_focus(
    mut action_query: Query<&mut ActionState<PlayerAction>>,
    cursor: Single<&CursorOptions>,
) {
    let is_grabbed = matches!(
        cursor.grab_mode,
        CursorGrabMode::Locked | CursorGrabMode::Confined
    );

    for mut action_state in &mut action_query {
        for action in GAMEPLAY_ACTIONS {
            if is_grabbed {
                action_state.enable_action(action);
            } else {
                action_state.disable_action(action);
            }
        }
        if is_grabbed {
            action_state.disable_action(&PlayerAction::GrabCursor);
            action_state.enable_action(&PlayerAction::ReleaseCursor);
        } else {
            action_state.enable_action(&PlayerAction::GrabCursor);
            action_state.disable_action(&PlayerAction::ReleaseCursor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_actions_stay_out_of_gameplay_focus() {
        assert!(!GAMEPLAY_ACTIONS.contains(&PlayerAction::GrabCursor));
        assert!(!GAMEPLAY_ACTIONS.contains(&PlayerAction::ReleaseCursor));
        assert!(GAMEPLAY_ACTIONS.contains(&PlayerAction::Grapple));
    }
}
