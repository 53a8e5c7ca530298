//! First-person grappling hook playground using Bevy.
//!
//! Walk with WASD, look with the mouse, and fire the grapple with left click
//! or E to be reeled in toward whatever you hit.

mod arena;
mod input;
mod launch_params;
mod physics;
mod player;

use arena::ArenaPlugin;
use bevy::prelude::*;
use input::InputPlugin;
use physics::PhysicsIntegrationPlugin;
use player::{ControllerSettings, PlayerPlugin};

/// Plugin for the main application.
pub struct AppPlugin;

impl Plugin for AppPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            PhysicsIntegrationPlugin,
            InputPlugin,
            PlayerPlugin,
            ArenaPlugin,
        ));
    }
}

fn main() {
    // Initialize tracing for native platforms.
    #[cfg(not(target_family = "wasm"))]
    {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer())
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }

    // Initialize tracing for WASM (logs to browser console).
    #[cfg(target_family = "wasm")]
    {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default();
    }

    let params = launch_params::parse();
    tracing::debug!("Controller config: {:?}", params.config);

    let mut app = App::new();

    #[allow(unused_mut)]
    let mut window = Window {
        title: "hookshot".to_string(),
        resolution: (1600, 900).into(),
        position: WindowPosition::Centered(MonitorSelection::Primary),
        ..Default::default()
    };

    // WASM: Fit canvas to parent element and prevent browser event handling.
    #[cfg(target_family = "wasm")]
    {
        window.fit_canvas_to_parent = true;
        window.prevent_default_event_handling = true;
    }

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(window),
        ..Default::default()
    }));

    app.insert_resource(ControllerSettings(params.config))
        .add_plugins(AppPlugin)
        .run();
}
