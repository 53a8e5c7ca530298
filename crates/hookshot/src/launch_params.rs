//! Launch parameter parsing for the playground.
//!
//! On native, controller tunables can be overridden from the command line
//! using clap. On WASM, defaults are used (CLI argument parsing is not
//! available).

use hookshot_core::ControllerConfig;

use crate::physics::GameLayer;

/// Launch parameters for the playground.
#[derive(Debug)]
pub struct LaunchParams {
    /// Controller configuration, already validated.
    pub config: ControllerConfig,
}

impl Default for LaunchParams {
    fn default() -> Self {
        Self {
            config: default_config(),
        }
    }
}

/// Controller defaults with the grapple restricted to hookable surfaces.
fn default_config() -> ControllerConfig {
    let mut config = ControllerConfig::default();
    config.grapple.surfaces = GameLayer::mask(&[GameLayer::Grappleable]);
    config
}

#[cfg(not(target_family = "wasm"))]
mod native {
    use clap::{CommandFactory, Parser, ValueEnum, error::ErrorKind};
    use hookshot_core::HorizontalBlend;

    use super::*;

    /// How strafe and forward input combine on the ground.
    #[derive(Clone, Copy, Debug, ValueEnum)]
    enum Strafe {
        /// Forward input replaces strafe input (default).
        Overwrite,
        /// Strafe and forward input are summed.
        Combined,
    }

    impl From<Strafe> for HorizontalBlend {
        fn from(strafe: Strafe) -> Self {
            match strafe {
                Strafe::Overwrite => HorizontalBlend::Overwrite,
                Strafe::Combined => HorizontalBlend::Combined,
            }
        }
    }

    #[derive(Parser)]
    #[command(about = "First-person grappling hook playground")]
    struct CliArgs {
        /// Maximum grapple range in meters (1-100).
        #[arg(long)]
        max_distance: Option<f32>,

        /// Grapple pull speed in meters per second (0-100).
        #[arg(long)]
        pull_speed: Option<f32>,

        /// Walk speed in meters per second (0-100).
        #[arg(long)]
        speed: Option<f32>,

        /// Mouse sensitivity in degrees per pixel (0-100).
        #[arg(long)]
        sensitivity: Option<f32>,

        /// Vertical look limit in degrees (0-100).
        #[arg(long)]
        pitch_limit: Option<f32>,

        /// Gravity multiplier (0-10).
        #[arg(long)]
        weight: Option<f32>,

        /// How strafe and forward input combine on the ground.
        #[arg(long, value_enum, default_value_t = Strafe::Overwrite)]
        strafe: Strafe,

        /// Allow the grapple to hook the floor as well.
        #[arg(long)]
        hook_ground: bool,
    }

    pub fn parse() -> LaunchParams {
        let args = CliArgs::parse();

        let mut config = default_config();
        if let Some(max_distance) = args.max_distance {
            config.grapple.max_distance = max_distance;
        }
        if let Some(pull_speed) = args.pull_speed {
            config.grapple.pull_speed = pull_speed;
        }
        if let Some(speed) = args.speed {
            config.movement.speed = speed;
        }
        if let Some(sensitivity) = args.sensitivity {
            config.look.sensitivity = sensitivity;
        }
        if let Some(pitch_limit) = args.pitch_limit {
            config.look.pitch_limit = pitch_limit;
        }
        if let Some(weight) = args.weight {
            config.movement.weight = weight;
        }
        config.movement.horizontal_blend = args.strafe.into();
        if args.hook_ground {
            config.grapple.surfaces = GameLayer::mask(&[GameLayer::Ground, GameLayer::Grappleable]);
        }

        if let Err(e) = config.validate() {
            CliArgs::command()
                .error(ErrorKind::ValueValidation, e)
                .exit();
        }

        LaunchParams { config }
    }
}

/// Parse launch parameters from CLI args (native) or use defaults (WASM).
pub fn parse() -> LaunchParams {
    #[cfg(not(target_family = "wasm"))]
    {
        native::parse()
    }
    #[cfg(target_family = "wasm")]
    {
        LaunchParams::default()
    }
}
