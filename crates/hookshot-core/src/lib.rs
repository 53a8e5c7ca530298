//! Engine-agnostic first-person controller with a grappling hook.
//!
//! Pure state and math that can be tested in isolation without Bevy. The host
//! engine supplies raycasts, collision movement, the rope line and cursor
//! control through the traits in [`services`], and drives everything with an
//! explicit [`Player::init`] / [`Player::tick`] pair.

pub mod config;
pub mod error;
pub mod grapple;
pub mod locomotion;
pub mod look;
pub mod player;
pub mod services;

pub use config::{ControllerConfig, GrappleConfig, LookConfig, MoveConfig, SurfaceMask};
pub use error::{ConfigError, Result};
pub use grapple::{Aim, GrappleController, GrappleEvent, GrappleState, ReleaseReason};
pub use locomotion::{GRAVITY, HorizontalBlend, Locomotion, PlanarBasis};
pub use look::LookState;
pub use player::Player;
pub use services::{CharacterBody, CursorControl, Guide, Probe};
