//! Walking and falling.
//!
//! Displacement is persistent between frames: horizontal motion is only
//! rewritten while grounded, so the player keeps their momentum in the air,
//! and gravity keeps accumulating into the vertical component until the next
//! grounded frame resets it.

use glam::{Vec2, Vec3};

use crate::config::MoveConfig;

/// Gravitational acceleration (units/s², negative is down).
pub const GRAVITY: f32 = -9.81;

/// How strafe (x) and forward (y) input combine while grounded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HorizontalBlend {
    /// The forward term replaces the strafe term, so only forward/back input
    /// moves the player while grounded.
    #[default]
    Overwrite,
    /// Strafe and forward terms are summed.
    Combined,
}

/// Horizontal movement axes derived from the camera yaw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlanarBasis {
    pub right: Vec3,
    pub forward: Vec3,
}

impl Default for PlanarBasis {
    fn default() -> Self {
        Self {
            right: Vec3::X,
            forward: Vec3::NEG_Z,
        }
    }
}

/// Per-frame displacement state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Locomotion {
    displacement: Vec3,
}

impl Locomotion {
    /// Displacement produced by the last [`step`](Self::step).
    pub fn displacement(&self) -> Vec3 {
        self.displacement
    }

    /// Compute this frame's displacement for the collision mover.
    pub fn step(
        &mut self,
        config: &MoveConfig,
        input: Vec2,
        basis: PlanarBasis,
        grounded: bool,
        dt: f32,
    ) -> Vec3 {
        if grounded {
            let scale = config.speed * dt;
            self.displacement = match config.horizontal_blend {
                HorizontalBlend::Overwrite => basis.forward * input.y * scale,
                HorizontalBlend::Combined => {
                    (basis.right * input.x + basis.forward * input.y) * scale
                }
            };
        }
        self.displacement.y += GRAVITY * config.weight * dt;
        self.displacement
    }
}
