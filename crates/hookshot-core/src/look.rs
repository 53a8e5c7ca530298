//! Mouse-look yaw and pitch.

use glam::{Quat, Vec2, Vec3};

use crate::config::LookConfig;
use crate::locomotion::PlanarBasis;

/// Accumulated camera angles in degrees.
///
/// Positive yaw turns right, positive pitch looks up. Pitch always stays
/// within the configured limit.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LookState {
    yaw: f32,
    pitch: f32,
}

impl LookState {
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Apply a device delta. `delta.y` positive looks up.
    pub fn apply(&mut self, config: &LookConfig, delta: Vec2) {
        self.yaw += delta.x * config.sensitivity;
        if self.yaw.abs() > 360.0 {
            self.yaw = self.yaw.rem_euclid(360.0);
        }
        // `max`/`min` ignore a NaN bound where `clamp` would panic.
        let limit = config.pitch_limit.abs();
        self.pitch = (self.pitch + delta.y * config.sensitivity)
            .max(-limit)
            .min(limit);
    }

    /// Rotation about the up axis only.
    pub fn yaw_rotation(&self) -> Quat {
        // Right-handed: a positive angle about +Y turns left.
        Quat::from_rotation_y(-self.yaw.to_radians())
    }

    /// Rotation about the local right axis only.
    pub fn pitch_rotation(&self) -> Quat {
        Quat::from_rotation_x(self.pitch.to_radians())
    }

    /// Full camera orientation.
    pub fn rotation(&self) -> Quat {
        self.yaw_rotation() * self.pitch_rotation()
    }

    /// Camera forward axis.
    pub fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::NEG_Z
    }

    /// Right/forward axes with pitch removed.
    pub fn planar_basis(&self) -> PlanarBasis {
        let yaw = self.yaw_rotation();
        PlanarBasis {
            right: yaw * Vec3::X,
            forward: yaw * Vec3::NEG_Z,
        }
    }
}
