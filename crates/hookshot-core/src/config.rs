//! Controller tunables.
//!
//! Every field has an allowed range; [`ControllerConfig::validate`] enforces
//! them before a [`Player`] is built. Per-frame code never re-checks them.
//!
//! [`Player`]: crate::Player

use glam::Vec3;

use crate::error::{ConfigError, Result};
use crate::grapple::Aim;
use crate::locomotion::HorizontalBlend;
use crate::look::LookState;

/// Bitmask selecting which surfaces the grapple probe may hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceMask(pub u32);

impl SurfaceMask {
    /// Matches every surface.
    pub const ALL: Self = Self(u32::MAX);
    /// Matches nothing.
    pub const NONE: Self = Self(0);

    /// Mask with only the given layer index set, or [`Self::NONE`] for an
    /// index past the last layer.
    pub const fn layer(index: u32) -> Self {
        match 1u32.checked_shl(index) {
            Some(bits) => Self(bits),
            None => Self::NONE,
        }
    }

    /// Whether any layer in `other` is also in this mask.
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Union of two masks.
    #[must_use]
    pub const fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl Default for SurfaceMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// Grapple probe and pull settings.
#[derive(Clone, Debug, PartialEq)]
pub struct GrappleConfig {
    /// Maximum probe range in world units.
    pub max_distance: f32,
    /// Pull speed in units per second.
    pub pull_speed: f32,
    /// The pull releases once the player is closer than this to the anchor.
    pub release_distance: f32,
    /// Surfaces the probe is allowed to hit.
    pub surfaces: SurfaceMask,
}

impl Default for GrappleConfig {
    fn default() -> Self {
        Self {
            max_distance: 50.0,
            pull_speed: 25.0,
            release_distance: 1.0,
            surfaces: SurfaceMask::ALL,
        }
    }
}

/// Walking settings.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveConfig {
    /// Walk speed in units per second.
    pub speed: f32,
    /// Gravity multiplier.
    pub weight: f32,
    /// How strafe and forward input combine while grounded.
    pub horizontal_blend: HorizontalBlend,
}

impl Default for MoveConfig {
    fn default() -> Self {
        Self {
            speed: 8.0,
            weight: 1.0,
            horizontal_blend: HorizontalBlend::default(),
        }
    }
}

/// Mouse-look settings. Angles are in degrees.
#[derive(Clone, Debug, PartialEq)]
pub struct LookConfig {
    /// Degrees of rotation per unit of device delta.
    pub sensitivity: f32,
    /// Pitch is clamped to `[-pitch_limit, pitch_limit]`.
    pub pitch_limit: f32,
}

impl Default for LookConfig {
    fn default() -> Self {
        Self {
            sensitivity: 0.1,
            pitch_limit: 85.0,
        }
    }
}

/// Full controller configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct ControllerConfig {
    pub grapple: GrappleConfig,
    pub movement: MoveConfig,
    pub look: LookConfig,
    /// Camera height above the body origin.
    pub eye_height: f32,
    /// Hook socket position relative to the camera, in look space
    /// (x right, y up, -z forward).
    pub socket_offset: Vec3,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            grapple: GrappleConfig::default(),
            movement: MoveConfig::default(),
            look: LookConfig::default(),
            eye_height: 0.8,
            socket_offset: Vec3::new(0.35, -0.3, -0.4),
        }
    }
}

impl ControllerConfig {
    /// Offset from the body origin to the camera.
    pub fn eye_offset(&self) -> Vec3 {
        Vec3::Y * self.eye_height
    }

    /// World-space offset from the body origin to the hook socket.
    pub fn socket_offset(&self, look: &LookState) -> Vec3 {
        self.eye_offset() + look.rotation() * self.socket_offset
    }

    /// Camera ray for a body at `position`.
    pub fn aim(&self, position: Vec3, look: &LookState) -> Aim {
        Aim {
            origin: position + self.eye_offset(),
            direction: look.forward(),
        }
    }

    /// Check every tunable against its accepted range.
    pub fn validate(&self) -> Result<()> {
        check_range("grapple.max_distance", self.grapple.max_distance, 1.0, 100.0)?;
        check_range("grapple.pull_speed", self.grapple.pull_speed, 0.0, 100.0)?;
        check_positive("grapple.release_distance", self.grapple.release_distance)?;
        check_range("movement.speed", self.movement.speed, 0.0, 100.0)?;
        check_range("movement.weight", self.movement.weight, 0.0, 10.0)?;
        check_range("look.sensitivity", self.look.sensitivity, 0.0, 100.0)?;
        check_range("look.pitch_limit", self.look.pitch_limit, 0.0, 100.0)?;
        check_finite("eye_height", self.eye_height)?;
        if !self.socket_offset.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "socket_offset",
            });
        }
        Ok(())
    }
}

fn check_finite(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field })
    }
}

fn check_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<()> {
    check_finite(field, value)?;
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

fn check_positive(field: &'static str, value: f32) -> Result<()> {
    check_finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(ControllerConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_max_distance_below_range() {
        let mut config = ControllerConfig::default();
        config.grapple.max_distance = 0.5;

        assert_eq!(
            config.validate(),
            Err(ConfigError::OutOfRange {
                field: "grapple.max_distance",
                value: 0.5,
                min: 1.0,
                max: 100.0,
            })
        );
    }

    #[test]
    fn test_weight_above_range() {
        let mut config = ControllerConfig::default();
        config.movement.weight = 12.0;

        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                field: "movement.weight",
                ..
            }
        ));
        assert_eq!(err.to_string(), "movement.weight = 12 is outside [0, 10]");
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut config = ControllerConfig::default();
        config.look.sensitivity = f32::NAN;
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonFinite {
                field: "look.sensitivity"
            })
        );

        let mut config = ControllerConfig::default();
        config.socket_offset = Vec3::new(0.0, f32::INFINITY, 0.0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonFinite {
                field: "socket_offset"
            })
        );
    }

    #[test]
    fn test_release_distance_must_be_positive() {
        let mut config = ControllerConfig::default();
        config.grapple.release_distance = 0.0;

        assert_eq!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "grapple.release_distance",
                value: 0.0,
            })
        );
    }

    #[test]
    fn test_surface_mask_ops() {
        let ground = SurfaceMask::layer(0);
        let walls = SurfaceMask::layer(2);
        let both = ground.with(walls);

        assert_eq!(both, SurfaceMask(0b101));
        assert!(both.intersects(walls));
        assert!(!ground.intersects(walls));
        assert!(!SurfaceMask::NONE.intersects(SurfaceMask::ALL));
    }

    #[test]
    fn test_surface_mask_layer_out_of_range() {
        assert_eq!(SurfaceMask::layer(31), SurfaceMask(1 << 31));
        assert_eq!(SurfaceMask::layer(32), SurfaceMask::NONE);
        assert_eq!(SurfaceMask::layer(u32::MAX), SurfaceMask::NONE);
    }
}
