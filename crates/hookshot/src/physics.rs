//! Physics integration using Avian 3D.
//!
//! Adapts Avian's spatial queries to the controller's [`Probe`] and
//! [`CharacterBody`] seams. The player is a kinematic capsule; all of its
//! collision response is a collide-and-slide over shape casts, so the physics
//! step never pushes it around on its own.

use avian3d::prelude::*;
use bevy::prelude::*;
use hookshot_core::{CharacterBody, Probe, SurfaceMask};

/// Distance kept between the capsule and any surface it is blocked by.
const SKIN_WIDTH: f32 = 0.02;

/// Maximum number of slide iterations per move.
const MAX_SLIDES: usize = 4;

/// If the dot product of a blocking surface's normal and world up exceeds
/// this value, the body is standing on it.
const GROUND_NORMAL_CUTOFF: f32 = 0.7;

/// Plugin for physics integration.
pub struct PhysicsIntegrationPlugin;

impl Plugin for PhysicsIntegrationPlugin {
    fn build(&self, app: &mut App) {
        // Gravity for the player is applied by the controller itself.
        app.add_plugins(PhysicsPlugins::default())
            .insert_resource(Gravity(Vec3::ZERO));
    }
}

/// Collision layers for the arena.
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum GameLayer {
    /// Floor and walls that can be walked on but not hooked.
    #[default]
    Ground,
    /// Surfaces the grapple may attach to.
    Grappleable,
    /// The player capsule.
    Player,
}

impl GameLayer {
    /// Surface mask for the given layers.
    pub fn mask(layers: &[GameLayer]) -> SurfaceMask {
        SurfaceMask(layers.iter().fold(0, |bits, layer| bits | layer.to_bits()))
    }
}

/// Records whether the player's last move ended on the ground.
#[derive(Component, Default)]
pub struct CharacterMotor {
    pub grounded: bool,
}

/// Grapple probe over Avian ray casts.
pub struct AvianProbe<'a> {
    pub pipeline: &'a SpatialQueryPipeline,
    /// Entity the ray must never hit (the player itself).
    pub exclude: Entity,
}

impl Probe for AvianProbe<'_> {
    fn cast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        surfaces: SurfaceMask,
    ) -> Option<Vec3> {
        let direction = Dir3::new(direction).ok()?;
        let filter = SpatialQueryFilter::from_mask(LayerMask(surfaces.0))
            .with_excluded_entities([self.exclude]);

        let hit = self
            .pipeline
            .cast_ray(origin, direction, max_distance, true, &filter)?;
        Some(origin + direction.as_vec3() * hit.distance)
    }
}

/// Kinematic capsule moved by collide-and-slide.
pub struct KinematicBody<'a> {
    pub transform: &'a mut Transform,
    pub motor: &'a mut CharacterMotor,
    pub collider: &'a Collider,
    pub pipeline: &'a SpatialQueryPipeline,
    pub filter: SpatialQueryFilter,
}

impl<'a> KinematicBody<'a> {
    /// Body for `entity`, blocked by everything except other players.
    pub fn new(
        entity: Entity,
        transform: &'a mut Transform,
        motor: &'a mut CharacterMotor,
        collider: &'a Collider,
        pipeline: &'a SpatialQueryPipeline,
    ) -> Self {
        let solid = GameLayer::mask(&[GameLayer::Ground, GameLayer::Grappleable]);
        Self {
            transform,
            motor,
            collider,
            pipeline,
            filter: SpatialQueryFilter::from_mask(LayerMask(solid.0))
                .with_excluded_entities([entity]),
        }
    }
}

impl CharacterBody for KinematicBody<'_> {
    fn position(&self) -> Vec3 {
        self.transform.translation
    }

    fn teleport(&mut self, position: Vec3) {
        self.transform.translation = position;
    }

    fn move_by(&mut self, displacement: Vec3) {
        self.motor.grounded = false;

        let mut remaining = displacement;
        for _ in 0..MAX_SLIDES {
            let length = remaining.length();
            if length <= f32::EPSILON {
                break;
            }
            let Ok(direction) = Dir3::new(remaining) else {
                break;
            };

            let Some(hit) = self.pipeline.cast_shape(
                self.collider,
                self.transform.translation,
                self.transform.rotation,
                direction,
                // The grapple teleports the body, so it may start a move overlapping
                // the surface it was pulled to.
                &ShapeCastConfig {
                    ignore_origin_penetration: true,
                    ..ShapeCastConfig::from_max_distance(length + SKIN_WIDTH)
                },
                &self.filter,
            ) else {
                self.transform.translation += remaining;
                break;
            };

            // Advance up to the contact, then slide what is left along the surface.
            let travel = (hit.distance - SKIN_WIDTH).clamp(0.0, length);
            self.transform.translation += direction.as_vec3() * travel;
            if hit.normal1.dot(Vec3::Y) > GROUND_NORMAL_CUTOFF {
                self.motor.grounded = true;
            }

            let leftover = remaining - direction.as_vec3() * travel;
            remaining = leftover - hit.normal1 * leftover.dot(hit.normal1);
        }
    }

    fn is_grounded(&self) -> bool {
        self.motor.grounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_mask_bits() {
        assert_eq!(GameLayer::mask(&[GameLayer::Ground]), SurfaceMask(0b001));
        assert_eq!(
            GameLayer::mask(&[GameLayer::Ground, GameLayer::Grappleable]),
            SurfaceMask(0b011)
        );
        assert_eq!(GameLayer::mask(&[]), SurfaceMask::NONE);
        assert!(
            !GameLayer::mask(&[GameLayer::Grappleable])
                .intersects(GameLayer::mask(&[GameLayer::Player]))
        );
    }
}
