//! First-person player systems.
//!
//! Hosts the engine-agnostic controller from `hookshot-core` on a Bevy entity.
//! Per frame, in order: grapple press, walk, look, grapple pull, then the rope
//! is drawn with gizmos.

use avian3d::prelude::*;
use bevy::prelude::*;
use hookshot_core::{
    CharacterBody, ControllerConfig, GrappleController, GrappleEvent, Guide, Locomotion,
    LookState,
};
use leafwing_input_manager::prelude::*;

use crate::input::{PlayerAction, default_input_map};
use crate::physics::{AvianProbe, CharacterMotor, GameLayer, KinematicBody};

/// Capsule radius in meters.
const PLAYER_RADIUS: f32 = 0.4;

/// Total capsule height in meters.
const PLAYER_HEIGHT: f32 = 1.8;

/// Plugin for the first-person player.
///
/// The chained systems split [`hookshot_core::Player::tick`] across the
/// schedule and keep its order: walk (skipped while hooked), look, then pull.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                grapple_toggle_system,
                player_move_system,
                player_look_system,
                grapple_pull_system,
                draw_grapple_rope,
            )
                .chain(),
        );
    }
}

/// Controller tunables shared by every player system.
#[derive(Resource, Clone, Debug, Default)]
pub struct ControllerSettings(pub ControllerConfig);

// ============================================================================
// Components
// ============================================================================

/// Marker component for the player body.
#[derive(Component)]
pub struct Player;

/// Marker component for the camera parented to the player body.
#[derive(Component)]
pub struct PlayerCamera;

/// Controller state carried by the player entity.
#[derive(Component)]
pub struct PlayerController {
    pub grapple: GrappleController,
    pub look: LookState,
    pub locomotion: Locomotion,
}

impl PlayerController {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            grapple: GrappleController::new(config.grapple.clone()),
            look: LookState::default(),
            locomotion: Locomotion::default(),
        }
    }
}

/// Rope line between the hook socket and the anchor.
#[derive(Component, Default, Debug)]
pub struct GrappleRope {
    pub enabled: bool,
    pub start: Vec3,
    pub end: Vec3,
}

impl Guide for GrappleRope {
    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn set_start(&mut self, point: Vec3) {
        self.start = point;
    }

    fn set_end(&mut self, point: Vec3) {
        self.end = point;
    }
}

// ============================================================================
// Systems
// ============================================================================

/// Fire or release the grapple on a fresh press.
fn grapple_toggle_system(
    settings: Res<ControllerSettings>,
    spatial_query_pipeline: Res<SpatialQueryPipeline>,
    mut query: Query<(
        Entity,
        &ActionState<PlayerAction>,
        &Transform,
        &mut PlayerController,
        &mut GrappleRope,
    )>,
) {
    for (entity, action_state, transform, mut controller, mut rope) in &mut query {
        if !action_state.just_pressed(&PlayerAction::Grapple) {
            continue;
        }

        let aim = settings.0.aim(transform.translation, &controller.look);
        let probe = AvianProbe {
            pipeline: &spatial_query_pipeline,
            exclude: entity,
        };
        match controller.grapple.toggle(aim, &probe, &mut *rope) {
            GrappleEvent::Attached { anchor, distance } => {
                // The rope starts at the socket until the first pull tick moves it.
                rope.start = transform.translation + settings.0.socket_offset(&controller.look);
                tracing::info!("Hooked {anchor} at {distance:.1}m");
            }
            GrappleEvent::Missed => tracing::debug!("Nothing to hook within range"),
            GrappleEvent::Released(reason) => tracing::debug!("Unhooked: {reason:?}"),
        }
    }
}

/// Walk and fall, unless the grapple is pulling.
#[allow(clippy::type_complexity)]
fn player_move_system(
    time: Res<Time>,
    settings: Res<ControllerSettings>,
    spatial_query_pipeline: Res<SpatialQueryPipeline>,
    mut query: Query<
        (
            Entity,
            &ActionState<PlayerAction>,
            &mut PlayerController,
            &mut CharacterMotor,
            &mut Transform,
            &Collider,
        ),
        With<Player>,
    >,
) {
    let dt = time.delta_secs();

    for (entity, action_state, mut controller, mut motor, mut transform, collider) in &mut query {
        if controller.grapple.is_active() {
            continue;
        }

        let move_input = action_state.clamped_axis_pair(&PlayerAction::Move);
        let basis = controller.look.planar_basis();
        let displacement = controller.locomotion.step(
            &settings.0.movement,
            move_input,
            basis,
            motor.grounded,
            dt,
        );

        let mut body = KinematicBody::new(
            entity,
            &mut transform,
            &mut motor,
            collider,
            &spatial_query_pipeline,
        );
        body.move_by(displacement);
    }
}

/// Apply mouse look: yaw turns the body, pitch tilts the camera.
fn player_look_system(
    settings: Res<ControllerSettings>,
    mut player_query: Query<
        (&ActionState<PlayerAction>, &mut PlayerController, &mut Transform),
        (With<Player>, Without<PlayerCamera>),
    >,
    mut camera_query: Query<&mut Transform, (With<PlayerCamera>, Without<Player>)>,
) {
    let Ok((action_state, mut controller, mut transform)) = player_query.single_mut() else {
        return;
    };

    // Screen-space y grows downward; the controller treats positive as up.
    let delta = action_state.axis_pair(&PlayerAction::Look);
    controller
        .look
        .apply(&settings.0.look, Vec2::new(delta.x, -delta.y));

    transform.rotation = controller.look.yaw_rotation();
    if let Ok(mut camera_transform) = camera_query.single_mut() {
        camera_transform.rotation = controller.look.pitch_rotation();
    }
}

/// Pull the player toward the anchor while hooked.
#[allow(clippy::type_complexity)]
fn grapple_pull_system(
    time: Res<Time>,
    settings: Res<ControllerSettings>,
    spatial_query_pipeline: Res<SpatialQueryPipeline>,
    mut query: Query<
        (
            Entity,
            &mut PlayerController,
            &mut CharacterMotor,
            &mut Transform,
            &Collider,
            &mut GrappleRope,
        ),
        With<Player>,
    >,
) {
    let dt = time.delta_secs();

    for (entity, mut controller, mut motor, mut transform, collider, mut rope) in &mut query {
        let controller = &mut *controller;
        if !controller.grapple.is_active() {
            continue;
        }

        let socket_offset = settings.0.socket_offset(&controller.look);
        let mut body = KinematicBody::new(
            entity,
            &mut transform,
            &mut motor,
            collider,
            &spatial_query_pipeline,
        );
        if let Some(GrappleEvent::Released(reason)) =
            controller
                .grapple
                .tick(&mut body, socket_offset, &mut *rope, dt)
        {
            tracing::debug!("Unhooked: {reason:?}");
        }
    }
}

/// Draw the grapple rope using gizmos.
fn draw_grapple_rope(mut gizmos: Gizmos, query: Query<&GrappleRope>) {
    for rope in &query {
        if rope.enabled {
            gizmos.line(rope.start, rope.end, Color::WHITE);
        }
    }
}

/// Spawn the player body with its camera at `position`.
pub fn spawn_player(commands: &mut Commands, config: &ControllerConfig, position: Vec3) -> Entity {
    commands
        .spawn((
            Name::new("Player"),
            Player,
            PlayerController::new(config),
            CharacterMotor::default(),
            GrappleRope::default(),
            RigidBody::Kinematic,
            Collider::capsule(PLAYER_RADIUS, PLAYER_HEIGHT - 2.0 * PLAYER_RADIUS),
            CollisionLayers::new(
                [GameLayer::Player],
                [GameLayer::Ground, GameLayer::Grappleable],
            ),
            Transform::from_translation(position),
            default_input_map(),
            ActionState::<PlayerAction>::default(),
            children![(
                PlayerCamera,
                Camera3d::default(),
                Projection::Perspective(PerspectiveProjection {
                    fov: 75.0_f32.to_radians(),
                    ..Default::default()
                }),
                Transform::from_translation(config.eye_offset()),
            )],
        ))
        .id()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_controller_is_idle() {
        let controller = PlayerController::new(&ControllerConfig::default());

        assert!(!controller.grapple.is_active());
        assert_eq!(controller.look, LookState::default());
        assert_eq!(controller.locomotion.displacement(), Vec3::ZERO);
    }

    #[test]
    fn test_rope_follows_guide_calls() {
        let mut rope = GrappleRope::default();
        rope.set_enabled(true);
        rope.set_start(Vec3::ONE);
        rope.set_end(Vec3::new(0.0, 10.0, 0.0));

        assert!(rope.enabled);
        assert_eq!(rope.start, Vec3::ONE);
        assert_eq!(rope.end, Vec3::new(0.0, 10.0, 0.0));
    }
}
