//! Test arena: a floor, hookable pillars and floating platforms.

use avian3d::prelude::*;
use bevy::{light::light_consts::lux, prelude::*};

use crate::{
    physics::GameLayer,
    player::{ControllerSettings, spawn_player},
};

/// Side length of the square floor in meters.
const FLOOR_SIZE: f32 = 200.0;

/// Player spawn position.
const SPAWN_POSITION: Vec3 = Vec3::new(0.0, 2.0, 20.0);

/// Pillars as (x, z, height).
const PILLARS: &[(f32, f32, f32)] = &[
    (-12.0, -10.0, 18.0),
    (10.0, -18.0, 26.0),
    (-4.0, -34.0, 32.0),
    (22.0, -40.0, 14.0),
    (-26.0, -30.0, 22.0),
];

/// Floating platforms as (center, half extents).
const PLATFORMS: &[(Vec3, Vec3)] = &[
    (Vec3::new(0.0, 14.0, -18.0), Vec3::new(4.0, 0.5, 4.0)),
    (Vec3::new(16.0, 24.0, -30.0), Vec3::new(3.0, 0.5, 6.0)),
    (Vec3::new(-14.0, 30.0, -46.0), Vec3::new(6.0, 0.5, 3.0)),
];

/// Plugin that builds the arena and spawns the player.
pub struct ArenaPlugin;

impl Plugin for ArenaPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_arena);
    }
}

fn setup_arena(
    mut commands: Commands,
    settings: Res<ControllerSettings>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // Floor. Walkable, never hookable.
    commands.spawn((
        Name::new("Floor"),
        RigidBody::Static,
        Collider::cuboid(FLOOR_SIZE, 1.0, FLOOR_SIZE),
        CollisionLayers::new([GameLayer::Ground], LayerMask::ALL),
        Mesh3d(meshes.add(Cuboid::new(FLOOR_SIZE, 1.0, FLOOR_SIZE))),
        MeshMaterial3d(materials.add(Color::srgb(0.35, 0.38, 0.32))),
        Transform::from_xyz(0.0, -0.5, 0.0),
    ));

    let hookable = materials.add(Color::srgb(0.85, 0.55, 0.2));

    for &(x, z, height) in PILLARS {
        commands.spawn((
            Name::new("Pillar"),
            RigidBody::Static,
            Collider::cuboid(2.0, height, 2.0),
            CollisionLayers::new([GameLayer::Grappleable], LayerMask::ALL),
            Mesh3d(meshes.add(Cuboid::new(2.0, height, 2.0))),
            MeshMaterial3d(hookable.clone()),
            Transform::from_xyz(x, height / 2.0, z),
        ));
    }

    for &(center, half_extents) in PLATFORMS {
        let size = half_extents * 2.0;
        commands.spawn((
            Name::new("Platform"),
            RigidBody::Static,
            Collider::cuboid(size.x, size.y, size.z),
            CollisionLayers::new([GameLayer::Grappleable], LayerMask::ALL),
            Mesh3d(meshes.add(Cuboid::from_size(size))),
            MeshMaterial3d(hookable.clone()),
            Transform::from_translation(center),
        ));
    }

    commands.spawn((
        DirectionalLight {
            illuminance: lux::OVERCAST_DAY,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(30.0, 60.0, 20.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    spawn_player(&mut commands, &settings.0, SPAWN_POSITION);

    tracing::info!("Arena ready - WASD to move, mouse to look, click or E to grapple");
}
