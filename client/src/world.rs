use bevy::prelude::*;
use locomotion::{ColliderShapeDef, WorldStaticDef};
use nalgebra as na;

use crate::convert::{to_bevy_quat, to_bevy_vec3};

/// Collision layer of surfaces the player may climb.
pub const CLIMBABLE_LAYER: u32 = 1 << 1;

/// Static level geometry, shared by rendering and the player's physics world.
#[derive(Resource, Clone)]
pub struct LevelStatics(pub Vec<WorldStaticDef>);

pub(super) fn plugin(app: &mut App) {
    app.insert_resource(LevelStatics(level_statics()));
    app.add_systems(Startup, setup);
}

fn level_statics() -> Vec<WorldStaticDef> {
    let cuboid = |hx, hy, hz| ColliderShapeDef::Cuboid {
        half_extents: na::Vector3::new(hx, hy, hz),
    };

    vec![
        WorldStaticDef::new(
            1,
            na::Vector3::zeros(),
            ColliderShapeDef::Plane {
                offset_along_normal: 0.0,
            },
        ),
        // Tall climbing wall straight ahead of the spawn.
        WorldStaticDef::new(2, na::Vector3::new(0.0, 2.0, -8.5), cuboid(3.0, 2.0, 0.5))
            .with_layers(1 | CLIMBABLE_LAYER),
        // Low block: climb a little, then vault onto it.
        WorldStaticDef::new(3, na::Vector3::new(-6.0, 0.9, -6.0), cuboid(1.5, 0.9, 1.5))
            .with_layers(1 | CLIMBABLE_LAYER),
        // Thin fence to mantle over while falling from the ramp.
        WorldStaticDef::new(4, na::Vector3::new(6.0, 1.2, -6.0), cuboid(2.0, 1.2, 0.04))
            .with_layers(1 | CLIMBABLE_LAYER),
        // Ramp: too shallow to climb.
        WorldStaticDef::new(5, na::Vector3::new(6.0, 0.5, -2.0), cuboid(1.5, 0.2, 2.5))
            .with_rotation(na::UnitQuaternion::from_axis_angle(
                &na::Vector3::x_axis(),
                -0.35,
            )),
        WorldStaticDef::new(
            6,
            na::Vector3::new(-6.0, 0.75, 3.0),
            ColliderShapeDef::CylinderY {
                radius: 1.0,
                half_height: 0.75,
            },
        ),
        WorldStaticDef::new(
            7,
            na::Vector3::new(0.0, 0.6, 6.0),
            ColliderShapeDef::Sphere { radius: 0.6 },
        ),
    ]
}

fn mesh_for(shape: &ColliderShapeDef) -> Mesh {
    match shape {
        ColliderShapeDef::Plane { .. } => Plane3d::default().mesh().size(60., 60.).build(),
        ColliderShapeDef::Cuboid { half_extents }
        | ColliderShapeDef::RoundCuboid { half_extents, .. } => Cuboid::new(
            half_extents.x * 2.0,
            half_extents.y * 2.0,
            half_extents.z * 2.0,
        )
        .into(),
        ColliderShapeDef::Sphere { radius } => Sphere::new(*radius).into(),
        ColliderShapeDef::CapsuleY {
            radius,
            half_height,
        } => Capsule3d::new(*radius, half_height * 2.0).into(),
        ColliderShapeDef::CylinderY {
            radius,
            half_height,
        } => Cylinder::new(*radius, half_height * 2.0).into(),
        ColliderShapeDef::ConeY {
            radius,
            half_height,
        } => Cone {
            radius: *radius,
            height: half_height * 2.0,
        }
        .into(),
    }
}

fn setup(
    mut commands: Commands,
    statics: Res<LevelStatics>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let ground = materials.add(StandardMaterial {
        base_color: Color::linear_rgb(0.2, 0.3, 0.25),
        perceptual_roughness: 1.0,
        metallic: 0.0,
        ..default()
    });
    let climbable = materials.add(Color::srgb_u8(124, 144, 255));
    let solid = materials.add(Color::srgb_u8(180, 170, 150));

    for def in &statics.0 {
        let material = match def.shape {
            ColliderShapeDef::Plane { .. } => ground.clone(),
            _ if def.layers & CLIMBABLE_LAYER != 0 => climbable.clone(),
            _ => solid.clone(),
        };
        commands.spawn((
            Name::new(format!("static {}", def.id)),
            Mesh3d(meshes.add(mesh_for(&def.shape))),
            MeshMaterial3d(material),
            Transform {
                translation: to_bevy_vec3(&def.translation),
                rotation: to_bevy_quat(&def.rotation),
                scale: Vec3::ONE,
            },
        ));
    }

    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 10.0, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    info!("spawned {} level statics", statics.0.len());
}
