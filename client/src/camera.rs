use crate::{
    convert::{to_bevy_point, to_bevy_quat},
    player::{Player, PlayerController},
};
use bevy::{
    camera::Exposure,
    pbr::{AtmosphereMode, AtmosphereSettings},
    prelude::*,
};
use locomotion::PhysicsWorld;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, add_camera);
    app.add_systems(PostUpdate, follow_player_view);
}

const CAMERA_DECAY_RATE: f32 = 44.0;

fn add_camera(mut commands: Commands) {
    commands.spawn((
        Exposure { ev100: 16.0 },
        bevy::core_pipeline::tonemapping::Tonemapping::AcesFitted,
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: 75.0_f32.to_radians(),
            ..default()
        }),
        Transform::from_xyz(0.0, 1.6, 0.0),
        DistanceFog {
            color: Color::srgba(0.35, 0.48, 0.66, 1.0),
            directional_light_color: Color::srgba(1.0, 0.95, 0.85, 0.5),
            directional_light_exponent: 30.0,
            falloff: FogFalloff::from_visibility_colors(
                1000.0,
                Color::srgb(0.35, 0.5, 0.66),
                Color::srgb(0.8, 0.8, 0.7),
            ),
        },
        AtmosphereSettings {
            rendering_method: AtmosphereMode::Raymarched,
            ..default()
        },
    ));
}

/// First-person view: eye height above the base, body yaw then view pitch.
fn follow_player_view(
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
    player: Single<&PlayerController, With<Player>>,
    time: Res<Time>,
) {
    let Ok(mut cam_tf) = camera_query.single_mut() else {
        return;
    };

    let controller = &player.0;
    let eye = controller.config().probe.eye_height;
    let target = to_bevy_point(&controller.world().position()) + Vec3::Y * eye;
    cam_tf
        .translation
        .smooth_nudge(&target, CAMERA_DECAY_RATE, time.delta_secs());

    let look = controller.look();
    cam_tf.rotation = to_bevy_quat(&(look.facing() * look.view_tilt()));
}
