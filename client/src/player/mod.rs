use bevy::{platform::collections::HashMap, prelude::*, transform::TransformSystems};
use locomotion::{
    CapsuleSpec, LocomotionController, LookState, Point3, RapierCharacter, RapierQueryWorld,
    RecordingSink,
};

use crate::{config::LocomotionTuning, world::LevelStatics};

mod input;
mod simulate;

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<input::PendingInput>();

    app.add_systems(Startup, spawn_player);

    // Input is sampled every frame and latched until the next fixed step consumes it.
    app.add_systems(Update, input::latch_input);
    app.add_systems(FixedUpdate, simulate::step);
    app.add_systems(
        PostUpdate,
        (simulate::sync_transform, simulate::drain_animator)
            .before(TransformSystems::Propagate),
    );
}

pub type PlayerLocomotion = LocomotionController<RapierCharacter, RecordingSink>;

#[derive(Component)]
pub struct Player;

#[derive(Component)]
pub struct PlayerController(pub PlayerLocomotion);

/// Last published animation parameters, for whatever animates the player model.
#[derive(Component, Default, Debug)]
pub struct AnimatorParams {
    pub bools: HashMap<&'static str, bool>,
    pub floats: HashMap<&'static str, f32>,
}

fn spawn_player(
    mut commands: Commands,
    statics: Res<LevelStatics>,
    tuning: Res<LocomotionTuning>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let capsule = CapsuleSpec::default();
    let world = RapierCharacter::new(
        RapierQueryWorld::build(statics.0.iter().cloned()),
        capsule,
        Point3::origin(),
    );

    let controller = match LocomotionController::builder()
        .config(tuning.0.clone())
        .world(world)
        .animator(RecordingSink::default())
        .initial_look(LookState::new(0.0, 0.0))
        .build()
    {
        Ok(controller) => controller,
        Err(err) => {
            error!("could not build player controller: {err}");
            return;
        }
    };

    commands
        .spawn((
            Name::new("Player"),
            Player,
            PlayerController(controller),
            AnimatorParams::default(),
            Transform::default(),
            Visibility::default(),
        ))
        .with_child((
            // Mesh origin is the capsule center; the entity origin is the base.
            Mesh3d(meshes.add(Capsule3d::new(capsule.radius, capsule.half_height * 2.0))),
            MeshMaterial3d(materials.add(Color::srgb_u8(230, 120, 80))),
            Transform::from_xyz(0.0, capsule.base_offset(), 0.0),
        ));
}
