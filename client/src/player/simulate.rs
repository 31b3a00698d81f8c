use super::{AnimatorParams, PlayerController, input::PendingInput};
use crate::convert::{to_bevy_point, to_bevy_quat};
use bevy::prelude::*;
use locomotion::PhysicsWorld;

pub(super) fn step(
    time: Res<Time>,
    mut pending: ResMut<PendingInput>,
    mut players: Query<&mut PlayerController>,
) {
    let dt = time.delta_secs();
    let input = pending.take();

    for mut controller in &mut players {
        let controller = &mut controller.0;
        controller.world_mut().set_step_dt(dt);
        let report = controller.tick(&input, dt);
        if report.transitioned() {
            info!("player {} -> {}", report.previous_mode, report.mode);
        }
    }
}

/// Place the player entity at the controller's base with its body yaw.
pub(super) fn sync_transform(mut players: Query<(&PlayerController, &mut Transform)>) {
    for (controller, mut transform) in &mut players {
        transform.translation = to_bevy_point(&controller.0.world().position());
        transform.rotation = to_bevy_quat(&controller.0.look().facing());
    }
}

pub(super) fn drain_animator(mut players: Query<(&mut PlayerController, &mut AnimatorParams)>) {
    for (mut controller, mut params) in &mut players {
        let sink = controller.0.animator_mut();
        params.bools.extend(sink.bools.iter().map(|(k, v)| (*k, *v)));
        params.floats.extend(sink.floats.iter().map(|(k, v)| (*k, *v)));
        for trigger in sink.take_triggers() {
            debug!("animation trigger {trigger}");
        }
    }
}
