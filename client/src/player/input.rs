use crate::{convert::to_na_vec2, cursor::CursorCaptured, input::PlayerAction};
use bevy::prelude::*;
use leafwing_input_manager::prelude::ActionState;
use locomotion::LocomotionInput;

/// Raw mouse deltas are in pixels; the controller expects a stick-sized axis.
const MOUSE_LOOK_SCALE: f32 = 0.1;

/// Input gathered since the last fixed step.
///
/// Rendering frames and fixed steps don't line up, so edge-triggered actions are latched
/// and look deltas accumulated until a step consumes them.
#[derive(Resource, Default, Debug)]
pub struct PendingInput {
    move_axis: Vec2,
    look_axis: Vec2,
    jump: bool,
    sprint: bool,
    grab: bool,
}

impl PendingInput {
    /// Hand the latched input to a fixed step and start accumulating afresh.
    pub fn take(&mut self) -> LocomotionInput {
        let input = LocomotionInput {
            move_axis: to_na_vec2(self.move_axis),
            look_axis: to_na_vec2(self.look_axis),
            jump_pressed: self.jump,
            sprint_held: self.sprint,
            grab_held: self.grab,
        };
        self.look_axis = Vec2::ZERO;
        self.jump = false;
        input
    }
}

pub(super) fn latch_input(
    actions: Res<ActionState<PlayerAction>>,
    captured: Res<CursorCaptured>,
    mut pending: ResMut<PendingInput>,
) {
    pending.move_axis = actions.clamped_axis_pair(&PlayerAction::Move);

    if captured.0 {
        // Screen space grows downward; pitch grows upward.
        let look = actions.axis_pair(&PlayerAction::Look) * MOUSE_LOOK_SCALE;
        pending.look_axis += Vec2::new(look.x, -look.y);
    }

    pending.jump |= actions.just_pressed(&PlayerAction::Jump);
    pending.sprint = actions.pressed(&PlayerAction::Sprint);
    pending.grab = actions.pressed(&PlayerAction::Grab);
}
