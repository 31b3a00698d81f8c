use bevy::prelude::*;
use leafwing_input_manager::prelude::*;

#[derive(Reflect, Actionlike, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayerAction {
    #[actionlike(DualAxis)]
    Move,
    #[actionlike(DualAxis)]
    Look,
    Jump,
    Sprint,
    Grab,
}

pub(super) fn plugin(app: &mut App) {
    app.add_plugins(InputManagerPlugin::<PlayerAction>::default());

    app.register_type::<PlayerAction>();

    let input_map = InputMap::<PlayerAction>::default()
        .with_dual_axis(PlayerAction::Move, VirtualDPad::wasd())
        .with_dual_axis(PlayerAction::Look, MouseMove::default())
        .with(PlayerAction::Jump, KeyCode::Space)
        .with(PlayerAction::Sprint, KeyCode::ShiftLeft)
        .with(PlayerAction::Grab, MouseButton::Left);
    app.insert_resource(input_map);
    app.insert_resource(ActionState::<PlayerAction>::default());
}
