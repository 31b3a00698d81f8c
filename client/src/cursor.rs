use bevy::{
    prelude::*,
    window::{CursorGrabMode, CursorOptions, PrimaryWindow, WindowFocused},
};

/// Whether mouse look currently owns the cursor.
#[derive(Resource, Default, Clone, Copy, PartialEq, Eq)]
pub struct CursorCaptured(pub bool);

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<CursorCaptured>();

    app.add_systems(Update, (capture_on_click, release_on_escape, release_on_blur));
    // Apply when our desired capture state changes
    app.add_systems(
        Update,
        apply_capture
            .run_if(resource_changed::<CursorCaptured>)
            .after(capture_on_click)
            .after(release_on_escape)
            .after(release_on_blur),
    );
}

fn capture_on_click(buttons: Res<ButtonInput<MouseButton>>, mut captured: ResMut<CursorCaptured>) {
    if !captured.0 && buttons.just_pressed(MouseButton::Left) {
        captured.0 = true;
    }
}

fn release_on_escape(keys: Res<ButtonInput<KeyCode>>, mut captured: ResMut<CursorCaptured>) {
    if captured.0 && keys.just_pressed(KeyCode::Escape) {
        captured.0 = false;
    }
}

fn release_on_blur(mut messages: MessageReader<WindowFocused>, mut captured: ResMut<CursorCaptured>) {
    for message in messages.read() {
        if !message.focused && captured.0 {
            captured.0 = false;
        }
    }
}

fn apply_capture(
    captured: Res<CursorCaptured>,
    mut cursor: Single<&mut CursorOptions, With<PrimaryWindow>>,
) {
    if captured.0 {
        cursor.grab_mode = CursorGrabMode::Locked;
        cursor.visible = false;
    } else {
        cursor.grab_mode = CursorGrabMode::None;
        cursor.visible = true;
    }
}
