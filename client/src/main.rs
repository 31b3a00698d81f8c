// Support configuring Bevy lints within code.
#![cfg_attr(bevy_lint, feature(register_tool), register_tool(bevy))]
// Disable console on Windows for non-dev builds.
#![cfg_attr(not(feature = "dev"), windows_subsystem = "windows")]

mod camera;
mod config;
mod convert;
mod cursor;
mod input;
mod player;
mod world;

use bevy::prelude::*;

fn main() -> AppExit {
    App::new().add_plugins(AppPlugin).run()
}

/// Fixed simulation rate of the locomotion tick (Hz).
const SIMULATION_HZ: f64 = 60.0;

pub struct AppPlugin;
impl Plugin for AppPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Window {
                title: "Locomotion Sandbox".to_string(),
                fit_canvas_to_parent: true,
                ..default()
            }
            .into(),
            ..default()
        }));

        app.insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ));

        app.add_plugins((
            config::plugin,
            world::plugin,
            input::plugin,
            cursor::plugin,
            player::plugin,
            camera::plugin,
        ));
    }
}
