//! Locomotion tuning loaded at startup.

use bevy::prelude::*;
use locomotion::{LocomotionConfig, LocomotionError};

const CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/locomotion.ron");

/// The tuning the player controller is built with.
#[derive(Resource, Debug, Clone, Default)]
pub struct LocomotionTuning(pub LocomotionConfig);

pub(super) fn plugin(app: &mut App) {
    app.insert_resource(LocomotionTuning(load_or_default(CONFIG_PATH)));
}

fn load(path: &str) -> Result<Option<LocomotionConfig>, LocomotionError> {
    let Ok(text) = std::fs::read_to_string(path) else {
        return Ok(None);
    };
    let config = LocomotionConfig::from_ron_str(&text)?;
    config.validate()?;
    Ok(Some(config))
}

fn load_or_default(path: &str) -> LocomotionConfig {
    match load(path) {
        Ok(Some(config)) => {
            info!("loaded locomotion config from {path}");
            config
        }
        Ok(None) => {
            info!("no locomotion config at {path}, using defaults");
            LocomotionConfig::default()
        }
        Err(err) => {
            warn!("ignoring {path}: {err}");
            LocomotionConfig::default()
        }
    }
}
