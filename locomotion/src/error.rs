use thiserror::Error;

/// Errors raised while setting up a locomotion controller.
///
/// Per-tick operations never fail: probe misses are `None` and degenerate vectors
/// collapse to zero. Everything here is caught before the first tick.
#[derive(Debug, Error)]
pub enum LocomotionError {
    /// A required collaborator (physics world, animation sink) was never supplied.
    #[error("missing required collaborator: {0}")]
    MissingCollaborator(&'static str),

    #[error("invalid config value `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("failed to parse locomotion config: {0}")]
    ConfigParse(#[from] ron::error::SpannedError),
}
