pub mod climb;
pub mod controller;
pub mod detector;
pub mod error;
pub mod ground;
pub mod look;
pub mod physics;
pub mod rapier_world;
pub mod settings;
pub mod signals;
pub mod surface;
pub mod types;
pub mod vault;

#[cfg(test)]
mod test_support;

pub use climb::{ClimbInput, ClimbPhase, ClimbTick, StaminaClimber, WallGrip};
pub use controller::{
    Decision, LocomotionController, LocomotionControllerBuilder, LocomotionInput, LocomotionMode,
    LocomotionState, Sensing, TickReport, compute_motion, decide, sense,
};
pub use detector::{Detection, climbable_surface, mantle_ledge, top_of_wall};
pub use error::LocomotionError;
pub use ground::{GroundEdge, GroundFilter};
pub use look::LookState;
pub use physics::PhysicsWorld;
pub use rapier_world::{
    CapsuleSpec, ColliderShapeDef, RapierCharacter, RapierQueryWorld, WorldStaticDef,
};
pub use settings::{
    ClimbStyle, LocomotionConfig, ProbeConfig, StaminaClimbConfig, VaultConfig,
};
pub use signals::{AnimationSink, RecordingSink, SignalFrame};
pub use types::{LayerMask, Point3, Pose, SurfaceHit, SurfaceId, Vec2, Vec3};
pub use vault::{VaultLanding, VaultProgress, VaultTask, VaultTrajectory, vault_end_point};
