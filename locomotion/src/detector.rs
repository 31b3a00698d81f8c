//! Wall/ledge detector.
//!
//! Three stateless geometric tests built from short casts against the physics world.
//! Each returns a [`Detection`]: the verdict plus the raw forward probe result, so the
//! caller can keep the wall normal without casting again.

use crate::{
    physics::PhysicsWorld,
    settings::LocomotionConfig,
    types::{Pose, SurfaceHit, angle_deg, world_up},
};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Detection {
    pub detected: bool,
    /// Forward probe hit backing the verdict, if the probe hit anything.
    pub hit: Option<SurfaceHit>,
}

impl Detection {
    pub const NONE: Self = Self {
        detected: false,
        hit: None,
    };

    /// The hit, but only when the test succeeded.
    pub fn detected_hit(&self) -> Option<SurfaceHit> {
        self.hit.filter(|_| self.detected)
    }
}

/// Is there a near-vertical climbable surface directly ahead of the base?
pub fn climbable_surface<W: PhysicsWorld + ?Sized>(
    world: &W,
    pose: &Pose,
    cfg: &LocomotionConfig,
) -> Detection {
    let origin = pose.position + world_up() * cfg.probe.base_clearance;
    let hit = world.cast_ray(
        origin,
        pose.forward(),
        cfg.probe.forward_length,
        cfg.probe.climbable_layers,
    );
    let detected = hit.is_some_and(|h| angle_deg(&h.normal, &world_up()) > cfg.climbable_angle);

    log::trace!("climbable probe: hit={hit:?} detected={detected}");
    Detection { detected, hit }
}

/// Is there a wall at head height with open space just past its face?
///
/// Only meaningful while falling; the caller gates it on vertical velocity.
pub fn mantle_ledge<W: PhysicsWorld + ?Sized>(
    world: &W,
    pose: &Pose,
    cfg: &LocomotionConfig,
) -> Detection {
    let probe = &cfg.probe;
    let forward = pose.forward();

    let Some(wall) = world.cast_ray(
        pose.head(probe.eye_height),
        forward,
        probe.forward_length,
        probe.climbable_layers,
    ) else {
        return Detection::NONE;
    };

    let clearance_origin = wall.point + forward * probe.ledge_nudge + world_up() * probe.ledge_rise;
    let blocked = world
        .cast_ray(
            clearance_origin,
            -world_up(),
            probe.ledge_depth,
            probe.ground_layers,
        )
        .is_some();

    log::trace!("ledge probe: wall={wall:?} blocked={blocked}");
    Detection {
        detected: !blocked,
        hit: Some(wall),
    }
}

/// Has a climber's head risen past the top of the wall?
///
/// A miss from just above head height means the surface ends at or below the head.
pub fn top_of_wall<W: PhysicsWorld + ?Sized>(
    world: &W,
    pose: &Pose,
    cfg: &LocomotionConfig,
) -> Detection {
    let probe = &cfg.probe;
    let origin = pose.head(probe.eye_height) + world_up() * probe.top_rise;
    let hit = world.cast_ray(
        origin,
        pose.forward(),
        probe.forward_length,
        probe.climbable_layers,
    );

    log::trace!("top-of-wall probe: hit={hit:?}");
    Detection {
        detected: hit.is_none(),
        hit,
    }
}
