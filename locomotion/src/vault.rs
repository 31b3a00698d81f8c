//! Vault (mantle) sequencer.
//!
//! A vault is the one operation that spans ticks. It is modeled as a resumable task the
//! controller advances once per tick with the tick's time delta: a short hold while the
//! animation gets going, then a linear trajectory from the start point to a probed
//! landing point, snapped exactly onto the landing point at the end.

use crate::{
    physics::PhysicsWorld,
    settings::LocomotionConfig,
    types::{Point3, Pose, world_up},
};

/// Where the vault end point came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VaultLanding {
    /// The downward landing probe hit a surface.
    Probed,
    /// Nothing below the landing probe; a fixed forward offset was used instead.
    Fallback,
}

/// Find where a vault starting at `pose` should land.
pub fn vault_end_point<W: PhysicsWorld + ?Sized>(
    world: &W,
    pose: &Pose,
    cfg: &LocomotionConfig,
) -> (Point3, VaultLanding) {
    let v = &cfg.vault;
    let forward = pose.forward();
    let origin = pose.position + forward * v.landing_forward + world_up() * v.landing_rise;

    match world.cast_ray(origin, -world_up(), v.landing_depth, cfg.probe.ground_layers) {
        Some(hit) => (hit.point, VaultLanding::Probed),
        None => (
            pose.position + forward * v.fallback_forward,
            VaultLanding::Fallback,
        ),
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VaultTrajectory {
    pub start: Point3,
    pub end: Point3,
    pub duration: f32,
    pub elapsed: f32,
    pub landing: VaultLanding,
}

impl VaultTrajectory {
    pub fn new(start: Point3, end: Point3, duration: f32, landing: VaultLanding) -> Self {
        Self {
            start,
            end,
            duration,
            elapsed: 0.0,
            landing,
        }
    }

    /// Progress in `[0, 1]`. A non-positive duration is complete immediately.
    pub fn fraction(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    pub fn is_complete(&self) -> bool {
        self.duration <= 0.0 || self.elapsed >= self.duration
    }

    /// Interpolated position; exactly `end` once complete.
    pub fn position(&self) -> Point3 {
        if self.is_complete() {
            return self.end;
        }
        self.start + (self.end - self.start) * self.fraction()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VaultPhase {
    /// Holding still before travel starts.
    Delay { remaining: f32 },
    Travel(VaultTrajectory),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VaultProgress {
    /// Still in the start delay; the character does not move.
    Holding,
    /// Place the character here this tick.
    Moving(Point3),
    /// Place the character exactly here; the vault is over.
    Finished(Point3),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VaultTask {
    phase: VaultPhase,
}

impl VaultTask {
    pub fn new(cfg: &LocomotionConfig) -> Self {
        Self {
            phase: VaultPhase::Delay {
                remaining: cfg.vault.start_delay,
            },
        }
    }

    pub fn phase(&self) -> &VaultPhase {
        &self.phase
    }

    pub fn trajectory(&self) -> Option<&VaultTrajectory> {
        match &self.phase {
            VaultPhase::Travel(t) => Some(t),
            VaultPhase::Delay { .. } => None,
        }
    }

    /// Advance by `dt`.
    ///
    /// The end point is probed from `pose` when the delay runs out; any time left over
    /// from the delay is spent on the trajectory in the same call, so the total vault
    /// time does not depend on how the ticks are sliced.
    pub fn advance<W: PhysicsWorld + ?Sized>(
        &mut self,
        dt: f32,
        world: &W,
        pose: &Pose,
        cfg: &LocomotionConfig,
    ) -> VaultProgress {
        let mut dt = dt.max(0.0);

        if let VaultPhase::Delay { remaining } = &mut self.phase {
            *remaining -= dt;
            if *remaining > 0.0 {
                return VaultProgress::Holding;
            }
            dt = -*remaining;

            let (end, landing) = vault_end_point(world, pose, cfg);
            log::debug!(
                "vault travel: {:?} -> {:?} over {:.2}s ({landing:?})",
                pose.position,
                end,
                cfg.vault.duration
            );
            self.phase = VaultPhase::Travel(VaultTrajectory::new(
                pose.position,
                end,
                cfg.vault.duration,
                landing,
            ));
        }

        match &mut self.phase {
            VaultPhase::Travel(trajectory) => {
                trajectory.elapsed += dt;
                if trajectory.is_complete() {
                    VaultProgress::Finished(trajectory.end)
                } else {
                    VaultProgress::Moving(trajectory.position())
                }
            }
            VaultPhase::Delay { .. } => VaultProgress::Holding,
        }
    }
}
