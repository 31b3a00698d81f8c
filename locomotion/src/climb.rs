//! Stamina-budgeted wall climbing.
//!
//! A self-contained three-phase machine (`None -> Climbing -> Exiting -> None`). Grabbing
//! a wall spends a time budget; running out, letting go or turning away from the wall
//! forces an exit, and a cooldown blocks re-grabbing until it elapses. The budget is
//! restored on the ground or when a genuinely different wall comes into reach.
//!
//! The climber can run on its own through [`StaminaClimber::tick_and_move`], or be
//! driven by the locomotion controller when `ClimbStyle::Stamina` is selected.

use crate::{
    physics::PhysicsWorld,
    settings::StaminaClimbConfig,
    types::{Pose, SurfaceHit, SurfaceId, Vec2, Vec3, WallFrame, angle_deg, world_up},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClimbPhase {
    #[default]
    None,
    Climbing,
    Exiting,
}

/// The wall most recently grabbed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallGrip {
    pub surface: SurfaceId,
    pub normal: Vec3,
}

impl From<&SurfaceHit> for WallGrip {
    fn from(hit: &SurfaceHit) -> Self {
        Self {
            surface: hit.surface,
            normal: hit.normal,
        }
    }
}

/// Per-tick input the climber reads.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ClimbInput {
    /// x = horizontal along the wall, y = vertical along the wall.
    pub axis: Vec2,
    pub grab_held: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClimbTick {
    pub phase: ClimbPhase,
    /// Climb velocity while Climbing, zero otherwise.
    pub velocity: Vec3,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StaminaClimber {
    phase: ClimbPhase,
    /// Seconds of climbing left on the current wall. Never negative.
    budget: f32,
    exit_timer: f32,
    last_wall: Option<WallGrip>,
    wall_front: Option<SurfaceHit>,
    /// Angle between facing and the inverted wall normal (degrees).
    look_angle: f32,
}

impl StaminaClimber {
    pub fn new(cfg: &StaminaClimbConfig) -> Self {
        Self {
            phase: ClimbPhase::None,
            budget: cfg.max_climb_time,
            exit_timer: 0.0,
            last_wall: None,
            wall_front: None,
            look_angle: 0.0,
        }
    }

    pub fn phase(&self) -> ClimbPhase {
        self.phase
    }

    pub fn budget(&self) -> f32 {
        self.budget
    }

    pub fn last_wall(&self) -> Option<WallGrip> {
        self.last_wall
    }

    pub fn wall_front(&self) -> Option<SurfaceHit> {
        self.wall_front
    }

    pub fn look_angle(&self) -> f32 {
        self.look_angle
    }

    /// Sweep for a wall ahead, measure the facing angle and restore the budget if the
    /// character is grounded or the wall ahead differs from the last grabbed one.
    pub fn check_wall<W: PhysicsWorld + ?Sized>(
        &mut self,
        world: &W,
        pose: &Pose,
        grounded: bool,
        cfg: &StaminaClimbConfig,
    ) {
        let forward = pose.forward();
        let origin = pose.position + world_up() * cfg.probe_height;
        self.wall_front = world.cast_sphere(
            origin,
            cfg.sphere_radius,
            forward,
            cfg.detection_length,
            cfg.wall_layers,
        );
        self.look_angle = self
            .wall_front
            .map_or(0.0, |hit| angle_deg(&forward, &-hit.normal));

        let new_wall = self.wall_front.is_some_and(|hit| match self.last_wall {
            None => true,
            Some(grip) => {
                grip.surface != hit.surface
                    || angle_deg(&grip.normal, &hit.normal) > cfg.min_wall_normal_angle_change
            }
        });

        if new_wall || grounded {
            self.budget = cfg.max_climb_time;
        }
        // Crossing onto another wall mid-climb makes it the grabbed wall.
        if new_wall && self.phase == ClimbPhase::Climbing {
            self.last_wall = self.wall_front.as_ref().map(WallGrip::from);
        }
        log::trace!(
            "wall check: front={:?} look_angle={:.1} new_wall={new_wall} budget={:.3}",
            self.wall_front,
            self.look_angle,
            self.budget
        );
    }

    fn can_hold(&self, input: &ClimbInput, cfg: &StaminaClimbConfig) -> bool {
        self.wall_front.is_some() && input.grab_held && self.look_angle < cfg.max_wall_look_angle
    }

    fn set_phase(&mut self, phase: ClimbPhase) {
        if self.phase != phase {
            log::debug!(
                "stamina climb: {:?} -> {:?} (budget {:.3})",
                self.phase,
                phase,
                self.budget
            );
            self.phase = phase;
        }
    }

    /// Run the phase transitions for this tick, then spend budget and produce the climb
    /// velocity while Climbing. Uses the wall seen by the last [`Self::check_wall`].
    pub fn update(&mut self, input: &ClimbInput, cfg: &StaminaClimbConfig, dt: f32) -> ClimbTick {
        let dt = dt.max(0.0);

        match self.phase {
            ClimbPhase::None => {
                if self.can_hold(input, cfg) && self.budget > 0.0 {
                    self.last_wall = self.wall_front.as_ref().map(WallGrip::from);
                    self.set_phase(ClimbPhase::Climbing);
                }
            }
            ClimbPhase::Climbing => {
                if !self.can_hold(input, cfg) || self.budget <= 0.0 {
                    self.release(cfg);
                }
            }
            ClimbPhase::Exiting => self.count_down_exit(dt),
        }

        let velocity = match (self.phase, self.last_wall) {
            (ClimbPhase::Climbing, Some(grip)) => {
                self.budget = (self.budget - dt).max(0.0);
                WallFrame::from_normal(&grip.normal).climb_velocity(input.axis, cfg.climb_speed)
            }
            _ => Vec3::zeros(),
        };

        ClimbTick {
            phase: self.phase,
            velocity,
        }
    }

    /// Run down the exit cooldown; back to `None` once it elapses.
    pub fn count_down_exit(&mut self, dt: f32) {
        if self.phase != ClimbPhase::Exiting {
            return;
        }
        self.exit_timer -= dt.max(0.0);
        if self.exit_timer <= 0.0 {
            self.exit_timer = 0.0;
            self.set_phase(ClimbPhase::None);
        }
    }

    /// Leave the wall now and start the exit cooldown. No-op unless Climbing.
    pub fn release(&mut self, cfg: &StaminaClimbConfig) {
        if self.phase == ClimbPhase::Climbing {
            self.exit_timer = cfg.exit_cooldown;
            self.set_phase(ClimbPhase::Exiting);
        }
    }

    /// Wall check followed by the phase update.
    pub fn tick<W: PhysicsWorld + ?Sized>(
        &mut self,
        world: &W,
        pose: &Pose,
        grounded: bool,
        input: &ClimbInput,
        cfg: &StaminaClimbConfig,
        dt: f32,
    ) -> ClimbTick {
        self.check_wall(world, pose, grounded, cfg);
        self.update(input, cfg, dt)
    }

    /// Standalone use: [`Self::tick`] and apply the climb velocity through the world.
    pub fn tick_and_move<W: PhysicsWorld + ?Sized>(
        &mut self,
        world: &mut W,
        yaw: f32,
        input: &ClimbInput,
        cfg: &StaminaClimbConfig,
        dt: f32,
    ) -> ClimbTick {
        let pose = Pose::new(world.position(), yaw);
        let grounded = world.is_grounded();
        let out = self.tick(&*world, &pose, grounded, input, cfg, dt);
        if out.phase == ClimbPhase::Climbing {
            world.move_by(out.velocity * dt);
        }
        out
    }
}
