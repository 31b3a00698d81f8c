//! Locomotion state machine.
//!
//! One tick runs, in order:
//! 1. [`sense`]: probe the world for the current mode and classify ground contact.
//! 2. [`decide`]: pick the next mode from this tick's sensing only.
//! 3. [`compute_motion`]: the next mode's velocity.
//! 4. Apply it through [`PhysicsWorld::move_by`] (or the vault's position while Vaulting).
//! 5. Look update, skipped on ticks that enter, run or leave a vault.
//! 6. Read ground contact after the move, then publish animation signals.
//!
//! `decide` and `compute_motion` are pure; all per-character memory lives in
//! [`LocomotionState`], owned by the [`LocomotionController`].

use std::fmt;

use crate::{
    LocomotionError,
    climb::{ClimbInput, ClimbPhase, ClimbTick, StaminaClimber},
    detector::{Detection, climbable_surface, mantle_ledge, top_of_wall},
    ground::GroundFilter,
    look::LookState,
    physics::PhysicsWorld,
    settings::{AXIS_DEADZONE, ClimbStyle, LocomotionConfig},
    signals::{AnimationSink, SignalFrame, SignalSource},
    types::{Pose, Vec2, Vec3, WallFrame, normalize_or_zero},
    vault::{VaultProgress, VaultTask},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LocomotionMode {
    #[default]
    Grounded,
    Aerial,
    Climbing,
    /// Control-locked while the vault sequencer runs.
    Vaulting,
}

impl fmt::Display for LocomotionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LocomotionMode::Grounded => "Grounded",
            LocomotionMode::Aerial => "Aerial",
            LocomotionMode::Climbing => "Climbing",
            LocomotionMode::Vaulting => "Vaulting",
        };
        f.write_str(name)
    }
}

/// One tick of player input.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LocomotionInput {
    /// x = strafe (right positive), y = forward.
    pub move_axis: Vec2,
    /// x = turn (right positive), y = look up.
    pub look_axis: Vec2,
    /// Jump went down this tick.
    pub jump_pressed: bool,
    pub sprint_held: bool,
    pub grab_held: bool,
}

impl LocomotionInput {
    fn forward_intent(&self) -> bool {
        self.move_axis.y > AXIS_DEADZONE
    }

    fn climb_input(&self) -> ClimbInput {
        ClimbInput {
            axis: self.move_axis,
            grab_held: self.grab_held,
        }
    }
}

/// Everything the controller remembers between ticks.
#[derive(Clone, Debug, PartialEq)]
pub struct LocomotionState {
    pub mode: LocomotionMode,
    /// Integrated jump/fall velocity; survives ticks only while Grounded or Aerial.
    pub vertical_velocity: f32,
    /// Normal of the wall being climbed.
    pub wall_normal: Option<Vec3>,
    pub ground: GroundFilter,
    pub vault: Option<VaultTask>,
    pub climber: StaminaClimber,
    pub look: LookState,
}

impl LocomotionState {
    pub fn new(cfg: &LocomotionConfig, grounded: bool, look: LookState) -> Self {
        Self {
            mode: LocomotionMode::Grounded,
            vertical_velocity: 0.0,
            wall_normal: None,
            ground: GroundFilter::new(grounded),
            vault: None,
            climber: StaminaClimber::new(&cfg.stamina),
            look,
        }
    }
}

/// World observations captured at the start of a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sensing {
    pub pose: Pose,
    pub raw_grounded: bool,
    /// Ground filter verdict; only ever set for Grounded and Aerial.
    pub ground_verdict: Option<LocomotionMode>,
    pub climbable: Detection,
    pub ledge: Detection,
    pub top: Detection,
    /// Stamina climber output, when that climb style is active.
    pub stamina: Option<ClimbTick>,
    /// Vault sequencer output, while Vaulting.
    pub vault: Option<VaultProgress>,
}

/// Observe the world for the current mode.
///
/// Only the probes the mode can act on are cast. Also advances the multi-tick pieces
/// that sample the world themselves (ground filter timer, vault task, stamina climber).
pub fn sense<W: PhysicsWorld + ?Sized>(
    state: &mut LocomotionState,
    world: &W,
    input: &LocomotionInput,
    cfg: &LocomotionConfig,
    dt: f32,
) -> Sensing {
    let pose = Pose::new(world.position(), state.look.yaw());
    let raw_grounded = world.is_grounded();
    let ground_verdict =
        state
            .ground
            .arbitrate(state.mode, raw_grounded, dt, cfg.ground_grace_time);

    let mut sensing = Sensing {
        pose,
        raw_grounded,
        ground_verdict,
        climbable: Detection::NONE,
        ledge: Detection::NONE,
        top: Detection::NONE,
        stamina: None,
        vault: None,
    };

    let hold_to_climb = cfg.climb_style == ClimbStyle::HoldToClimb;
    match state.mode {
        LocomotionMode::Grounded if hold_to_climb => {
            sensing.climbable = climbable_surface(world, &pose, cfg);
        }
        LocomotionMode::Grounded => {}
        LocomotionMode::Aerial => {
            if state.vertical_velocity < 0.0 {
                sensing.ledge = mantle_ledge(world, &pose, cfg);
            }
        }
        LocomotionMode::Climbing => {
            if hold_to_climb {
                sensing.climbable = climbable_surface(world, &pose, cfg);
            }
            sensing.top = top_of_wall(world, &pose, cfg);
        }
        LocomotionMode::Vaulting => {
            let progress = match state.vault.as_mut() {
                Some(task) => task.advance(dt, world, &pose, cfg),
                // Vaulting without a task cannot make progress; land where we stand.
                None => VaultProgress::Finished(pose.position),
            };
            sensing.vault = Some(progress);
        }
    }

    if cfg.climb_style == ClimbStyle::Stamina {
        if state.mode == LocomotionMode::Vaulting {
            // No wall checks mid-vault, but the exit cooldown keeps running.
            state.climber.count_down_exit(dt);
        } else {
            sensing.stamina = Some(state.climber.tick(
                world,
                &pose,
                raw_grounded,
                &input.climb_input(),
                &cfg.stamina,
                dt,
            ));
        }
    }

    sensing
}

/// Outcome of the transition step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decision {
    pub next: LocomotionMode,
    /// Vertical velocity entering motion integration.
    pub vertical_velocity: f32,
    pub wall_normal: Option<Vec3>,
    pub jumped: bool,
    pub vault_began: bool,
}

impl Decision {
    fn stay(state: &LocomotionState) -> Self {
        Self {
            next: state.mode,
            vertical_velocity: state.vertical_velocity,
            wall_normal: state.wall_normal,
            jumped: false,
            vault_began: false,
        }
    }

    fn to(self, next: LocomotionMode) -> Self {
        Self { next, ..self }
    }

    fn begin_vault(self) -> Self {
        Self {
            next: LocomotionMode::Vaulting,
            vertical_velocity: 0.0,
            wall_normal: None,
            vault_began: true,
            ..self
        }
    }
}

fn stamina_climbing(sensing: &Sensing) -> bool {
    sensing
        .stamina
        .is_some_and(|tick| tick.phase == ClimbPhase::Climbing)
}

/// Choose this tick's transition. Pure: reads only start-of-tick state and sensing.
pub fn decide(
    state: &LocomotionState,
    sensing: &Sensing,
    input: &LocomotionInput,
    cfg: &LocomotionConfig,
) -> Decision {
    let stay = Decision::stay(state);
    let hold_to_climb = cfg.climb_style == ClimbStyle::HoldToClimb;

    match state.mode {
        LocomotionMode::Grounded => {
            // Losing the ground wins over anything else requested this tick.
            if let Some(next) = sensing.ground_verdict {
                stay.to(next)
            } else if input.jump_pressed {
                Decision {
                    vertical_velocity: cfg.jump_speed,
                    jumped: true,
                    ..stay.to(LocomotionMode::Aerial)
                }
            } else if let Some(wall) = sensing
                .climbable
                .detected_hit()
                .filter(|_| hold_to_climb && input.forward_intent())
            {
                Decision {
                    vertical_velocity: 0.0,
                    wall_normal: Some(wall.normal),
                    ..stay.to(LocomotionMode::Climbing)
                }
            } else if stamina_climbing(sensing) {
                Decision {
                    vertical_velocity: 0.0,
                    wall_normal: state.climber.last_wall().map(|grip| grip.normal),
                    ..stay.to(LocomotionMode::Climbing)
                }
            } else {
                stay
            }
        }

        LocomotionMode::Aerial => {
            if let Some(next) = sensing.ground_verdict {
                stay.to(next)
            } else if sensing.ledge.detected {
                stay.begin_vault()
            } else if stamina_climbing(sensing) {
                Decision {
                    vertical_velocity: 0.0,
                    wall_normal: state.climber.last_wall().map(|grip| grip.normal),
                    ..stay.to(LocomotionMode::Climbing)
                }
            } else {
                stay
            }
        }

        LocomotionMode::Climbing => {
            if input.jump_pressed {
                Decision {
                    vertical_velocity: 0.0,
                    wall_normal: None,
                    ..stay.to(LocomotionMode::Aerial)
                }
            } else if input.forward_intent() && sensing.top.detected {
                stay.begin_vault()
            } else if !hold_to_climb && !stamina_climbing(sensing) {
                Decision {
                    vertical_velocity: 0.0,
                    wall_normal: None,
                    ..stay.to(LocomotionMode::Aerial)
                }
            } else {
                let refreshed = if hold_to_climb {
                    sensing.climbable.detected_hit().map(|wall| wall.normal)
                } else {
                    state.climber.last_wall().map(|grip| grip.normal)
                };
                Decision {
                    wall_normal: refreshed.or(state.wall_normal),
                    ..stay
                }
            }
        }

        LocomotionMode::Vaulting => match sensing.vault {
            Some(VaultProgress::Finished(_)) => Decision {
                vertical_velocity: 0.0,
                ..stay.to(LocomotionMode::Grounded)
            },
            _ => stay,
        },
    }
}

/// Planar movement direction from the move axis, relative to the facing.
fn planar_direction(pose: &Pose, axis: Vec2) -> Vec3 {
    normalize_or_zero(pose.forward() * axis.y + pose.right() * axis.x)
}

/// Velocity for the decided mode.
///
/// The vertical component of Grounded/Aerial motion is the integrated fall/jump
/// velocity the controller carries into the next tick.
pub fn compute_motion(
    decision: &Decision,
    sensing: &Sensing,
    input: &LocomotionInput,
    cfg: &LocomotionConfig,
    dt: f32,
) -> Vec3 {
    let pose = &sensing.pose;

    match decision.next {
        LocomotionMode::Grounded => {
            let speed = if input.sprint_held {
                cfg.run_speed
            } else {
                cfg.walk_speed
            };
            let mut v = planar_direction(pose, input.move_axis) * speed;
            // Keep pressing into the floor so contact queries stay stable.
            v.y = -cfg.gravity * dt;
            v
        }

        LocomotionMode::Aerial => {
            let mut v = planar_direction(pose, input.move_axis) * (cfg.walk_speed * cfg.air_control);
            v.y = if decision.jumped {
                decision.vertical_velocity
            } else {
                decision.vertical_velocity - cfg.gravity * dt
            };
            v
        }

        LocomotionMode::Climbing => {
            let Some(normal) = decision.wall_normal else {
                return Vec3::zeros();
            };
            let climb = match (cfg.climb_style, sensing.stamina) {
                (ClimbStyle::Stamina, Some(tick)) => tick.velocity,
                (ClimbStyle::Stamina, None) => Vec3::zeros(),
                (ClimbStyle::HoldToClimb, _) => {
                    WallFrame::from_normal(&normal).climb_velocity(input.move_axis, cfg.climb_speed)
                }
            };
            climb - normal * cfg.climb_stick_speed
        }

        LocomotionMode::Vaulting => Vec3::zeros(),
    }
}

/// Summary of one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickReport {
    pub mode: LocomotionMode,
    pub previous_mode: LocomotionMode,
    /// Velocity commanded this tick (zero while Vaulting).
    pub motion: Vec3,
    /// Raw ground contact after the move.
    pub raw_grounded: bool,
}

impl TickReport {
    pub fn transitioned(&self) -> bool {
        self.mode != self.previous_mode
    }
}

/// A single character's locomotion: the state machine plus its collaborators.
pub struct LocomotionController<W, A> {
    config: LocomotionConfig,
    state: LocomotionState,
    world: W,
    animator: A,
}

impl<W: PhysicsWorld, A: AnimationSink> LocomotionController<W, A> {
    pub fn builder() -> LocomotionControllerBuilder<W, A> {
        LocomotionControllerBuilder::default()
    }

    pub fn mode(&self) -> LocomotionMode {
        self.state.mode
    }

    pub fn state(&self) -> &LocomotionState {
        &self.state
    }

    pub fn look(&self) -> &LookState {
        &self.state.look
    }

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn animator(&self) -> &A {
        &self.animator
    }

    pub fn animator_mut(&mut self) -> &mut A {
        &mut self.animator
    }

    /// Advance the character by one simulation tick of `dt` seconds.
    pub fn tick(&mut self, input: &LocomotionInput, dt: f32) -> TickReport {
        let dt = dt.max(0.0);
        let cfg = &self.config;
        let previous = self.state.mode;

        let sensing = sense(&mut self.state, &self.world, input, cfg, dt);
        let decision = decide(&self.state, &sensing, input, cfg);
        let motion = compute_motion(&decision, &sensing, input, cfg, dt);

        let state = &mut self.state;
        if decision.next != previous {
            log::debug!("locomotion: {previous} -> {}", decision.next);
        }
        state.mode = decision.next;
        state.wall_normal = decision.wall_normal;
        state.vertical_velocity = match decision.next {
            // A finished vault lands at rest; the grounded bias starts next tick.
            _ if previous == LocomotionMode::Vaulting => 0.0,
            LocomotionMode::Grounded | LocomotionMode::Aerial => motion.y,
            LocomotionMode::Climbing | LocomotionMode::Vaulting => 0.0,
        };
        if decision.jumped {
            state.ground.mark_airborne();
        }
        if decision.vault_began {
            log::debug!("vault begin at {:?}", sensing.pose.position);
            state.vault = Some(VaultTask::new(cfg));
        }
        if previous == LocomotionMode::Vaulting && decision.next != LocomotionMode::Vaulting {
            if let Some(t) = state.vault.take().as_ref().and_then(VaultTask::trajectory) {
                log::debug!("vault end at {:?} ({:?})", t.end, t.landing);
            }
        }
        if state.mode != LocomotionMode::Climbing {
            state.climber.release(&cfg.stamina);
        }

        let vaulting = previous == LocomotionMode::Vaulting || decision.next == LocomotionMode::Vaulting;
        match sensing.vault {
            Some(VaultProgress::Moving(p) | VaultProgress::Finished(p)) => self.world.teleport(p),
            Some(VaultProgress::Holding) => {}
            None if vaulting => {}
            None => self.world.move_by(motion * dt),
        }

        if !vaulting {
            state
                .look
                .apply(input.look_axis, cfg.look_sensitivity, cfg.look_pitch_limit);
        }

        let raw_grounded = self.world.is_grounded();
        let edge = state.ground.observe(raw_grounded);

        let frame = SignalFrame::derive(&SignalSource {
            mode: state.mode,
            raw_grounded,
            horizontal_speed: Vec2::new(motion.x, motion.z).norm(),
            sprinting: input.sprint_held,
            sprint_anim_speed: cfg.sprint_anim_speed,
            move_axis: input.move_axis,
            jumped: decision.jumped,
            landed: edge.landed,
            vault_began: decision.vault_began,
        });
        frame.emit(&mut self.animator);

        TickReport {
            mode: state.mode,
            previous_mode: previous,
            motion,
            raw_grounded,
        }
    }
}

/// Assembles a [`LocomotionController`]; collaborators are required, the rest defaults.
pub struct LocomotionControllerBuilder<W, A> {
    config: LocomotionConfig,
    world: Option<W>,
    animator: Option<A>,
    look: LookState,
}

impl<W, A> Default for LocomotionControllerBuilder<W, A> {
    fn default() -> Self {
        Self {
            config: LocomotionConfig::default(),
            world: None,
            animator: None,
            look: LookState::default(),
        }
    }
}

impl<W: PhysicsWorld, A: AnimationSink> LocomotionControllerBuilder<W, A> {
    pub fn config(mut self, config: LocomotionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn world(mut self, world: W) -> Self {
        self.world = Some(world);
        self
    }

    pub fn animator(mut self, animator: A) -> Self {
        self.animator = Some(animator);
        self
    }

    pub fn initial_look(mut self, look: LookState) -> Self {
        self.look = look;
        self
    }

    /// Fails before the first tick if a collaborator is missing or the config is invalid.
    pub fn build(self) -> Result<LocomotionController<W, A>, LocomotionError> {
        let world = self
            .world
            .ok_or(LocomotionError::MissingCollaborator("physics world"))?;
        let animator = self
            .animator
            .ok_or(LocomotionError::MissingCollaborator("animation sink"))?;
        self.config.validate()?;

        let state = LocomotionState::new(&self.config, world.is_grounded(), self.look);
        log::debug!(
            "locomotion controller ready ({:?}, grounded={})",
            self.config.climb_style,
            world.is_grounded()
        );

        Ok(LocomotionController {
            config: self.config,
            state,
            world,
            animator,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        signals::{self, RecordingSink},
        test_support::{ScriptedWorld, hit_ahead, is_level},
        types::{Point3, SurfaceHit},
    };

    const DT: f32 = 1.0 / 60.0;

    type TestController = LocomotionController<ScriptedWorld, RecordingSink>;

    fn controller(world: ScriptedWorld, config: LocomotionConfig) -> TestController {
        LocomotionController::builder()
            .config(config)
            .world(world)
            .animator(RecordingSink::default())
            .build()
            .expect("valid controller")
    }

    fn forward() -> LocomotionInput {
        LocomotionInput {
            move_axis: Vec2::new(0.0, 1.0),
            ..LocomotionInput::default()
        }
    }

    fn jump() -> LocomotionInput {
        LocomotionInput {
            jump_pressed: true,
            ..LocomotionInput::default()
        }
    }

    /// Level rays hit a wall `distance` ahead while their origin is below `top`.
    fn wall_below(top: f32, distance: f32) -> impl Fn(Point3, Vec3, f32) -> Option<SurfaceHit> {
        move |origin, dir, max| {
            (is_level(&dir) && origin.y < top && distance <= max)
                .then(|| hit_ahead(origin, dir, distance, 4))
        }
    }

    #[test]
    fn builder_requires_world() {
        let err = TestController::builder()
            .animator(RecordingSink::default())
            .build()
            .err()
            .expect("missing world");
        assert!(matches!(err, LocomotionError::MissingCollaborator("physics world")));
    }

    #[test]
    fn builder_requires_animator() {
        let err = TestController::builder()
            .world(ScriptedWorld::on_floor())
            .build()
            .err()
            .expect("missing animator");
        assert!(matches!(err, LocomotionError::MissingCollaborator("animation sink")));
    }

    #[test]
    fn builder_rejects_invalid_config() {
        let config = LocomotionConfig {
            walk_speed: f32::INFINITY,
            ..LocomotionConfig::default()
        };
        let err = TestController::builder()
            .config(config)
            .world(ScriptedWorld::on_floor())
            .animator(RecordingSink::default())
            .build()
            .err()
            .expect("invalid config");
        assert!(matches!(err, LocomotionError::InvalidConfig { field: "walk_speed", .. }));
    }

    #[test]
    fn idle_on_ground_stays_grounded_with_downward_bias() {
        let cfg = LocomotionConfig::default();
        let mut c = controller(ScriptedWorld::on_floor(), cfg.clone());

        for _ in 0..120 {
            let report = c.tick(&LocomotionInput::default(), DT);
            assert_eq!(report.mode, LocomotionMode::Grounded);
            assert!(report.motion.y < 0.0);
            assert!((report.motion.y + cfg.gravity * DT).abs() < 1.0e-6);
        }
        assert!(!c.animator().fired(signals::LAND));
        assert_eq!(c.animator().bool(signals::IS_GROUNDED), Some(true));
    }

    #[test]
    fn walking_and_sprinting_speeds() {
        let cfg = LocomotionConfig::default();
        let mut c = controller(ScriptedWorld::on_floor(), cfg.clone());

        let walk = c.tick(&forward(), DT);
        let planar = Vec2::new(walk.motion.x, walk.motion.z);
        assert!((planar.norm() - cfg.walk_speed).abs() < 1.0e-5);
        assert!(walk.motion.z < 0.0);
        assert_eq!(c.animator().float(signals::SPEED), Some(cfg.walk_speed));

        let sprint = LocomotionInput {
            sprint_held: true,
            move_axis: Vec2::new(1.0, 1.0),
            ..LocomotionInput::default()
        };
        let run = c.tick(&sprint, DT);
        let planar = Vec2::new(run.motion.x, run.motion.z);
        assert!((planar.norm() - cfg.run_speed).abs() < 1.0e-4);
        assert_eq!(c.animator().float(signals::SPEED), Some(cfg.sprint_anim_speed));
    }

    #[test]
    fn jump_launches_on_the_same_tick() {
        let cfg = LocomotionConfig::default();
        let mut c = controller(ScriptedWorld::on_floor(), cfg.clone());

        let report = c.tick(&jump(), DT);
        assert_eq!(report.mode, LocomotionMode::Aerial);
        assert_eq!(report.motion.y, cfg.jump_speed);
        assert!(c.animator().fired(signals::JUMP));
        assert!(!c.animator().fired(signals::LAND));
    }

    #[test]
    fn jump_after_leaving_the_ground_does_not_launch() {
        let cfg = LocomotionConfig::default();
        let mut c = controller(ScriptedWorld::floating_at(Point3::new(0.0, 5.0, 0.0)), cfg.clone());

        let report = c.tick(&jump(), DT);
        assert_eq!(report.mode, LocomotionMode::Aerial);
        assert!(report.motion.y <= 0.0);
        assert!(!c.animator().fired(signals::JUMP));
    }

    #[test]
    fn grace_window_still_allows_a_late_jump() {
        let cfg = LocomotionConfig {
            ground_grace_time: 0.1,
            ..LocomotionConfig::default()
        };
        let mut c = controller(ScriptedWorld::floating_at(Point3::new(0.0, 5.0, 0.0)), cfg.clone());

        let report = c.tick(&jump(), DT);
        assert_eq!(report.mode, LocomotionMode::Aerial);
        assert_eq!(report.motion.y, cfg.jump_speed);
        assert!(c.animator().fired(signals::JUMP));
    }

    #[test]
    fn jump_arc_lands_with_a_single_land_trigger() {
        let mut c = controller(ScriptedWorld::on_floor(), LocomotionConfig::default());
        c.tick(&jump(), DT);

        let mut landed_at = None;
        for i in 0..240 {
            let report = c.tick(&LocomotionInput::default(), DT);
            if report.mode == LocomotionMode::Grounded {
                landed_at = Some(i);
                break;
            }
            assert_eq!(report.mode, LocomotionMode::Aerial);
        }
        assert!(landed_at.is_some(), "never landed");
        let lands = c
            .animator()
            .triggers
            .iter()
            .filter(|t| **t == signals::LAND)
            .count();
        assert_eq!(lands, 1);
    }

    #[test]
    fn gravity_accumulates_without_clamp() {
        let cfg = LocomotionConfig::default();
        let mut c = controller(ScriptedWorld::floating_at(Point3::new(0.0, 100.0, 0.0)), cfg.clone());

        let mut last = f32::INFINITY;
        for _ in 0..60 {
            let report = c.tick(&LocomotionInput::default(), DT);
            assert_eq!(report.mode, LocomotionMode::Aerial);
            assert!(report.motion.y < last);
            last = report.motion.y;
        }
        assert!(last < -cfg.gravity * 0.9);
    }

    #[test]
    fn falling_into_a_ledge_starts_a_vault() {
        let world = ScriptedWorld::floating_at(Point3::new(0.0, 5.0, 0.0)).with_ray(wall_below(100.0, 1.0));
        let mut c = controller(world, LocomotionConfig::default());

        assert_eq!(c.tick(&LocomotionInput::default(), DT).mode, LocomotionMode::Aerial);
        let report = c.tick(&LocomotionInput::default(), DT);

        assert_eq!(report.mode, LocomotionMode::Vaulting);
        assert_eq!(report.motion, Vec3::zeros());
        assert!(c.animator().fired(signals::DO_VAULT));
    }

    #[test]
    fn rising_never_checks_for_ledges() {
        let world = ScriptedWorld::on_floor().with_ray(wall_below(100.0, 1.0));
        let mut c = controller(world, LocomotionConfig::default());

        c.tick(&jump(), DT);
        for _ in 0..10 {
            assert_eq!(c.tick(&LocomotionInput::default(), DT).mode, LocomotionMode::Aerial);
        }
    }

    #[test]
    fn vault_completes_exactly_on_its_end_point() {
        for dt in [1.0 / 60.0, 1.0 / 24.0, 0.3] {
            let world = ScriptedWorld::floating_at(Point3::new(0.0, 5.0, 0.0)).with_ray(wall_below(100.0, 1.0));
            let cfg = LocomotionConfig::default();
            let mut c = controller(world, cfg.clone());

            c.tick(&LocomotionInput::default(), DT);
            assert_eq!(c.tick(&LocomotionInput::default(), DT).mode, LocomotionMode::Vaulting);

            // No landing below: falls back to a fixed offset ahead of the vault start.
            let start = c.world().position;
            let expected = start + Pose::new(start, 0.0).forward() * cfg.vault.fallback_forward;

            let mut elapsed = 0.0;
            let report = loop {
                let report = c.tick(&LocomotionInput::default(), dt);
                elapsed += dt;
                if report.mode != LocomotionMode::Vaulting {
                    break report;
                }
                assert!(elapsed < 5.0);
            };

            assert_eq!(report.mode, LocomotionMode::Grounded);
            assert_eq!(c.world().position, expected, "dt = {dt}");
            assert!(elapsed + 1.0e-4 >= cfg.vault.start_delay + cfg.vault.duration);
            assert_eq!(c.state().vertical_velocity, 0.0);
            assert!(c.state().vault.is_none());
        }
    }

    #[test]
    fn vaulting_ignores_input_and_look() {
        let world = ScriptedWorld::floating_at(Point3::new(0.0, 5.0, 0.0)).with_ray(wall_below(100.0, 1.0));
        let mut c = controller(world, LocomotionConfig::default());
        c.tick(&LocomotionInput::default(), DT);
        c.tick(&LocomotionInput::default(), DT);
        assert_eq!(c.mode(), LocomotionMode::Vaulting);

        let busy = LocomotionInput {
            move_axis: Vec2::new(1.0, 1.0),
            look_axis: Vec2::new(30.0, 10.0),
            jump_pressed: true,
            sprint_held: true,
            grab_held: true,
        };
        let moves = c.world().moves.len();
        let report = c.tick(&busy, DT);
        assert_eq!(report.mode, LocomotionMode::Vaulting);
        assert_eq!(*c.look(), LookState::default());
        assert_eq!(c.world().moves.len(), moves);
    }

    #[test]
    fn pushing_into_a_wall_starts_climbing() {
        let world = ScriptedWorld::on_floor().with_ray(wall_below(100.0, 0.5));
        let mut c = controller(world, LocomotionConfig::default());

        let report = c.tick(&forward(), DT);
        assert_eq!(report.mode, LocomotionMode::Climbing);
        assert_eq!(c.state().wall_normal, Some(Vec3::z()));
        // Straight up the wall, pressed slightly into it.
        assert!(report.motion.y > 0.0);
        assert!(report.motion.z < 0.0);
        assert_eq!(c.animator().bool(signals::IS_CLIMBING), Some(true));
        assert_eq!(c.animator().float(signals::CLIMB_VERTICAL), Some(1.0));
    }

    #[test]
    fn standing_by_a_wall_without_forward_input_stays_grounded() {
        let world = ScriptedWorld::on_floor().with_ray(wall_below(100.0, 0.5));
        let mut c = controller(world, LocomotionConfig::default());
        assert_eq!(c.tick(&LocomotionInput::default(), DT).mode, LocomotionMode::Grounded);
    }

    #[test]
    fn climbing_ignores_lost_ground_contact() {
        let world = ScriptedWorld::on_floor().with_ray(wall_below(100.0, 0.5));
        let mut c = controller(world, LocomotionConfig::default());

        c.tick(&forward(), DT);
        for i in 0..120 {
            let input = if i % 2 == 0 { forward() } else { LocomotionInput::default() };
            let report = c.tick(&input, DT);
            assert!(!report.raw_grounded || i == 0);
            assert_eq!(report.mode, LocomotionMode::Climbing);
            assert!(report.motion.y >= 0.0);
        }
    }

    #[test]
    fn jump_detaches_from_the_wall() {
        let world = ScriptedWorld::on_floor().with_ray(wall_below(100.0, 0.5));
        let mut c = controller(world, LocomotionConfig::default());
        c.tick(&forward(), DT);
        for _ in 0..30 {
            c.tick(&forward(), DT);
        }

        let report = c.tick(&jump(), DT);
        assert_eq!(report.mode, LocomotionMode::Aerial);
        assert!(report.motion.y < 0.0);
        assert_eq!(c.state().wall_normal, None);
    }

    #[test]
    fn climbing_past_the_top_vaults_over() {
        let world = ScriptedWorld::on_floor().with_ray(wall_below(2.5, 0.5));
        let mut c = controller(world, LocomotionConfig::default());

        let mut vaulted = false;
        for _ in 0..120 {
            let report = c.tick(&forward(), DT);
            if report.mode == LocomotionMode::Vaulting {
                assert_eq!(report.previous_mode, LocomotionMode::Climbing);
                vaulted = true;
                break;
            }
        }
        assert!(vaulted);
        assert!(c.animator().fired(signals::DO_VAULT));
    }

    #[test]
    fn look_turns_the_probes() {
        let mut c = controller(ScriptedWorld::on_floor(), LocomotionConfig::default());
        let turn = LocomotionInput {
            look_axis: Vec2::new(45.0, 0.0),
            ..LocomotionInput::default()
        };
        c.tick(&turn, DT);
        let report = c.tick(&forward(), DT);
        // Facing +X after a 90 degree right turn.
        assert!(report.motion.x > 3.9);
        assert!(report.motion.z.abs() < 1.0e-4);
    }

    fn stamina_config() -> LocomotionConfig {
        LocomotionConfig {
            climb_style: ClimbStyle::Stamina,
            ..LocomotionConfig::default()
        }
    }

    /// A tall wall ahead for both the grab sweep and the top-of-wall ray.
    fn stamina_world() -> ScriptedWorld {
        ScriptedWorld::on_floor()
            .with_ray(wall_below(100.0, 0.3))
            .with_sphere(|origin, _, dir, _| Some(hit_ahead(origin, dir, 0.3, 6)))
    }

    #[test]
    fn stamina_grab_climbs_and_release_falls() {
        let world = stamina_world();
        let mut c = controller(world, stamina_config());

        // Forward alone does nothing in this style.
        assert_eq!(c.tick(&forward(), DT).mode, LocomotionMode::Grounded);

        let hold = LocomotionInput {
            grab_held: true,
            ..forward()
        };
        let report = c.tick(&hold, DT);
        assert_eq!(report.mode, LocomotionMode::Climbing);
        assert!(report.motion.y > 0.0);

        for _ in 0..5 {
            assert_eq!(c.tick(&hold, DT).mode, LocomotionMode::Climbing);
        }
        let report = c.tick(&forward(), DT);
        assert_eq!(report.mode, LocomotionMode::Aerial);
        assert_eq!(c.state().climber.phase(), ClimbPhase::Exiting);
    }

    #[test]
    fn stamina_budget_runs_out_mid_climb() {
        let world = stamina_world();
        let cfg = stamina_config();
        let mut c = controller(world, cfg.clone());
        let hold = LocomotionInput {
            grab_held: true,
            ..forward()
        };

        let mut climbing_time = 0.0;
        loop {
            let report = c.tick(&hold, DT);
            if report.mode == LocomotionMode::Climbing {
                climbing_time += DT;
            } else if report.previous_mode == LocomotionMode::Climbing {
                assert_eq!(report.mode, LocomotionMode::Aerial);
                break;
            }
            assert!(c.state().climber.budget() >= 0.0);
            assert!(climbing_time < cfg.stamina.max_climb_time + 0.2);
        }
        assert!(climbing_time + 1.0e-3 >= cfg.stamina.max_climb_time);
    }

    #[test]
    fn stamina_jump_off_the_wall_releases_the_climber() {
        let world = stamina_world();
        let mut c = controller(world, stamina_config());
        let hold = LocomotionInput {
            grab_held: true,
            ..forward()
        };
        c.tick(&hold, DT);
        c.tick(&hold, DT);
        assert_eq!(c.mode(), LocomotionMode::Climbing);

        let report = c.tick(
            &LocomotionInput {
                jump_pressed: true,
                ..hold
            },
            DT,
        );
        assert_eq!(report.mode, LocomotionMode::Aerial);
        assert_eq!(c.state().climber.phase(), ClimbPhase::Exiting);
    }

    #[test]
    fn stamina_exit_cooldown_elapses_during_a_vault() {
        let world = ScriptedWorld::on_floor()
            .with_ray(wall_below(2.5, 0.3))
            .with_sphere(|origin, _, dir, _| Some(hit_ahead(origin, dir, 0.3, 6)));
        let cfg = stamina_config();
        let mut c = controller(world, cfg.clone());
        let hold = LocomotionInput {
            grab_held: true,
            ..forward()
        };

        let mut vaulting = false;
        for _ in 0..60 {
            if c.tick(&hold, DT).mode == LocomotionMode::Vaulting {
                vaulting = true;
                break;
            }
        }
        assert!(vaulting, "never reached the top");
        assert_eq!(c.state().climber.phase(), ClimbPhase::Exiting);

        let mut elapsed = 0.0;
        while c.mode() == LocomotionMode::Vaulting {
            c.tick(&LocomotionInput::default(), DT);
            elapsed += DT;
            assert!(elapsed < 5.0);
        }
        assert!(elapsed > cfg.stamina.exit_cooldown);
        assert_eq!(c.state().climber.phase(), ClimbPhase::None);
    }

    #[test]
    fn decide_is_pure_over_its_inputs() {
        let cfg = LocomotionConfig::default();
        let state = LocomotionState::new(&cfg, true, LookState::default());
        let sensing = Sensing {
            pose: Pose::new(Point3::origin(), 0.0),
            raw_grounded: false,
            ground_verdict: Some(LocomotionMode::Aerial),
            climbable: Detection::NONE,
            ledge: Detection::NONE,
            top: Detection::NONE,
            stamina: None,
            vault: None,
        };
        let a = decide(&state, &sensing, &LocomotionInput::default(), &cfg);
        let b = decide(&state, &sensing, &LocomotionInput::default(), &cfg);
        assert_eq!(a, b);
        assert_eq!(a.next, LocomotionMode::Aerial);
    }

    #[test]
    fn degenerate_input_produces_zero_planar_motion() {
        let cfg = LocomotionConfig::default();
        let pose = Pose::new(Point3::origin(), 0.0);
        assert_eq!(planar_direction(&pose, Vec2::zeros()), Vec3::zeros());

        let decision = Decision {
            next: LocomotionMode::Climbing,
            vertical_velocity: 0.0,
            wall_normal: Some(Vec3::y()),
            jumped: false,
            vault_began: false,
        };
        let sensing = Sensing {
            pose,
            raw_grounded: false,
            ground_verdict: None,
            climbable: Detection::NONE,
            ledge: Detection::NONE,
            top: Detection::NONE,
            stamina: None,
            vault: None,
        };
        // A floor-like "wall" has no tangent frame: only the stick term remains.
        let v = compute_motion(&decision, &sensing, &forward(), &cfg, DT);
        assert!((v - Vec3::new(0.0, -cfg.climb_stick_speed, 0.0)).norm() < 1.0e-6);
    }

    mod rapier {
        use super::*;
        use crate::rapier_world::{
            CapsuleSpec, ColliderShapeDef, RapierCharacter, RapierQueryWorld, WorldStaticDef,
        };
        use nalgebra::Vector3;

        fn walled_world() -> RapierQueryWorld {
            RapierQueryWorld::build([
                WorldStaticDef::new(
                    1,
                    Vector3::zeros(),
                    ColliderShapeDef::Plane {
                        offset_along_normal: 0.0,
                    },
                ),
                WorldStaticDef::new(
                    2,
                    Vector3::new(0.0, 1.5, -2.25),
                    ColliderShapeDef::Cuboid {
                        half_extents: Vector3::new(2.0, 1.5, 0.25),
                    },
                ),
            ])
        }

        fn rapier_controller(base: Point3) -> LocomotionController<RapierCharacter, RecordingSink> {
            let character = RapierCharacter::new(walled_world(), CapsuleSpec::default(), base);
            LocomotionController::builder()
                .world(character)
                .animator(RecordingSink::default())
                .build()
                .expect("valid controller")
        }

        #[test]
        fn rests_on_the_ground_plane() {
            let mut c = rapier_controller(Point3::new(0.0, 0.0, 2.0));
            for _ in 0..60 {
                assert_eq!(c.tick(&LocomotionInput::default(), DT).mode, LocomotionMode::Grounded);
            }
            assert!(c.world().position().y.abs() < 0.05);
        }

        #[test]
        fn walks_up_to_the_wall_and_climbs_it() {
            let mut c = rapier_controller(Point3::new(0.0, 0.0, 0.0));
            let mut climbed = false;
            for _ in 0..120 {
                if c.tick(&forward(), DT).mode == LocomotionMode::Climbing {
                    climbed = true;
                    break;
                }
            }
            assert!(climbed);
            assert!(c.world().position().z > -2.0);

            let start_y = c.world().position().y;
            for _ in 0..10 {
                c.tick(&forward(), DT);
            }
            assert!(c.world().position().y > start_y);
        }
    }
}
