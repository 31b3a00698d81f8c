/*!
Locomotion controller settings and tolerances.

These structures centralize the parameters used by the state machine, the wall/ledge
detector, the vault sequencer and the stamina climb variant. Keeping them together
makes tuning easier and keeps the per-tick code free of magic numbers.

Notes
- Distances are in meters, time in seconds, angles in degrees.
- Every value is externally supplied; the defaults are the tuning the controller was
  first shipped with, not values that are correct for every game.
- Load overrides from RON with [`LocomotionConfig::from_ron_str`] and always run
  [`LocomotionConfig::validate`] before the first tick (the builder does this).
*/

use ron::Options;
use serde::Deserialize;

use crate::{LocomotionError, types::LayerMask};

/// Input axis magnitude below which an axis counts as released.
pub const AXIS_DEADZONE: f32 = 1.0e-3;

/// Which wall-climb design drives the state machine's `Climbing` mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub enum ClimbStyle {
    /// Push forward into a climbable wall to attach, jump to detach.
    #[default]
    HoldToClimb,
    /// Hold grab while facing a wall; limited by a time budget and an exit cooldown.
    Stamina,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    pub walk_speed: f32,
    pub run_speed: f32,
    /// Degrees of rotation per unit of look input.
    pub look_sensitivity: f32,
    /// Symmetric pitch clamp (degrees).
    pub look_pitch_limit: f32,
    /// Upward velocity applied on jump (m/s).
    pub jump_speed: f32,
    /// Downward acceleration magnitude (m/s^2).
    pub gravity: f32,
    /// Fraction of walk speed available while airborne.
    pub air_control: f32,
    /// Seconds the raw ground contact may be lost before Grounded yields to Aerial.
    /// Zero switches on the first airborne reading.
    pub ground_grace_time: f32,
    pub climb_speed: f32,
    /// Velocity pressing the climber into the wall while Climbing.
    pub climb_stick_speed: f32,
    /// Minimum angle between a surface normal and world up for it to count as climbable.
    pub climbable_angle: f32,
    /// Value published as `Speed` while sprinting on the ground.
    pub sprint_anim_speed: f32,
    pub climb_style: ClimbStyle,
    pub probe: ProbeConfig,
    pub vault: VaultConfig,
    pub stamina: StaminaClimbConfig,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            walk_speed: 4.0,
            run_speed: 8.0,
            look_sensitivity: 2.0,
            look_pitch_limit: 70.0,
            jump_speed: 7.0,
            gravity: 25.0,
            air_control: 0.5,
            ground_grace_time: 0.0,
            climb_speed: 3.0,
            climb_stick_speed: 0.1,
            climbable_angle: 80.0,
            sprint_anim_speed: 2.0,
            climb_style: ClimbStyle::default(),
            probe: ProbeConfig::default(),
            vault: VaultConfig::default(),
            stamina: StaminaClimbConfig::default(),
        }
    }
}

/// Geometry of the wall/ledge probes, relative to the character base.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Height of the head probe origin above the character base.
    pub eye_height: f32,
    /// Lift of the climbable-surface probe above the base, keeping it clear of the floor.
    pub base_clearance: f32,
    /// Reach of the forward probes (climbable wall, ledge, top of wall).
    pub forward_length: f32,
    /// Layers that count as climbable walls.
    pub climbable_layers: LayerMask,
    /// Layers the downward clearance/landing probes may hit.
    pub ground_layers: LayerMask,
    /// How far past the wall face the ledge clearance probe starts.
    pub ledge_nudge: f32,
    /// How far above the wall hit the ledge clearance probe starts.
    pub ledge_rise: f32,
    /// Reach of the downward ledge clearance probe.
    pub ledge_depth: f32,
    /// Height above the head of the top-of-wall probe origin.
    pub top_rise: f32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            eye_height: 1.6,
            base_clearance: 0.1,
            forward_length: 1.0,
            climbable_layers: LayerMask::ALL,
            ground_layers: LayerMask::ALL,
            ledge_nudge: 0.1,
            ledge_rise: 0.5,
            ledge_depth: 1.0,
            top_rise: 0.5,
        }
    }
}

/// Timing and landing probe of the vault sequencer.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// Hold before the character starts moving (animation head start).
    pub start_delay: f32,
    /// Travel time from start to end point.
    pub duration: f32,
    /// Forward offset of the landing probe origin.
    pub landing_forward: f32,
    /// Height of the landing probe origin above the character base.
    pub landing_rise: f32,
    /// Reach of the downward landing probe.
    pub landing_depth: f32,
    /// Forward offset used as end point when the landing probe finds nothing.
    pub fallback_forward: f32,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            start_delay: 0.1,
            duration: 0.8,
            landing_forward: 1.0,
            landing_rise: 2.0,
            landing_depth: 3.0,
            fallback_forward: 1.0,
        }
    }
}

/// Tuning of the stamina-budgeted climb variant.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct StaminaClimbConfig {
    pub climb_speed: f32,
    /// Seconds of climbing granted per wall.
    pub max_climb_time: f32,
    /// Radius of the forward wall sphere cast.
    pub sphere_radius: f32,
    /// Reach of the forward wall sphere cast.
    pub detection_length: f32,
    /// Height of the sphere cast origin above the character base.
    pub probe_height: f32,
    /// Largest angle between facing and the wall (degrees) that still allows climbing.
    pub max_wall_look_angle: f32,
    /// Normal change (degrees) beyond which the same surface counts as a new wall.
    pub min_wall_normal_angle_change: f32,
    /// Cooldown after leaving a wall before the next grab is allowed.
    pub exit_cooldown: f32,
    pub wall_layers: LayerMask,
}

impl Default for StaminaClimbConfig {
    fn default() -> Self {
        Self {
            climb_speed: 3.0,
            max_climb_time: 0.75,
            sphere_radius: 0.25,
            detection_length: 0.7,
            probe_height: 0.9,
            max_wall_look_angle: 30.0,
            min_wall_normal_angle_change: 5.0,
            exit_cooldown: 0.2,
            wall_layers: LayerMask::ALL,
        }
    }
}

/// RON options with implicit `Some` so optional fields can be written bare.
fn ron_options() -> Options {
    Options::default().with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
}

fn non_negative(field: &'static str, value: f32) -> Result<(), LocomotionError> {
    if !value.is_finite() || value < 0.0 {
        return Err(LocomotionError::InvalidConfig {
            field,
            reason: format!("must be a finite, non-negative number (got {value})"),
        });
    }
    Ok(())
}

fn positive(field: &'static str, value: f32) -> Result<(), LocomotionError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(LocomotionError::InvalidConfig {
            field,
            reason: format!("must be a finite, positive number (got {value})"),
        });
    }
    Ok(())
}

fn angle(field: &'static str, value: f32, max: f32) -> Result<(), LocomotionError> {
    non_negative(field, value)?;
    if value > max {
        return Err(LocomotionError::InvalidConfig {
            field,
            reason: format!("must be at most {max} degrees (got {value})"),
        });
    }
    Ok(())
}

impl LocomotionConfig {
    /// Parse a config from RON. Missing fields keep their defaults.
    pub fn from_ron_str(s: &str) -> Result<Self, LocomotionError> {
        Ok(ron_options().from_str(s)?)
    }

    /// Reject values that would make the per-tick math meaningless.
    pub fn validate(&self) -> Result<(), LocomotionError> {
        non_negative("walk_speed", self.walk_speed)?;
        non_negative("run_speed", self.run_speed)?;
        non_negative("look_sensitivity", self.look_sensitivity)?;
        angle("look_pitch_limit", self.look_pitch_limit, 90.0)?;
        non_negative("jump_speed", self.jump_speed)?;
        non_negative("gravity", self.gravity)?;
        non_negative("air_control", self.air_control)?;
        non_negative("ground_grace_time", self.ground_grace_time)?;
        non_negative("climb_speed", self.climb_speed)?;
        non_negative("climb_stick_speed", self.climb_stick_speed)?;
        angle("climbable_angle", self.climbable_angle, 180.0)?;
        non_negative("sprint_anim_speed", self.sprint_anim_speed)?;

        let p = &self.probe;
        non_negative("probe.eye_height", p.eye_height)?;
        non_negative("probe.base_clearance", p.base_clearance)?;
        positive("probe.forward_length", p.forward_length)?;
        non_negative("probe.ledge_nudge", p.ledge_nudge)?;
        non_negative("probe.ledge_rise", p.ledge_rise)?;
        positive("probe.ledge_depth", p.ledge_depth)?;
        non_negative("probe.top_rise", p.top_rise)?;

        let v = &self.vault;
        non_negative("vault.start_delay", v.start_delay)?;
        positive("vault.duration", v.duration)?;
        non_negative("vault.landing_forward", v.landing_forward)?;
        non_negative("vault.landing_rise", v.landing_rise)?;
        positive("vault.landing_depth", v.landing_depth)?;
        non_negative("vault.fallback_forward", v.fallback_forward)?;

        let s = &self.stamina;
        non_negative("stamina.climb_speed", s.climb_speed)?;
        non_negative("stamina.max_climb_time", s.max_climb_time)?;
        non_negative("stamina.sphere_radius", s.sphere_radius)?;
        positive("stamina.detection_length", s.detection_length)?;
        non_negative("stamina.probe_height", s.probe_height)?;
        angle("stamina.max_wall_look_angle", s.max_wall_look_angle, 180.0)?;
        angle(
            "stamina.min_wall_normal_angle_change",
            s.min_wall_normal_angle_change,
            180.0,
        )?;
        non_negative("stamina.exit_cooldown", s.exit_cooldown)?;

        Ok(())
    }
}
