//! Ground-state filter.
//!
//! The physics engine's per-tick grounded flag flickers at step edges and ledges. The
//! filter turns it into stable Grounded <-> Aerial decisions and is the single place
//! that remembers the previous tick's raw contact (for landing edges).

use crate::controller::LocomotionMode;

/// Raw ground contact edge between the previous tick and this one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GroundEdge {
    pub landed: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundFilter {
    /// Raw contact recorded at the end of the previous tick.
    was_grounded: bool,
    /// How long the raw contact has been lost while Grounded (seconds).
    airborne_time: f32,
}

impl GroundFilter {
    pub fn new(was_grounded: bool) -> Self {
        Self {
            was_grounded,
            airborne_time: 0.0,
        }
    }

    pub fn was_grounded(&self) -> bool {
        self.was_grounded
    }

    /// Decide a Grounded <-> Aerial transition from the raw contact.
    ///
    /// Only Grounded and Aerial consult the filter; Climbing and Vaulting always get
    /// `None` no matter what the raw flag says. A Grounded character becomes Aerial once
    /// contact has been missing for longer than `grace` seconds.
    pub fn arbitrate(
        &mut self,
        mode: LocomotionMode,
        raw_grounded: bool,
        dt: f32,
        grace: f32,
    ) -> Option<LocomotionMode> {
        match mode {
            LocomotionMode::Grounded if raw_grounded => {
                self.airborne_time = 0.0;
                None
            }
            LocomotionMode::Grounded => {
                self.airborne_time += dt.max(0.0);
                (self.airborne_time > grace || grace <= 0.0).then_some(LocomotionMode::Aerial)
            }
            LocomotionMode::Aerial => {
                self.airborne_time = 0.0;
                raw_grounded.then_some(LocomotionMode::Grounded)
            }
            LocomotionMode::Climbing | LocomotionMode::Vaulting => {
                self.airborne_time = 0.0;
                None
            }
        }
    }

    /// Record this tick's raw contact and report its edges. Call once, at tick end.
    pub fn observe(&mut self, raw_grounded: bool) -> GroundEdge {
        let edge = GroundEdge {
            landed: !self.was_grounded && raw_grounded,
        };
        self.was_grounded = raw_grounded;
        edge
    }

    /// A jump leaves the ground by definition; the next contact is a landing.
    pub fn mark_airborne(&mut self) {
        self.was_grounded = false;
        self.airborne_time = 0.0;
    }
}

impl Default for GroundFilter {
    fn default() -> Self {
        Self::new(true)
    }
}
