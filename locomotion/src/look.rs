//! First-person look state: body yaw and view pitch.

use crate::types::{Point3, Pose, Quat, Vec2, Vec3};

/// Accumulated look angles (degrees).
///
/// Yaw is unbounded and turns the whole character; pitch only tilts the view and stays
/// within the configured symmetric limit.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LookState {
    pub yaw_deg: f32,
    pub pitch_deg: f32,
}

impl LookState {
    pub fn new(yaw_deg: f32, pitch_deg: f32) -> Self {
        Self { yaw_deg, pitch_deg }
    }

    /// Integrate one tick of look input. Positive `axis.x` turns right, positive
    /// `axis.y` looks up.
    pub fn apply(&mut self, axis: Vec2, sensitivity: f32, pitch_limit: f32) {
        let limit = pitch_limit.abs();
        self.yaw_deg -= axis.x * sensitivity;
        self.pitch_deg = (self.pitch_deg + axis.y * sensitivity).clamp(-limit, limit);
    }

    #[inline]
    pub fn yaw(&self) -> f32 {
        self.yaw_deg.to_radians()
    }

    #[inline]
    pub fn pitch(&self) -> f32 {
        self.pitch_deg.to_radians()
    }

    /// Yaw-only body rotation.
    pub fn facing(&self) -> Quat {
        Quat::from_axis_angle(&Vec3::y_axis(), self.yaw())
    }

    /// Planar facing direction for the current yaw.
    pub fn forward(&self) -> Vec3 {
        Pose::new(Point3::origin(), self.yaw()).forward()
    }

    pub fn right(&self) -> Vec3 {
        Pose::new(Point3::origin(), self.yaw()).right()
    }

    /// Local view tilt applied under the body rotation.
    pub fn view_tilt(&self) -> Quat {
        Quat::from_axis_angle(&Vec3::x_axis(), self.pitch())
    }
}
