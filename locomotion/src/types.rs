/*!
Core locomotion types and math aliases shared by the controller submodules.

This module intentionally contains no algorithms beyond small vector helpers. It
defines the data exchanged between:
- the physics collaborator (ray/sphere casts, move, pose)
- the ground filter and wall/ledge detector
- the locomotion state machine and vault sequencer
- the stamina climb variant

Conventions
- Units are meters, seconds and degrees (angles in config) / radians (math).
- World up is +Y. At yaw 0 the character faces -Z, its right is +X.
*/

use nalgebra as na;

/// Common math aliases for clarity and consistency.
pub type Vec3 = na::Vector3<f32>;
pub type Vec2 = na::Vector2<f32>;
pub type Point3 = na::Point3<f32>;
pub type Quat = na::UnitQuaternion<f32>;

/// Stable identity of a static surface (the id of the world static it belongs to).
pub type SurfaceId = u64;

/// World up axis.
#[inline]
pub fn world_up() -> Vec3 {
    Vec3::y()
}

/// Normalize `v`, or return zero for near zero-length input.
#[inline]
pub fn normalize_or_zero(v: Vec3) -> Vec3 {
    v.try_normalize(1.0e-6).unwrap_or_else(Vec3::zeros)
}

/// Unsigned angle between two vectors in degrees; 0 for degenerate input.
#[inline]
pub fn angle_deg(a: &Vec3, b: &Vec3) -> f32 {
    let denom = a.norm() * b.norm();
    if denom <= 1.0e-12 {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Bitmask of collision layers a query may hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const ALL: Self = Self(u32::MAX);
    pub const NONE: Self = Self(0);

    #[inline]
    pub fn contains_any(self, layers: u32) -> bool {
        self.0 & layers != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// A single hit returned by a directional or volumetric probe.
///
/// Probes return `Option<SurfaceHit>`; `None` is the ordinary "nothing there" branch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceHit {
    /// World-space contact point.
    pub point: Point3,
    /// World-space unit surface normal at the contact.
    pub normal: Vec3,
    /// Identity of the surface that was hit.
    pub surface: SurfaceId,
    /// Distance travelled along the cast direction before the hit (meters).
    pub distance: f32,
}

/// Character pose used to orient probes: base position (feet) and yaw-only facing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub position: Point3,
    pub yaw: f32,
}

impl Pose {
    #[inline]
    pub fn new(position: Point3, yaw: f32) -> Self {
        Self { position, yaw }
    }

    /// Planar facing direction.
    #[inline]
    pub fn forward(&self) -> Vec3 {
        Vec3::new(-self.yaw.sin(), 0.0, -self.yaw.cos())
    }

    /// Planar right-hand direction.
    #[inline]
    pub fn right(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, -self.yaw.sin())
    }

    /// Head/eye position `eye_height` above the base.
    #[inline]
    pub fn head(&self, eye_height: f32) -> Point3 {
        self.position + world_up() * eye_height
    }

    /// Yaw-only rotation about +Y.
    #[inline]
    pub fn rotation(&self) -> Quat {
        Quat::from_axis_angle(&Vec3::y_axis(), self.yaw)
    }
}

/// Orthonormal tangent frame of a wall, derived from its outward normal.
///
/// `right` is the character's right while facing the wall, `up` runs along the wall
/// surface. Both are zero when the normal is parallel to world up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallFrame {
    pub right: Vec3,
    pub up: Vec3,
}

impl WallFrame {
    pub fn from_normal(normal: &Vec3) -> Self {
        let right = normalize_or_zero(world_up().cross(normal));
        let up = normalize_or_zero(normal.cross(&right));
        Self { right, up }
    }

    /// Climb velocity for `axis` (x = horizontal, y = vertical), normalized and scaled.
    #[inline]
    pub fn climb_velocity(&self, axis: Vec2, speed: f32) -> Vec3 {
        normalize_or_zero(self.right * axis.x + self.up * axis.y) * speed
    }
}
