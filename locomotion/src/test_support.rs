//! Scripted physics double shared by the unit tests.

use crate::{
    physics::PhysicsWorld,
    types::{LayerMask, Point3, SurfaceHit, SurfaceId, Vec3},
};

type RayScript = Box<dyn Fn(Point3, Vec3, f32) -> Option<SurfaceHit>>;
type SphereScript = Box<dyn Fn(Point3, f32, Vec3, f32) -> Option<SurfaceHit>>;

/// A character on an optional flat floor with scripted cast results.
///
/// `move_by` integrates freely but never sinks below the floor; the grounded flag is
/// whether the base rests on it. Casts answer from the installed closures (no hit by
/// default) and every call is recorded for assertions.
pub struct ScriptedWorld {
    pub position: Point3,
    pub floor: Option<f32>,
    pub moves: Vec<Vec3>,
    pub teleports: Vec<Point3>,
    ray: RayScript,
    sphere: SphereScript,
}

impl ScriptedWorld {
    pub fn on_floor() -> Self {
        Self::new(Point3::origin(), Some(0.0))
    }

    pub fn floating_at(position: Point3) -> Self {
        Self::new(position, None)
    }

    pub fn new(position: Point3, floor: Option<f32>) -> Self {
        Self {
            position,
            floor,
            moves: Vec::new(),
            teleports: Vec::new(),
            ray: Box::new(|_, _, _| None),
            sphere: Box::new(|_, _, _, _| None),
        }
    }

    pub fn with_ray(mut self, f: impl Fn(Point3, Vec3, f32) -> Option<SurfaceHit> + 'static) -> Self {
        self.ray = Box::new(f);
        self
    }

    pub fn with_sphere(
        mut self,
        f: impl Fn(Point3, f32, Vec3, f32) -> Option<SurfaceHit> + 'static,
    ) -> Self {
        self.sphere = Box::new(f);
        self
    }
}

impl PhysicsWorld for ScriptedWorld {
    fn is_grounded(&self) -> bool {
        self.floor
            .is_some_and(|floor| self.position.y <= floor + 1.0e-4)
    }

    fn cast_ray(&self, origin: Point3, dir: Vec3, max_distance: f32, _: LayerMask) -> Option<SurfaceHit> {
        (self.ray)(origin, dir, max_distance).filter(|hit| hit.distance <= max_distance)
    }

    fn cast_sphere(
        &self,
        origin: Point3,
        radius: f32,
        dir: Vec3,
        max_distance: f32,
        _: LayerMask,
    ) -> Option<SurfaceHit> {
        (self.sphere)(origin, radius, dir, max_distance).filter(|hit| hit.distance <= max_distance)
    }

    fn move_by(&mut self, displacement: Vec3) {
        self.moves.push(displacement);
        self.position += displacement;
        if let Some(floor) = self.floor {
            self.position.y = self.position.y.max(floor);
        }
    }

    fn position(&self) -> Point3 {
        self.position
    }

    fn teleport(&mut self, position: Point3) {
        self.teleports.push(position);
        self.position = position;
    }
}

/// A hit `distance` along `dir` from `origin` on a surface facing back at the caster.
pub fn hit_ahead(origin: Point3, dir: Vec3, distance: f32, surface: SurfaceId) -> SurfaceHit {
    let dir = dir.normalize();
    SurfaceHit {
        point: origin + dir * distance,
        normal: -dir,
        surface,
        distance,
    }
}

/// Is `dir` (roughly) straight down?
pub fn is_down(dir: &Vec3) -> bool {
    dir.normalize().y < -0.99
}

/// Is `dir` (roughly) horizontal?
pub fn is_level(dir: &Vec3) -> bool {
    dir.normalize().y.abs() < 1.0e-3
}
