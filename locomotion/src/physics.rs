//! Collaborator contract for the physics/collision engine.
//!
//! The controller never owns collision geometry. Everything it needs from the world is
//! expressed here: a grounded query, directional and volumetric casts, a collide-and-slide
//! move primitive and the character pose it moves. [`crate::rapier_world::RapierCharacter`]
//! is the Rapier-backed implementation; tests use a scripted double.

use crate::types::{LayerMask, Point3, SurfaceHit, Vec3};

pub trait PhysicsWorld {
    /// Raw ground contact as reported by the last move. Noisy at step edges.
    fn is_grounded(&self) -> bool;

    /// Cast a ray from `origin` along `dir` (need not be normalized) up to `max_distance`.
    fn cast_ray(
        &self,
        origin: Point3,
        dir: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SurfaceHit>;

    /// Sweep a sphere of `radius` from `origin` along `dir` up to `max_distance`.
    fn cast_sphere(
        &self,
        origin: Point3,
        radius: f32,
        dir: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SurfaceHit>;

    /// Move the character by `displacement`, respecting collision.
    fn move_by(&mut self, displacement: Vec3);

    /// Character base position (feet).
    fn position(&self) -> Point3;

    /// Place the character base at `position` without collision (scripted motion).
    fn teleport(&mut self, position: Point3);
}

impl<W: PhysicsWorld + ?Sized> PhysicsWorld for Box<W> {
    fn is_grounded(&self) -> bool {
        (**self).is_grounded()
    }

    fn cast_ray(
        &self,
        origin: Point3,
        dir: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SurfaceHit> {
        (**self).cast_ray(origin, dir, max_distance, mask)
    }

    fn cast_sphere(
        &self,
        origin: Point3,
        radius: f32,
        dir: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SurfaceHit> {
        (**self).cast_sphere(origin, radius, dir, max_distance, mask)
    }

    fn move_by(&mut self, displacement: Vec3) {
        (**self).move_by(displacement)
    }

    fn position(&self) -> Point3 {
        (**self).position()
    }

    fn teleport(&mut self, position: Point3) {
        (**self).teleport(position)
    }
}
