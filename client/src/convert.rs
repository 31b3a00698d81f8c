//! Conversions between the locomotion crate's nalgebra types and Bevy's glam types.

use bevy::math::{Quat, Vec2, Vec3};
use nalgebra as na;

pub fn to_bevy_point(p: &na::Point3<f32>) -> Vec3 {
    Vec3::new(p.x, p.y, p.z)
}

pub fn to_bevy_vec3(v: &na::Vector3<f32>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

pub fn to_bevy_quat(q: &na::UnitQuaternion<f32>) -> Quat {
    Quat::from_xyzw(q.i, q.j, q.k, q.w)
}

pub fn to_na_vec2(v: Vec2) -> na::Vector2<f32> {
    na::Vector2::new(v.x, v.y)
}
