//! Rapier-based query world and character body for immutable/static world geometry.
//!
//! This module is the concrete physics collaborator of the controller: it builds an
//! in-memory Rapier scene from a set of static collider definitions and drives a
//! capsule through it with Rapier's `KinematicCharacterController`.
//!
//! Design goals
//! - Deterministic: given the same inputs (sorted by `id`), build identical in-memory sets.
//! - Query-focused: supports ray/shape casts and the Rapier KCC, no dynamics.
//! - Immutable world: this builder assumes statics do not move after construction.

// Re-export Rapier so the client can use Rapier types without depending on
// `rapier3d` directly.
pub use rapier3d;

use rapier3d::{
    control::{CharacterAutostep, CharacterLength, KinematicCharacterController},
    na::{Isometry3, Translation3, UnitQuaternion},
    parry::query::ShapeCastOptions,
    prelude::*,
};

use crate::{
    physics::PhysicsWorld,
    surface::{pack_surface, unpack_surface_id, unpack_surface_layers},
    types::{LayerMask, Point3, SurfaceHit, Vec3, normalize_or_zero},
};

/// Canonical, schema-agnostic definition of an immutable world collider.
///
/// Conventions
/// - Units are meters.
/// - Rotation is a unit quaternion.
/// - For planes, we use a pose-derived normal: `normal = rotation * +Y`,
///   and compute `dist = dot(normal, translation) + offset_along_normal`.
#[derive(Clone, Debug)]
pub struct WorldStaticDef {
    /// Stable unique identifier; doubles as the probe surface identity.
    pub id: u64,
    /// World-space translation.
    pub translation: Vector<f32>,
    /// World-space rotation (unit quaternion).
    pub rotation: UnitQuaternion<f32>,
    /// Collider shape parameters.
    pub shape: ColliderShapeDef,
    /// Collision layers this static is a member of (see [`LayerMask`]).
    pub layers: u32,
}

impl WorldStaticDef {
    /// Axis-aligned static on layer 1.
    pub fn new(id: u64, translation: Vector<f32>, shape: ColliderShapeDef) -> Self {
        Self {
            id,
            translation,
            rotation: UnitQuaternion::identity(),
            shape,
            layers: 1,
        }
    }

    pub fn with_rotation(mut self, rotation: UnitQuaternion<f32>) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_layers(mut self, layers: u32) -> Self {
        self.layers = layers;
        self
    }
}

/// Supported static collider shapes.
///
/// Keep this intentionally small and deterministic. Extend as needed.
#[derive(Clone, Debug)]
pub enum ColliderShapeDef {
    /// Infinite plane (half-space).
    ///
    /// The plane normal is derived from the pose as `rotation * +Y`.
    Plane {
        /// Offset along the plane normal (meters).
        offset_along_normal: f32,
    },

    /// Oriented cuboid with given half-extents (meters).
    Cuboid { half_extents: Vector<f32> },

    /// Sphere/ball (meters).
    Sphere { radius: f32 },

    /// Y-aligned capsule (meters).
    CapsuleY { radius: f32, half_height: f32 },

    /// Y-aligned cylinder (meters).
    CylinderY { radius: f32, half_height: f32 },

    /// Y-aligned cone (meters).
    ConeY { radius: f32, half_height: f32 },

    /// Rounded cuboid (meters).
    ///
    /// `border_radius` rounds all edges/corners.
    RoundCuboid {
        half_extents: Vector<f32>,
        border_radius: f32,
    },
}

/// Build a Rapier collider from a `WorldStaticDef`.
///
/// The collider carries its own world pose (no parent body) and a packed surface tag
/// in `user_data`.
fn collider_from_def(def: &WorldStaticDef) -> Collider {
    let tag = pack_surface(def.id, def.layers);
    let iso = Isometry3::from_parts(Translation3::from(def.translation), def.rotation);

    match &def.shape {
        ColliderShapeDef::Plane {
            offset_along_normal,
        } => {
            // Derive world-space plane normal from pose rotation: n = R * +Y.
            // Then compute plane dist: n ⋅ x = dist, where x is any point on the plane.
            let n = def.rotation * Vector::y();
            let dist = n.dot(&def.translation) + *offset_along_normal;
            let unit_n = UnitVector::new_normalize(n);

            // Represent the plane `unit_n ⋅ x = dist` by placing the half-space at `unit_n * dist`.
            ColliderBuilder::new(SharedShape::new(HalfSpace::new(unit_n)))
                .translation(unit_n.into_inner() * dist)
                .user_data(tag)
                .build()
        }

        ColliderShapeDef::Cuboid { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
                .position(iso)
                .user_data(tag)
                .build()
        }

        ColliderShapeDef::Sphere { radius } => ColliderBuilder::ball(*radius)
            .position(iso)
            .user_data(tag)
            .build(),

        ColliderShapeDef::CapsuleY {
            radius,
            half_height,
        } => ColliderBuilder::capsule_y(*half_height, *radius)
            .position(iso)
            .user_data(tag)
            .build(),

        ColliderShapeDef::CylinderY {
            radius,
            half_height,
        } => ColliderBuilder::cylinder(*half_height, *radius)
            .position(iso)
            .user_data(tag)
            .build(),

        ColliderShapeDef::ConeY {
            radius,
            half_height,
        } => ColliderBuilder::cone(*half_height, *radius)
            .position(iso)
            .user_data(tag)
            .build(),

        ColliderShapeDef::RoundCuboid {
            half_extents,
            border_radius,
        } => ColliderBuilder::round_cuboid(
            half_extents.x,
            half_extents.y,
            half_extents.z,
            *border_radius,
        )
        .position(iso)
        .user_data(tag)
        .build(),
    }
}

/// In-memory Rapier structures needed for scene queries and KCC against a static world.
///
/// For immutable statics, these can be built once at startup and reused.
pub struct RapierQueryWorld {
    bodies: RigidBodySet,
    colliders: ColliderSet,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
}

impl RapierQueryWorld {
    /// Build a query world from a list of static collider definitions.
    ///
    /// Determinism
    /// - The input is sorted by `id` before insertion.
    /// - Any NaN/invalid values should be filtered/validated by the caller.
    pub fn build(defs: impl IntoIterator<Item = WorldStaticDef>) -> Self {
        let mut defs: Vec<_> = defs.into_iter().collect();
        defs.sort_by_key(|d| d.id);

        let bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();
        let mut modified_colliders = Vec::with_capacity(defs.len());

        for def in &defs {
            modified_colliders.push(colliders.insert(collider_from_def(def)));
        }

        // Only the broad-phase BVH is needed for queries; no contact graph.
        let mut broad_phase = BroadPhaseBvh::new();
        let mut events = Vec::new();
        broad_phase.update(
            &IntegrationParameters::default(),
            &colliders,
            &bodies,
            &modified_colliders,
            &[],
            &mut events,
        );

        log::debug!("built rapier query world with {} statics", defs.len());

        Self {
            bodies,
            colliders,
            broad_phase,
            narrow_phase: NarrowPhase::default(),
        }
    }

    /// Number of static colliders in the world.
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Create a borrowed `QueryPipeline` view suitable for scene queries and KCC.
    pub fn query_pipeline<'a>(&'a self, filter: QueryFilter<'a>) -> QueryPipeline<'a> {
        self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            filter,
        )
    }

    fn surface_of(&self, handle: ColliderHandle) -> u64 {
        self.colliders
            .get(handle)
            .map(|co| unpack_surface_id(co.user_data))
            .unwrap_or_default()
    }

    /// Cast a ray against statics whose layers intersect `mask`.
    pub fn cast_ray(
        &self,
        origin: Point3,
        dir: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SurfaceHit> {
        let dir = normalize_or_zero(dir);
        if dir == Vec3::zeros() || max_distance <= 0.0 {
            return None;
        }

        let layer_filter =
            |_: ColliderHandle, co: &Collider| mask.contains_any(unpack_surface_layers(co.user_data));
        let pipeline = self.query_pipeline(QueryFilter::default().predicate(&layer_filter));

        let ray = Ray::new(origin, dir);
        let (handle, hit) = pipeline.cast_ray_and_get_normal(&ray, max_distance, true)?;

        Some(SurfaceHit {
            point: ray.point_at(hit.time_of_impact),
            normal: hit.normal,
            surface: self.surface_of(handle),
            distance: hit.time_of_impact,
        })
    }

    /// Sweep a ball against statics whose layers intersect `mask`.
    ///
    /// The contact point and normal are recovered by projecting the ball center at impact
    /// onto the hit collider, which keeps them in world space.
    pub fn cast_sphere(
        &self,
        origin: Point3,
        radius: f32,
        dir: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SurfaceHit> {
        let dir = normalize_or_zero(dir);
        if dir == Vec3::zeros() || max_distance <= 0.0 {
            return None;
        }

        let layer_filter =
            |_: ColliderHandle, co: &Collider| mask.contains_any(unpack_surface_layers(co.user_data));
        let pipeline = self.query_pipeline(QueryFilter::default().predicate(&layer_filter));

        let ball = Ball::new(radius.max(0.0));
        let pos = Isometry3::translation(origin.x, origin.y, origin.z);
        let options = ShapeCastOptions::with_max_time_of_impact(max_distance);
        let (handle, hit) = pipeline.cast_shape(&pos, &dir, &ball, options)?;

        let center = origin + dir * hit.time_of_impact;
        let co = self.colliders.get(handle)?;
        let projection = co.shape().project_point(co.position(), &center, true);
        let normal = {
            let n = normalize_or_zero(center - projection.point);
            if projection.is_inside || n == Vec3::zeros() {
                -dir
            } else {
                n
            }
        };

        Some(SurfaceHit {
            point: projection.point,
            normal,
            surface: unpack_surface_id(co.user_data),
            distance: hit.time_of_impact,
        })
    }
}

/// Capsule specification for the character body.
///
/// half_height is the half-length of the cylinder section (aligned with +Y),
/// so the total capsule height is 2*half_height + 2*radius.
#[derive(Clone, Copy, Debug)]
pub struct CapsuleSpec {
    pub radius: f32,
    pub half_height: f32,
}

impl CapsuleSpec {
    /// Distance from the capsule center down to its lowest point.
    #[inline]
    pub fn base_offset(&self) -> f32 {
        self.half_height + self.radius
    }
}

impl Default for CapsuleSpec {
    fn default() -> Self {
        Self {
            radius: 0.3,
            half_height: 0.6,
        }
    }
}

/// Extra reach of the grounded probe below the capsule (meters).
const GROUND_PROBE_DISTANCE: f32 = 0.05;

/// A capsule character living in a [`RapierQueryWorld`].
///
/// Implements [`PhysicsWorld`]: casts go straight to the query world, `move_by` runs the
/// Rapier KCC and records its grounded flag for the next `is_grounded` query.
pub struct RapierCharacter {
    world: RapierQueryWorld,
    kcc: KinematicCharacterController,
    capsule: CapsuleSpec,
    /// Capsule center (world space).
    center: Vec3,
    grounded: bool,
    /// Step length handed to the KCC (seconds); only used for its internal velocity math.
    step_dt: f32,
}

impl RapierCharacter {
    /// Place a capsule with its base at `base` and probe for initial ground contact.
    pub fn new(world: RapierQueryWorld, capsule: CapsuleSpec, base: Point3) -> Self {
        let kcc = KinematicCharacterController {
            autostep: Some(CharacterAutostep {
                include_dynamic_bodies: false,
                max_height: CharacterLength::Relative(0.4),
                ..CharacterAutostep::default()
            }),
            offset: CharacterLength::Relative(0.025),
            ..KinematicCharacterController::default()
        };

        let mut character = Self {
            world,
            kcc,
            capsule,
            center: base.coords + Vec3::y() * capsule.base_offset(),
            grounded: false,
            step_dt: 1.0 / 60.0,
        };
        character.grounded = character.probe_ground();
        character
    }

    pub fn set_step_dt(&mut self, dt: f32) {
        self.step_dt = dt.max(f32::EPSILON);
    }

    pub fn capsule(&self) -> CapsuleSpec {
        self.capsule
    }

    pub fn query_world(&self) -> &RapierQueryWorld {
        &self.world
    }

    fn shape(&self) -> Capsule {
        Capsule::new_y(self.capsule.half_height, self.capsule.radius)
    }

    fn iso(&self) -> Isometry3<f32> {
        Isometry3::translation(self.center.x, self.center.y, self.center.z)
    }

    /// Short downward capsule sweep; counts touching or penetrating contact as ground.
    fn probe_ground(&self) -> bool {
        let pipeline = self.world.query_pipeline(QueryFilter::default());
        let options = ShapeCastOptions::with_max_time_of_impact(GROUND_PROBE_DISTANCE);
        pipeline
            .cast_shape(&self.iso(), &(-Vector::y()), &self.shape(), options)
            .is_some()
    }
}

impl PhysicsWorld for RapierCharacter {
    fn is_grounded(&self) -> bool {
        self.grounded
    }

    fn cast_ray(
        &self,
        origin: Point3,
        dir: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SurfaceHit> {
        self.world.cast_ray(origin, dir, max_distance, mask)
    }

    fn cast_sphere(
        &self,
        origin: Point3,
        radius: f32,
        dir: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SurfaceHit> {
        self.world.cast_sphere(origin, radius, dir, max_distance, mask)
    }

    fn move_by(&mut self, displacement: Vec3) {
        let pipeline = self.world.query_pipeline(QueryFilter::default());
        let correction = self.kcc.move_shape(
            self.step_dt,
            &pipeline,
            &self.shape(),
            &self.iso(),
            displacement,
            |_| {},
        );

        self.center += correction.translation;
        // The KCC only reports ground it was pushed against; resting contact after a
        // level or downward move is confirmed with the probe.
        self.grounded = correction.grounded || (displacement.y <= 0.0 && self.probe_ground());
    }

    fn position(&self) -> Point3 {
        Point3::from(self.center - Vec3::y() * self.capsule.base_offset())
    }

    fn teleport(&mut self, position: Point3) {
        self.center = position.coords + Vec3::y() * self.capsule.base_offset();
        self.grounded = self.probe_ground();
    }
}
