use cgmath::{InnerSpace, Vector3};
use engine::physics_log;
use rapier3d::prelude::*;

use super::util::{npoint_to_cgvec, vec_to_npoint, vec_to_nvec};
use super::{RayCaster, RayHit, SurfaceClassifier, SurfaceFlags, SurfaceId};

struct Surface {
    name: String,
    flags: SurfaceFlags,
    collider: ColliderHandle,
}

/// Static scene geometry backed by rapier colliders, queried with rays.
///
/// Surfaces are axis-aligned cuboids. After adding surfaces or changing their
/// flags call [`update`](Self::update) before querying.
pub struct PhysicsWorld {
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    query_pipeline: QueryPipeline,
    surfaces: Vec<Surface>,
    is_stale: bool,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    pub fn new() -> PhysicsWorld {
        PhysicsWorld {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            query_pipeline: QueryPipeline::new(),
            surfaces: Vec::new(),
            is_stale: false,
        }
    }

    /// Add a static box centered at `center`.
    pub fn add_surface(
        &mut self,
        name: &str,
        center: Vector3<f32>,
        half_extents: Vector3<f32>,
        flags: SurfaceFlags,
    ) -> SurfaceId {
        let id = SurfaceId(self.surfaces.len() as u32);

        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vec_to_nvec(center))
            .user_data(id.0 as u128)
            .build();
        let collider = self.collider_set.insert(collider);

        physics_log!(
            DEBUG,
            "added surface {:?} '{}' at {:?} flags {:?}",
            id,
            name,
            center,
            flags
        );

        self.surfaces.push(Surface {
            name: name.to_string(),
            flags,
            collider,
        });
        self.is_stale = true;
        id
    }

    pub fn set_flags(&mut self, surface: SurfaceId, flags: SurfaceFlags) -> bool {
        match self.surfaces.get_mut(surface.0 as usize) {
            Some(entry) => {
                entry.flags = flags;
                true
            }
            None => false,
        }
    }

    pub fn flags(&self, surface: SurfaceId) -> Option<SurfaceFlags> {
        self.surfaces.get(surface.0 as usize).map(|s| s.flags)
    }

    pub fn surface_name(&self, surface: SurfaceId) -> Option<&str> {
        self.surfaces.get(surface.0 as usize).map(|s| s.name.as_str())
    }

    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    /// All surfaces carrying every flag in `flags`.
    pub fn surfaces_with(&self, flags: SurfaceFlags) -> impl Iterator<Item = SurfaceId> + '_ {
        self.surfaces
            .iter()
            .enumerate()
            .filter(move |(_, s)| s.flags.contains(flags))
            .map(|(idx, _)| SurfaceId(idx as u32))
    }

    /// Rebuild the query acceleration structure.
    pub fn update(&mut self) {
        self.query_pipeline
            .update(&self.rigid_body_set, &self.collider_set);
        self.is_stale = false;
    }

    fn surface_for_collider(&self, collider: &Collider) -> Option<(SurfaceId, &Surface)> {
        let id = SurfaceId(collider.user_data as u32);
        self.surfaces.get(id.0 as usize).map(|s| (id, s))
    }
}

impl RayCaster for PhysicsWorld {
    fn cast(
        &self,
        origin: Vector3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
    ) -> Option<RayHit> {
        debug_assert!(max_distance.is_finite(), "ray queries must be bounded");

        if direction.magnitude2() <= f32::EPSILON {
            return None;
        }
        if self.is_stale {
            physics_log!(WARN, "ray cast against stale query pipeline; call update()");
        }

        let ray = Ray::new(vec_to_npoint(origin), vec_to_nvec(direction.normalize()));
        let pickable = |_handle: ColliderHandle, collider: &Collider| {
            self.surface_for_collider(collider)
                .is_some_and(|(_, s)| s.flags.contains(SurfaceFlags::PICKABLE))
        };
        let filter = QueryFilter::default().predicate(&pickable);

        let (handle, toi) = self.query_pipeline.cast_ray(
            &self.rigid_body_set,
            &self.collider_set,
            &ray,
            max_distance,
            false,
            filter,
        )?;

        let collider = self.collider_set.get(handle)?;
        let (surface, entry) = self.surface_for_collider(collider)?;
        debug_assert_eq!(entry.collider, handle);

        Some(RayHit {
            surface,
            point: npoint_to_cgvec(ray.point_at(toi)),
            distance: toi,
        })
    }
}

impl SurfaceClassifier for PhysicsWorld {
    fn is_teleport_eligible(&self, surface: SurfaceId) -> bool {
        self.flags(surface)
            .is_some_and(|flags| flags.contains(SurfaceFlags::TELEPORT_TARGET))
    }
}
