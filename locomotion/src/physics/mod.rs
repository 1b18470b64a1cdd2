//! World queries used for teleport aiming.
//!
//! Locomotion only borrows query access: it asks where a ray lands and whether
//! that surface accepts teleports, and never mutates the world.

pub mod physics_world;
pub mod util;

use std::collections::HashSet;
use std::rc::Rc;

use bitflags::bitflags;
use cgmath::Vector3;

pub use physics_world::PhysicsWorld;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u32);

bitflags! {
    pub struct SurfaceFlags: u32 {
        /// Visible to ray queries
        const PICKABLE = 0b0001;
        /// A valid landing zone, e.g. floor or ground
        const TELEPORT_TARGET = 0b0010;
        const GROUND = Self::PICKABLE.bits | Self::TELEPORT_TARGET.bits;
    }
}

/// Nearest intersection along a query ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub surface: SurfaceId,
    pub point: Vector3<f32>,
    /// Distance from the ray origin to `point`, in world units
    pub distance: f32,
}

pub trait RayCaster {
    /// Nearest hit within `max_distance` of `origin` along `direction`.
    /// `direction` does not need to be normalized.
    fn cast(&self, origin: Vector3<f32>, direction: Vector3<f32>, max_distance: f32)
    -> Option<RayHit>;
}

pub trait SurfaceClassifier {
    fn is_teleport_eligible(&self, surface: SurfaceId) -> bool;
}

impl<T: RayCaster + ?Sized> RayCaster for &T {
    fn cast(&self, origin: Vector3<f32>, direction: Vector3<f32>, max_distance: f32)
    -> Option<RayHit> {
        (**self).cast(origin, direction, max_distance)
    }
}

impl<T: RayCaster + ?Sized> RayCaster for Rc<T> {
    fn cast(&self, origin: Vector3<f32>, direction: Vector3<f32>, max_distance: f32)
    -> Option<RayHit> {
        (**self).cast(origin, direction, max_distance)
    }
}

impl<T: SurfaceClassifier + ?Sized> SurfaceClassifier for &T {
    fn is_teleport_eligible(&self, surface: SurfaceId) -> bool {
        (**self).is_teleport_eligible(surface)
    }
}

impl<T: SurfaceClassifier + ?Sized> SurfaceClassifier for Rc<T> {
    fn is_teleport_eligible(&self, surface: SurfaceId) -> bool {
        (**self).is_teleport_eligible(surface)
    }
}

/// Explicit list of surfaces registered as teleport ground.
#[derive(Clone, Debug, Default)]
pub struct GroundSurfaces {
    surfaces: HashSet<SurfaceId>,
}

impl GroundSurfaces {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, surface: SurfaceId) {
        self.surfaces.insert(surface);
    }

    pub fn unregister(&mut self, surface: SurfaceId) -> bool {
        self.surfaces.remove(&surface)
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

impl FromIterator<SurfaceId> for GroundSurfaces {
    fn from_iter<I: IntoIterator<Item = SurfaceId>>(iter: I) -> Self {
        GroundSurfaces {
            surfaces: iter.into_iter().collect(),
        }
    }
}

impl SurfaceClassifier for GroundSurfaces {
    fn is_teleport_eligible(&self, surface: SurfaceId) -> bool {
        self.surfaces.contains(&surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ground_surfaces_membership() {
        let mut ground: GroundSurfaces = [SurfaceId(1)].into_iter().collect();
        ground.register(SurfaceId(4));

        assert!(ground.is_teleport_eligible(SurfaceId(1)));
        assert!(ground.is_teleport_eligible(SurfaceId(4)));
        assert!(!ground.is_teleport_eligible(SurfaceId(2)));

        assert!(ground.unregister(SurfaceId(1)));
        assert!(!ground.is_teleport_eligible(SurfaceId(1)));
        assert_eq!(ground.len(), 1);
    }

    fn eligible<C: SurfaceClassifier>(classifier: C, surface: SurfaceId) -> bool {
        classifier.is_teleport_eligible(surface)
    }

    #[test]
    fn test_classifier_through_reference_and_rc() {
        let ground: GroundSurfaces = [SurfaceId(7)].into_iter().collect();
        let shared = Rc::new(ground.clone());

        assert!(eligible(&ground, SurfaceId(7)));
        assert!(eligible(shared, SurfaceId(7)));
        assert!(!eligible(&ground, SurfaceId(8)));
    }

    #[test]
    fn test_ground_flags() {
        assert!(SurfaceFlags::GROUND.contains(SurfaceFlags::PICKABLE));
        assert!(SurfaceFlags::GROUND.contains(SurfaceFlags::TELEPORT_TARGET));
        assert!(!SurfaceFlags::empty().contains(SurfaceFlags::PICKABLE));
    }
}
