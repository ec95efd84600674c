//! Hittable trait and HitRecord for ray-object intersection.

use crate::Material;
use lumen_math::{DVec3, Interval, Point3, Ray};
use std::sync::Arc;

/// Record of a ray-object intersection.
#[derive(Clone, Copy)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Point3,
    /// Surface normal at intersection (always points against the ray)
    pub normal: DVec3,
    /// Material at the intersection point
    pub material: &'a dyn Material,
    /// Parameter t where the intersection occurs
    pub t: f64,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl<'a> HitRecord<'a> {
    /// Build a record, orienting the normal against the ray.
    ///
    /// `outward_normal` must point out of the surface and is assumed to be
    /// unit length.
    pub fn new(ray: &Ray, t: f64, outward_normal: DVec3, material: &'a dyn Material) -> Self {
        let mut rec = Self {
            p: ray.at(t),
            normal: outward_normal,
            material,
            t,
            front_face: true,
        };
        rec.set_face_normal(ray, outward_normal);
        rec
    }

    /// Set the face normal based on ray direction and outward normal.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: DVec3) {
        // If the ray and normal point in the same direction, we're inside
        self.front_face = ray.direction().dot(outward_normal) < 0.0;

        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

impl std::fmt::Debug for HitRecord<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HitRecord")
            .field("p", &self.p)
            .field("normal", &self.normal)
            .field("t", &self.t)
            .field("front_face", &self.front_face)
            .finish_non_exhaustive()
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Test if a ray hits this object with `t` strictly inside `ray_t`.
    ///
    /// Returns the nearest qualifying hit, if any.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>>;
}

impl<T: Hittable + ?Sized> Hittable for Arc<T> {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        (**self).hit(ray, ray_t)
    }
}

impl<T: Hittable + ?Sized> Hittable for Box<T> {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        (**self).hit(ray, ray_t)
    }
}

/// An ordered list of hittable objects.
///
/// Entries are reference counted so one object may appear in several
/// lists.
#[derive(Clone, Default)]
pub struct HittableList {
    objects: Vec<Arc<dyn Hittable>>,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: impl Hittable + 'static) {
        self.objects.push(Arc::new(object));
    }

    /// Add an object that is shared with other owners.
    pub fn add_shared(&mut self, object: Arc<dyn Hittable>) {
        self.objects.push(object);
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Hittable for HittableList {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let mut closest: Option<HitRecord<'_>> = None;

        for object in &self.objects {
            let closest_so_far = closest.map_or(ray_t.max, |rec| rec.t);
            if let Some(rec) = object.hit(ray, ray_t.with_max(closest_so_far)) {
                closest = Some(rec);
            }
        }

        closest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Lambertian, Sphere};

    fn gray() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Color::splat(0.5)))
    }

    fn forward() -> Interval {
        Interval::new(0.001, f64::INFINITY)
    }

    #[test]
    fn test_empty_list_misses() {
        let world = HittableList::new();
        let ray = Ray::new(DVec3::ZERO, DVec3::NEG_Z);

        assert!(world.is_empty());
        assert!(world.hit(&ray, forward()).is_none());
    }

    #[test]
    fn test_nearest_hit_regardless_of_order() {
        let near = Sphere::new(DVec3::new(0.0, 0.0, -2.0), 0.5, gray());
        let far = Sphere::new(DVec3::new(0.0, 0.0, -6.0), 0.5, gray());
        let ray = Ray::new(DVec3::ZERO, DVec3::NEG_Z);

        let mut near_first = HittableList::new();
        near_first.add(near.clone());
        near_first.add(far.clone());

        let mut far_first = HittableList::new();
        far_first.add(far);
        far_first.add(near);

        let a = near_first.hit(&ray, forward()).expect("hit");
        let b = far_first.hit(&ray, forward()).expect("hit");
        assert!((a.t - 1.5).abs() < 1e-9);
        assert!((b.t - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_missing_member_does_not_affect_result() {
        let mut world = HittableList::new();
        world.add(Sphere::new(DVec3::new(10.0, 0.0, -2.0), 0.5, gray()));
        world.add(Sphere::new(DVec3::new(0.0, 0.0, -3.0), 1.0, gray()));

        let ray = Ray::new(DVec3::ZERO, DVec3::NEG_Z);
        let rec = world.hit(&ray, forward()).expect("hit");
        assert!((rec.t - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_hit_outside_interval_is_ignored() {
        let mut world = HittableList::new();
        world.add(Sphere::new(DVec3::new(0.0, 0.0, -5.0), 1.0, gray()));

        let ray = Ray::new(DVec3::ZERO, DVec3::NEG_Z);
        assert!(world.hit(&ray, Interval::new(0.001, 3.0)).is_none());
    }

    #[test]
    fn test_shared_entries() {
        let shared: Arc<dyn Hittable> =
            Arc::new(Sphere::new(DVec3::new(0.0, 0.0, -1.0), 0.5, gray()));

        let mut a = HittableList::new();
        let mut b = HittableList::new();
        a.add_shared(Arc::clone(&shared));
        b.add_shared(shared);

        let ray = Ray::new(DVec3::ZERO, DVec3::NEG_Z);
        assert!(a.hit(&ray, forward()).is_some());
        assert!(b.hit(&ray, forward()).is_some());
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn test_nested_lists() {
        let mut inner = HittableList::new();
        inner.add(Sphere::new(DVec3::new(0.0, 0.0, -4.0), 0.5, gray()));

        let mut outer = HittableList::new();
        outer.add(inner);
        outer.add(Sphere::new(DVec3::new(0.0, 0.0, -8.0), 0.5, gray()));

        let ray = Ray::new(DVec3::ZERO, DVec3::NEG_Z);
        let rec = outer.hit(&ray, forward()).expect("hit");
        assert!((rec.t - 3.5).abs() < 1e-9);
    }
}
