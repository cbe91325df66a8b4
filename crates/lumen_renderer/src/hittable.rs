//! Hittable trait, HitRecord and the scene aggregate.

use crate::{Material, Ray, Sphere};
use lumen_math::{Interval, Vec3};

/// Record of a ray-object intersection.
///
/// Built fresh by every successful hit test and never stored.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord<'a> {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal at the intersection, `(p - center) / radius` for spheres
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a Material,
}

/// Trait for objects that can be hit by rays.
///
/// Implemented by [`Sphere`], the only primitive, and by [`HittableList`],
/// which aggregates spheres. Objects are read concurrently by every render
/// worker and are never mutated during a render.
pub trait Hittable: Send + Sync {
    /// Nearest intersection with `ray` whose parameter lies strictly inside `ray_t`.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>>;
}

/// The scene: an owning list of spheres.
#[derive(Debug, Default)]
pub struct HittableList {
    objects: Vec<Sphere>,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: Sphere) {
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

    pub fn iter(&self) -> impl Iterator<Item = &Sphere> {
        self.objects.iter()
    }
}

impl FromIterator<Sphere> for HittableList {
    fn from_iter<I: IntoIterator<Item = Sphere>>(iter: I) -> Self {
        Self {
            objects: iter.into_iter().collect(),
        }
    }
}

impl Hittable for HittableList {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let mut closest: Option<HitRecord<'_>> = None;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            if let Some(rec) = object.hit(ray, ray_t.with_max(closest_so_far)) {
                closest_so_far = rec.t;
                closest = Some(rec);
            }
        }

        closest
    }
}

impl Drop for HittableList {
    fn drop(&mut self) {
        if !self.objects.is_empty() {
            log::debug!("Releasing {} scene objects", self.objects.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lambertian, Metal};

    fn gray() -> Material {
        Lambertian::new(Vec3::splat(0.5)).into()
    }

    #[test]
    fn test_empty_list_misses() {
        let world = HittableList::new();
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!(world.is_empty());
        assert!(world.hit(&ray, Interval::new(0.001, f32::MAX)).is_none());
    }

    #[test]
    fn test_closest_hit_wins_regardless_of_order() {
        let near = || Sphere::new(Vec3::new(0.0, 0.0, -2.0), 0.5, gray());
        let far = || {
            Sphere::new(
                Vec3::new(0.0, 0.0, -5.0),
                0.5,
                Metal::new(Vec3::ONE, 0.0).into(),
            )
        };
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let ray_t = Interval::new(0.001, f32::MAX);

        let forward: HittableList = [near(), far()].into_iter().collect();
        let backward: HittableList = [far(), near()].into_iter().collect();

        let a = forward.hit(&ray, ray_t).unwrap();
        let b = backward.hit(&ray, ray_t).unwrap();
        assert!((a.t - 1.5).abs() < 1e-5);
        assert_eq!(a.t, b.t);
        assert!(matches!(b.material, Material::Lambertian(_)));
    }

    #[test]
    fn test_hit_respects_t_max() {
        let mut world = HittableList::new();
        world.add(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, gray()));
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        assert!(world.hit(&ray, Interval::new(0.001, 3.0)).is_none());
        assert!(world.hit(&ray, Interval::new(0.001, 10.0)).is_some());
        assert_eq!(world.len(), 1);
    }
}
