//! Ray/primitive intersection.
//!
//! Every plane and sphere in the scene is tested for every ray; the nearest
//! hit wins. There is no acceleration structure.

use crate::Ray;
use ember_core::{MaterialId, Plane, Scene, Sphere, SKY_MATERIAL};
use ember_math::{Interval, Vec3, Vec3Ext};

/// Hits closer than this are ignored so a bounced ray does not
/// immediately hit the surface it starts on.
pub const DEFAULT_MIN_HIT_DISTANCE: f32 = 0.01;

/// `|2a|` at or below this in the sphere quadratic means the ray direction
/// was not normalized (or was zero).
pub const DEGENERATE_DIRECTION_EPSILON: f32 = 1e-5;

/// Record of a ray-object intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Material of the hit primitive, [`SKY_MATERIAL`] on a miss
    pub material: MaterialId,
    /// Ray parameter of the hit, `f32::INFINITY` on a miss
    pub t: f32,
    /// Point of intersection
    pub p: Vec3,
    /// Unit surface normal (outward for spheres)
    pub normal: Vec3,
}

impl HitRecord {
    /// The record for a ray that escapes the scene.
    pub const MISS: HitRecord = HitRecord {
        material: SKY_MATERIAL,
        t: f32::INFINITY,
        p: Vec3::ZERO,
        normal: Vec3::ZERO,
    };

    /// True if a primitive with a non-sky material was hit.
    #[inline]
    pub fn is_hit(&self) -> bool {
        self.material != SKY_MATERIAL
    }
}

/// Trait for primitives that can be hit by rays.
pub trait Hittable {
    /// Test if a ray hits this object strictly inside `ray_t`.
    ///
    /// Returns true if hit, and fills in the hit record.
    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool;
}

impl Hittable for Plane {
    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        let d = self.distance * self.normal.length();
        // A ray parallel to the plane divides by zero; the resulting
        // inf/NaN fails `surrounds`.
        let t = (d - self.normal.dot(ray.origin)) / self.normal.dot(ray.direction);
        if !ray_t.surrounds(t) {
            return false;
        }

        rec.t = t;
        rec.p = ray.at(t);
        rec.normal = self.normal.normalize_or_self();
        rec.material = self.material;
        true
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        let rel = ray.origin - self.center;
        let a = ray.direction.dot(ray.direction);
        let b = 2.0 * ray.direction.dot(rel);
        let c = rel.dot(rel) - self.radius * self.radius;

        let denom = 2.0 * a;
        assert!(
            denom.abs() > DEGENERATE_DIRECTION_EPSILON,
            "degenerate ray direction {:?} in sphere test",
            ray.direction
        );

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return false;
        }

        let sqrtd = discriminant.sqrt();

        // Nearest root in range first, then the far one (ray starts inside)
        let near = (-b - sqrtd) / denom;
        let far = (-b + sqrtd) / denom;
        let root = if ray_t.surrounds(near) {
            near
        } else if ray_t.surrounds(far) {
            far
        } else {
            return false;
        };

        rec.t = root;
        rec.p = ray.at(root);
        rec.normal = (rec.p - self.center).normalize_or_self();
        rec.material = self.material;
        true
    }
}

/// Find the nearest hit along `ray` beyond `min_distance`.
///
/// Returns [`HitRecord::MISS`] when nothing is hit.
pub fn intersect(ray: &Ray, scene: &Scene, min_distance: f32) -> HitRecord {
    let mut rec = HitRecord::MISS;
    let mut closest_so_far = f32::INFINITY;
    let ray_t = Interval::new(min_distance, f32::INFINITY);

    for plane in scene.planes() {
        if plane.hit(ray, ray_t.with_max(closest_so_far), &mut rec) {
            closest_so_far = rec.t;
        }
    }

    for sphere in scene.spheres() {
        if sphere.hit(ray, ray_t.with_max(closest_so_far), &mut rec) {
            closest_so_far = rec.t;
        }
    }

    rec
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::Material;

    const EPS: f32 = 1e-4;

    fn range() -> Interval {
        Interval::new(DEFAULT_MIN_HIT_DISTANCE, f32::INFINITY)
    }

    fn scene(planes: Vec<Plane>, spheres: Vec<Sphere>) -> Scene {
        let materials = vec![
            Material::sky(Vec3::new(0.2, 0.3, 0.9)),
            Material::diffuse(Vec3::splat(0.5)),
            Material::diffuse(Vec3::new(0.8, 0.2, 0.1)),
        ];
        Scene::new(materials, planes, spheres).unwrap()
    }

    #[test]
    fn test_sphere_hit_distance_and_normal() {
        let radius = 1.5;
        let sphere = Sphere::new(Vec3::ZERO, radius, 1);

        for d in [2.0_f32, 5.0, 40.0] {
            let ray = Ray::new(Vec3::new(0.0, 0.0, d), Vec3::NEG_Z);
            let mut rec = HitRecord::MISS;

            assert!(sphere.hit(&ray, range(), &mut rec));
            assert!((rec.t - (d - radius)).abs() < EPS, "t={} d={}", rec.t, d);
            assert!((rec.normal - Vec3::Z).length() < EPS);
            assert!((rec.normal.length() - 1.0).abs() < EPS);
            assert_eq!(rec.material, 1);
        }
    }

    #[test]
    fn test_sphere_hit_off_axis_normal_points_outward() {
        let sphere = Sphere::new(Vec3::new(1.0, 2.0, 3.0), 1.0, 1);
        let origin = Vec3::new(5.0, 2.0, 3.0);
        let ray = Ray::new(origin, Vec3::NEG_X);
        let mut rec = HitRecord::MISS;

        assert!(sphere.hit(&ray, range(), &mut rec));
        assert!((rec.t - 3.0).abs() < EPS);
        assert!((rec.p - Vec3::new(2.0, 2.0, 3.0)).length() < EPS);
        assert!((rec.normal - Vec3::X).length() < EPS);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, 1);
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        let mut rec = HitRecord::MISS;

        assert!(!sphere.hit(&ray, range(), &mut rec));
        assert_eq!(rec, HitRecord::MISS);
    }

    #[test]
    fn test_sphere_behind_ray_is_missed() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, 5.0), 1.0, 1);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let mut rec = HitRecord::MISS;

        assert!(!sphere.hit(&ray, range(), &mut rec));
    }

    #[test]
    fn test_ray_from_inside_sphere_hits_far_side() {
        let sphere = Sphere::new(Vec3::ZERO, 2.0, 1);
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let mut rec = HitRecord::MISS;

        assert!(sphere.hit(&ray, range(), &mut rec));
        assert!((rec.t - 2.0).abs() < EPS);
    }

    #[test]
    fn test_ray_leaving_sphere_surface_ignores_self_hit() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, 1);
        // Starts on the surface heading outward; near root is ~0
        let ray = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::Z);
        let mut rec = HitRecord::MISS;

        assert!(!sphere.hit(&ray, range(), &mut rec));
    }

    #[test]
    #[should_panic(expected = "degenerate ray direction")]
    fn test_degenerate_direction_panics() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, 1);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        let mut rec = HitRecord::MISS;
        sphere.hit(&ray, range(), &mut rec);
    }

    #[test]
    fn test_plane_hit_with_unnormalized_normal() {
        // Normal (0,2,0) at distance 1 is the plane y = 1
        let plane = Plane::new(Vec3::new(0.0, 2.0, 0.0), 1.0, 1);
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y);
        let mut rec = HitRecord::MISS;

        assert!(plane.hit(&ray, range(), &mut rec));
        assert!((rec.t - 4.0).abs() < EPS);
        assert_eq!(rec.normal, Vec3::Y);
    }

    #[test]
    fn test_plane_parallel_ray_is_missed() {
        let plane = Plane::new(Vec3::Y, 0.0, 1);
        let mut rec = HitRecord::MISS;

        // Above the plane: finite / 0 = inf
        let above = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::X);
        assert!(!plane.hit(&above, range(), &mut rec));

        // In the plane: 0 / 0 = NaN
        let inside = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(!plane.hit(&inside, range(), &mut rec));
    }

    #[test]
    fn test_plane_behind_ray_is_missed() {
        let plane = Plane::new(Vec3::Y, 0.0, 1);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::Y);
        let mut rec = HitRecord::MISS;

        assert!(!plane.hit(&ray, range(), &mut rec));
    }

    #[test]
    fn test_intersect_picks_nearest() {
        let scene = scene(
            vec![Plane::new(Vec3::Y, 0.0, 1)],
            vec![
                Sphere::new(Vec3::new(0.0, 3.0, 0.0), 0.5, 2),
                Sphere::new(Vec3::new(0.0, 6.0, 0.0), 0.5, 1),
            ],
        );
        let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y);

        let rec = intersect(&ray, &scene, DEFAULT_MIN_HIT_DISTANCE);
        assert!(rec.is_hit());
        assert_eq!(rec.material, 1);
        assert!((rec.t - 3.5).abs() < EPS);
        assert!((rec.p - Vec3::new(0.0, 6.5, 0.0)).length() < EPS);
    }

    #[test]
    fn test_intersect_sphere_in_front_of_plane() {
        let scene = scene(
            vec![Plane::new(Vec3::Z, -10.0, 1)],
            vec![Sphere::new(Vec3::ZERO, 1.0, 2)],
        );
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);

        let rec = intersect(&ray, &scene, DEFAULT_MIN_HIT_DISTANCE);
        assert_eq!(rec.material, 2);
        assert!((rec.t - 4.0).abs() < EPS);
    }

    #[test]
    fn test_intersect_miss() {
        let scene = scene(vec![], vec![Sphere::new(Vec3::ZERO, 1.0, 2)]);
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::Y);

        let rec = intersect(&ray, &scene, DEFAULT_MIN_HIT_DISTANCE);
        assert!(!rec.is_hit());
        assert_eq!(rec.material, SKY_MATERIAL);
        assert_eq!(rec.t, f32::INFINITY);
    }
}
