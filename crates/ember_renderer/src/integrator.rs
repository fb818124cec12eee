//! Path integrator.
//!
//! Follows one light path through the scene for up to `max_bounces`
//! surface interactions, accumulating emission weighted by the running
//! throughput. The bounce loop is iterative so stack depth does not depend
//! on the bounce budget.

use crate::intersect::intersect;
use crate::{gen_bilateral, Color, Ray, RenderConfig};
use ember_core::Scene;
use ember_math::{Interval, Vec3, Vec3Ext};
use rand::RngCore;

/// Compute the radiance carried back along `ray`.
///
/// Each channel of the result is clamped to [0, 1].
pub fn ray_cast(
    ray: &Ray,
    scene: &Scene,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let mut result = Color::ZERO;
    let mut throughput = Color::ONE;
    let mut ray = *ray;

    for _ in 0..config.max_bounces {
        let rec = intersect(&ray, scene, config.min_hit_distance);

        if !rec.is_hit() {
            // Escaped to the sky
            result += throughput * scene.sky().emitted;
            break;
        }

        let material = scene.material(rec.material);
        result += throughput * material.emitted;
        throughput *= material.specular;

        let direction = bounce_direction(ray.direction, rec.normal, material.roughness, rng);
        ray = Ray::new(rec.p, direction);
    }

    Color::new(
        Interval::UNIT.clamp(result.x),
        Interval::UNIT.clamp(result.y),
        Interval::UNIT.clamp(result.z),
    )
}

/// Pick the outgoing direction after a bounce.
///
/// Blends the mirror reflection with `normal + r`, where `r` has components
/// uniform in [-1, 1] and is deliberately left unnormalized, then normalizes
/// the blend. Roughness 0 gives a perfect mirror.
pub fn bounce_direction(
    incoming: Vec3,
    normal: Vec3,
    roughness: f32,
    rng: &mut dyn RngCore,
) -> Vec3 {
    let mirror = incoming.reflect(normal);
    let random = normal + Vec3::new(gen_bilateral(rng), gen_bilateral(rng), gen_bilateral(rng));
    mirror.lerp(random, roughness).normalize_or_self()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::{Material, Plane, Sphere};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const EPS: f32 = 1e-5;

    fn config(max_bounces: u32) -> RenderConfig {
        RenderConfig {
            max_bounces,
            ..Default::default()
        }
    }

    fn mirror_floor_scene(sky: Vec3) -> Scene {
        Scene::new(
            vec![Material::sky(sky), Material::mirror(Vec3::splat(0.5))],
            vec![Plane::new(Vec3::Y, 0.0, 1)],
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn test_miss_returns_sky_emission() {
        let sky = Vec3::new(0.2, 0.3, 0.9);
        let scene = Scene::new(vec![Material::sky(sky)], vec![], vec![]).unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        for direction in [Vec3::X, Vec3::NEG_Y, Vec3::new(1.0, 2.0, -3.0).normalize()] {
            let ray = Ray::new(Vec3::new(0.0, 1.0, 5.0), direction);
            assert_eq!(ray_cast(&ray, &scene, &config(32), &mut rng), sky);
        }
    }

    #[test]
    fn test_result_is_clamped() {
        let scene = Scene::new(vec![Material::sky(Vec3::new(3.0, -1.0, 0.5))], vec![], vec![])
            .unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);

        assert_eq!(
            ray_cast(&ray, &scene, &config(8), &mut rng),
            Vec3::new(1.0, 0.0, 0.5)
        );
    }

    #[test]
    fn test_throughput_attenuates_sky() {
        let sky = Vec3::new(0.4, 0.6, 0.8);
        let scene = mirror_floor_scene(sky);
        let mut rng = StdRng::seed_from_u64(7);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0).normalize());

        let color = ray_cast(&ray, &scene, &config(8), &mut rng);
        assert!((color - sky * 0.5).length() < EPS, "color={color}");
    }

    #[test]
    fn test_bounce_budget_limits_path() {
        let scene = mirror_floor_scene(Vec3::ONE);
        let mut rng = StdRng::seed_from_u64(7);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0).normalize());

        // One bounce reaches the floor but never the sky
        assert_eq!(ray_cast(&ray, &scene, &config(1), &mut rng), Vec3::ZERO);
        assert!((ray_cast(&ray, &scene, &config(2), &mut rng) - Vec3::splat(0.5)).length() < EPS);
    }

    #[test]
    fn test_emissive_hit_adds_emission() {
        let scene = Scene::new(
            vec![Material::sky(Vec3::ZERO), Material::emissive(Vec3::new(0.25, 0.5, 2.0))],
            vec![],
            vec![Sphere::new(Vec3::ZERO, 1.0, 1)],
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);

        let color = ray_cast(&ray, &scene, &config(4), &mut rng);
        assert_eq!(color, Vec3::new(0.25, 0.5, 1.0));
    }

    #[test]
    fn test_mirror_reflection() {
        let mut rng = StdRng::seed_from_u64(11);
        let normals = [Vec3::Y, Vec3::new(1.0, 1.0, 0.0).normalize(), Vec3::NEG_Z];
        let incoming = [
            Vec3::new(1.0, -1.0, 0.0).normalize(),
            Vec3::new(0.3, -0.9, 0.2).normalize(),
            Vec3::new(-0.5, 0.1, 0.8).normalize(),
        ];

        for n in normals {
            for dir in incoming {
                let reflected = bounce_direction(dir, n, 0.0, &mut rng);
                assert!((reflected.dot(n) + dir.dot(n)).abs() < EPS);
                assert!((reflected.length() - 1.0).abs() < EPS);
            }
        }
    }

    #[test]
    fn test_rough_bounce_leaves_surface() {
        let mut rng = StdRng::seed_from_u64(5);
        let dir = Vec3::new(0.0, -1.0, 0.0);

        for _ in 0..1000 {
            let bounced = bounce_direction(dir, Vec3::Y, 1.0, &mut rng);
            assert!(bounced.y >= 0.0);
            assert!((bounced.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_rough_bounces_vary() {
        let mut rng = StdRng::seed_from_u64(9);
        let a = bounce_direction(Vec3::NEG_Y, Vec3::Y, 0.8, &mut rng);
        let b = bounce_direction(Vec3::NEG_Y, Vec3::Y, 0.8, &mut rng);
        assert_ne!(a, b);
    }
}
