//! Simple path tracer example.
//!
//! Renders a plane, three spheres and a light, and saves to BMP.

use ember_renderer::{
    render_with_progress, save_image, Camera, Color, Material, Plane, RenderConfig, Scene,
    Sphere, TileOrder, Vec3,
};

fn main() {
    println!("Ember Path Tracer - Simple Example");
    println!("==================================");

    // Build the scene
    let scene = build_scene();

    // Set up camera
    let camera = Camera::new()
        .with_resolution(640, 480)
        .with_position(Vec3::new(0.0, 1.5, 6.0), Vec3::new(0.0, 0.5, 0.0));

    // Render configuration
    let config = RenderConfig {
        samples_per_pixel: 64,
        max_bounces: 16,
        tile_size: Some(32),
        tile_order: TileOrder::Spiral,
        ..Default::default()
    };

    println!(
        "Rendering {}x{} @ {} spp on {} workers...",
        camera.image_width, camera.image_height, config.samples_per_pixel, config.thread_count
    );

    let start = std::time::Instant::now();
    let mut last_reported = 0;
    let image = render_with_progress(&scene, &camera, &config, |percent| {
        let step = percent as u32 / 10;
        if step > last_reported {
            last_reported = step;
            println!("  {:>3}%", step * 10);
        }
    })
    .expect("Invalid render configuration");
    println!("Rendered in {:?}", start.elapsed());

    let filename = "output.bmp";
    save_image(&image, filename).expect("Failed to save image");
    println!("Saved to {}", filename);
}

fn build_scene() -> Scene {
    let materials = vec![
        // Sky
        Material::sky(Color::new(0.3, 0.4, 0.5)),
        // Ground
        Material::diffuse(Color::new(0.5, 0.5, 0.5)),
        // Rough orange
        Material::diffuse(Color::new(0.7, 0.5, 0.3)),
        // Mirror
        Material::mirror(Color::new(0.9, 0.9, 0.9)),
        // Brushed metal
        Material::mirror(Color::new(0.8, 0.6, 0.5)).with_roughness(0.3),
        // Light
        Material::emissive(Color::new(4.0, 3.5, 3.0)),
    ];

    let planes = vec![Plane::new(Vec3::Y, 0.0, 1)];

    let spheres = vec![
        Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, 2),
        Sphere::new(Vec3::new(-2.2, 0.8, -0.5), 0.8, 3),
        Sphere::new(Vec3::new(2.2, 0.7, 0.3), 0.7, 4),
        Sphere::new(Vec3::new(0.0, 4.0, -2.0), 0.6, 5),
    ];

    Scene::new(materials, planes, spheres).expect("Invalid scene")
}
