//! Camera for primary ray generation.
//!
//! The camera looks from `position` toward `look_at` through a film plane
//! `film_distance` in front of it. The film is `width / height` units wide
//! and 1 unit high, so the vertical field of view is fixed by the film
//! distance.

use crate::{gen_f32, Ray};
use ember_math::{CoordinateFrame, Vec2, Vec3, Vec3Ext};
use rand::RngCore;

/// Camera for generating rays into the scene.
#[derive(Debug, Clone)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,

    // Camera positioning
    position: Vec3,
    look_at: Vec3,
    film_distance: f32,

    // Cached computed values (refreshed by every builder method)
    frame: CoordinateFrame,
    film_center: Vec3,
    half_film_width: f32,
    half_film_height: f32,
}

impl Camera {
    /// Create a camera at (0, 1, 5) looking at the origin.
    pub fn new() -> Self {
        let mut camera = Self {
            image_width: 800,
            image_height: 800,
            position: Vec3::new(0.0, 1.0, 5.0),
            look_at: Vec3::ZERO,
            film_distance: 1.0,
            frame: CoordinateFrame::from_axis(Vec3::Z),
            film_center: Vec3::ZERO,
            half_film_width: 0.5,
            half_film_height: 0.5,
        };
        camera.initialize();
        camera
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self.initialize();
        self
    }

    /// Set camera position and target.
    pub fn with_position(mut self, position: Vec3, look_at: Vec3) -> Self {
        self.position = position;
        self.look_at = look_at;
        self.initialize();
        self
    }

    /// Set the distance from the camera to the film plane.
    pub fn with_film_distance(mut self, film_distance: f32) -> Self {
        self.film_distance = film_distance;
        self.initialize();
        self
    }

    fn initialize(&mut self) {
        // The frame axis points back toward the viewer
        let axis = (self.position - self.look_at).normalize_or_self();
        self.frame = CoordinateFrame::from_axis(axis);
        self.film_center = self.position + self.film_distance * self.forward();

        let aspect_ratio = self.image_width as f32 / self.image_height.max(1) as f32;
        self.half_film_width = 0.5 * aspect_ratio;
        self.half_film_height = 0.5;
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn look_at(&self) -> Vec3 {
        self.look_at
    }

    pub fn film_distance(&self) -> f32 {
        self.film_distance
    }

    /// Unit viewing direction.
    pub fn forward(&self) -> Vec3 {
        -self.frame.front
    }

    pub fn frame(&self) -> &CoordinateFrame {
        &self.frame
    }

    /// Map a pixel plus a jitter in [0, 1)² to film coordinates in [-1, 1].
    ///
    /// Row 0 is the top of the image and maps to the top of the film, so the
    /// y axis is flipped relative to raster order.
    pub fn film_coordinates(&self, x: u32, y: u32, jitter: Vec2) -> Vec2 {
        let width = self.image_width as f32;
        let height = self.image_height as f32;

        let film_x = (x as f32 / width - 0.5) * 2.0 + jitter.x * 2.0 / width;
        let film_y = ((1.0 - y as f32 / height) - 0.5) * 2.0 - jitter.y * 2.0 / height;
        Vec2::new(film_x, film_y)
    }

    /// Primary ray through a point on the film, in film coordinates.
    pub fn ray_through(&self, film: Vec2) -> Ray {
        let film_point = self.film_center
            + self.frame.lateral * (film.x * self.half_film_width)
            + self.frame.up * (film.y * self.half_film_height);

        Ray::new(self.position, (film_point - self.position).normalize_or_self())
    }

    /// Generate a ray for pixel (x, y) with random jitter inside the pixel.
    pub fn get_ray(&self, x: u32, y: u32, rng: &mut dyn RngCore) -> Ray {
        let jitter = Vec2::new(gen_f32(rng), gen_f32(rng));
        self.ray_through(self.film_coordinates(x, y, jitter))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
