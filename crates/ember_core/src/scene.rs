//! Scene types for Ember.
//!
//! A scene is a flat list of planes and spheres that refer to materials by
//! index. Material 0 is the sky: it is what a ray sees when it hits nothing.
//! Scenes are validated once on construction and never mutated afterwards,
//! so a `&Scene` can be shared by every render thread without locking.

use ember_math::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Index into [`Scene::materials`].
pub type MaterialId = u32;

/// Material used when a ray escapes the scene.
pub const SKY_MATERIAL: MaterialId = 0;

/// Errors that can occur while building a scene.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("Scene has no materials; material 0 (sky) is required")]
    MissingSkyMaterial,

    #[error("Material {index} has roughness {roughness}, expected a value in [0, 1]")]
    InvalidRoughness { index: usize, roughness: f32 },

    #[error("Plane {index} has a zero-length normal")]
    DegeneratePlane { index: usize },

    #[error("Sphere {index} has radius {radius}, expected a finite value > 0")]
    InvalidRadius { index: usize, radius: f32 },

    #[error("{kind} {index} references material {material}, but only {count} materials exist")]
    MaterialOutOfRange {
        kind: &'static str,
        index: usize,
        material: MaterialId,
        count: usize,
    },
}

/// Surface response of a primitive.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// 0 = perfect mirror, 1 = fully random bounce
    #[serde(default)]
    pub roughness: f32,

    /// Componentwise attenuation applied to the path on each bounce
    #[serde(default = "Material::default_specular")]
    pub specular: Vec3,

    /// Light emitted by the surface (for material 0, the sky color)
    #[serde(default)]
    pub emitted: Vec3,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            roughness: 0.0,
            specular: Vec3::ONE,
            emitted: Vec3::ZERO,
        }
    }
}

impl Material {
    fn default_specular() -> Vec3 {
        Vec3::ONE
    }

    /// A sky/background material that only emits.
    pub fn sky(emitted: Vec3) -> Self {
        Self {
            roughness: 0.0,
            specular: Vec3::ZERO,
            emitted,
        }
    }

    /// A fully rough surface tinted by `specular`.
    pub fn diffuse(specular: Vec3) -> Self {
        Self {
            roughness: 1.0,
            specular,
            emitted: Vec3::ZERO,
        }
    }

    /// A perfect mirror tinted by `specular`.
    pub fn mirror(specular: Vec3) -> Self {
        Self {
            roughness: 0.0,
            specular,
            emitted: Vec3::ZERO,
        }
    }

    /// A light source.
    pub fn emissive(emitted: Vec3) -> Self {
        Self {
            roughness: 1.0,
            specular: Vec3::ZERO,
            emitted,
        }
    }

    /// Builder-style roughness override.
    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness;
        self
    }
}

/// An infinite plane `dot(normal, p) = distance * |normal|`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    /// Not required to be unit length; consumers normalize
    pub normal: Vec3,
    /// Signed distance from the origin along the normal
    pub distance: f32,
    pub material: MaterialId,
}

impl Plane {
    pub fn new(normal: Vec3, distance: f32, material: MaterialId) -> Self {
        Self {
            normal,
            distance,
            material,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    pub material: MaterialId,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32, material: MaterialId) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }
}

/// Unvalidated scene contents, as found in a scene file.
#[derive(Clone, Debug, Default, Deserialize)]
struct SceneDescription {
    materials: Vec<Material>,
    #[serde(default)]
    planes: Vec<Plane>,
    #[serde(default)]
    spheres: Vec<Sphere>,
}

/// Validated, immutable scene.
///
/// Every material handle held by a plane or sphere is guaranteed to be a
/// valid index into `materials`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SceneDescription")]
pub struct Scene {
    materials: Vec<Material>,
    planes: Vec<Plane>,
    spheres: Vec<Sphere>,
}

impl TryFrom<SceneDescription> for Scene {
    type Error = SceneError;

    fn try_from(desc: SceneDescription) -> Result<Self, Self::Error> {
        Scene::new(desc.materials, desc.planes, desc.spheres)
    }
}

impl Scene {
    /// Build a scene, checking every invariant the renderer relies on.
    pub fn new(
        materials: Vec<Material>,
        planes: Vec<Plane>,
        spheres: Vec<Sphere>,
    ) -> Result<Self, SceneError> {
        if materials.is_empty() {
            return Err(SceneError::MissingSkyMaterial);
        }

        for (index, material) in materials.iter().enumerate() {
            if !(0.0..=1.0).contains(&material.roughness) {
                return Err(SceneError::InvalidRoughness {
                    index,
                    roughness: material.roughness,
                });
            }
        }

        let count = materials.len();
        let check_material = |kind, index, material: MaterialId| {
            if material as usize >= count {
                Err(SceneError::MaterialOutOfRange {
                    kind,
                    index,
                    material,
                    count,
                })
            } else {
                Ok(())
            }
        };

        for (index, plane) in planes.iter().enumerate() {
            if plane.normal.length_squared() == 0.0 || !plane.normal.is_finite() {
                return Err(SceneError::DegeneratePlane { index });
            }
            check_material("Plane", index, plane.material)?;
        }

        for (index, sphere) in spheres.iter().enumerate() {
            if !(sphere.radius.is_finite() && sphere.radius > 0.0) {
                return Err(SceneError::InvalidRadius {
                    index,
                    radius: sphere.radius,
                });
            }
            check_material("Sphere", index, sphere.material)?;
        }

        log::debug!(
            "Scene built: {} materials, {} planes, {} spheres",
            materials.len(),
            planes.len(),
            spheres.len()
        );

        Ok(Self {
            materials,
            planes,
            spheres,
        })
    }

    /// Blue ground plane through the origin, an orange unit sphere centered
    /// on it and a dim grey sky.
    pub fn default_scene() -> Self {
        let materials = vec![
            Material::sky(Vec3::splat(0.2)),
            Material::diffuse(Vec3::new(0.2, 0.3, 0.5)),
            Material::diffuse(Vec3::new(0.6, 0.4, 0.08)),
        ];
        let planes = vec![Plane::new(Vec3::Y, 0.0, 1)];
        let spheres = vec![Sphere::new(Vec3::ZERO, 1.0, 2)];

        Self {
            materials,
            planes,
            spheres,
        }
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    /// Look up a material by handle.
    ///
    /// Handles stored in the scene are validated on construction, so this
    /// only panics on a handle that did not come from this scene.
    #[inline]
    pub fn material(&self, id: MaterialId) -> &Material {
        &self.materials[id as usize]
    }

    /// The background material (index 0).
    #[inline]
    pub fn sky(&self) -> &Material {
        &self.materials[SKY_MATERIAL as usize]
    }
}
