//! Scene file loading.
//!
//! Scene files are JSON documents with `materials`, `planes` and `spheres`
//! arrays. Vectors are written as `[x, y, z]`. The scene is validated while
//! it is deserialized, so a file that loads is always safe to render.
//!
//! ```json
//! {
//!   "materials": [
//!     { "emitted": [0.3, 0.4, 0.5], "specular": [0, 0, 0] },
//!     { "roughness": 1.0, "specular": [0.5, 0.5, 0.5] }
//!   ],
//!   "planes": [{ "normal": [0, 1, 0], "distance": 0, "material": 1 }]
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::scene::Scene;

/// Errors that can occur during scene loading.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON, or a scene that failed validation
    #[error("Invalid scene: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Load and validate a scene from a JSON file.
pub fn load_scene(path: impl AsRef<Path>) -> LoadResult<Scene> {
    let path = path.as_ref();
    log::info!("Loading scene: {}", path.display());

    let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    scene_from_json(&contents)
}

/// Parse and validate a scene from a JSON string.
pub fn scene_from_json(json: &str) -> LoadResult<Scene> {
    let scene: Scene = serde_json::from_str(json)?;
    log::info!(
        "Loaded scene: {} materials, {} planes, {} spheres",
        scene.materials().len(),
        scene.planes().len(),
        scene.spheres().len()
    );
    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_math::Vec3;

    const SCENE_JSON: &str = r#"{
        "materials": [
            { "emitted": [0.3, 0.4, 0.5], "specular": [0, 0, 0] },
            { "roughness": 1.0, "specular": [0.5, 0.5, 0.5] },
            { "roughness": 0.25, "specular": [0.7, 0.5, 0.3] }
        ],
        "planes": [{ "normal": [0, 1, 0], "distance": 0, "material": 1 }],
        "spheres": [{ "center": [0, 0, 0], "radius": 1, "material": 2 }]
    }"#;

    #[test]
    fn test_scene_from_json() {
        let scene = scene_from_json(SCENE_JSON).unwrap();

        assert_eq!(scene.materials().len(), 3);
        assert_eq!(scene.planes()[0].normal, Vec3::Y);
        assert_eq!(scene.spheres()[0].radius, 1.0);
        assert_eq!(scene.material(2).roughness, 0.25);
        assert_eq!(scene.sky().emitted, Vec3::new(0.3, 0.4, 0.5));
    }

    #[test]
    fn test_material_defaults() {
        let scene = scene_from_json(r#"{ "materials": [{}] }"#).unwrap();
        let sky = scene.sky();

        assert_eq!(sky.roughness, 0.0);
        assert_eq!(sky.specular, Vec3::ONE);
        assert_eq!(sky.emitted, Vec3::ZERO);
    }

    #[test]
    fn test_invalid_scene_rejected_on_load() {
        let json = r#"{
            "materials": [{}],
            "spheres": [{ "center": [0, 0, 0], "radius": 1, "material": 5 }]
        }"#;
        let err = scene_from_json(json).unwrap_err();
        assert!(err.to_string().contains("material 5"), "{err}");
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            scene_from_json("{ not json"),
            Err(LoadError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = load_scene("this/scene/does/not/exist.json");
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }

    #[test]
    fn test_scene_round_trips_through_json() {
        let scene = Scene::default_scene();
        let json = serde_json::to_string(&scene).unwrap();
        assert_eq!(scene_from_json(&json).unwrap(), scene);
    }
}
