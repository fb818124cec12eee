//! Ember Core - scene description for the Ember path tracer.
//!
//! This crate provides:
//!
//! - **Scene types**: `Scene`, `Plane`, `Sphere`, `Material`
//! - **Scene files**: JSON loading with validation on load
//!
//! # Example
//!
//! ```ignore
//! use ember_core::load_scene;
//!
//! let scene = load_scene("scene.json")?;
//! println!("Loaded {} planes, {} spheres",
//!     scene.planes().len(),
//!     scene.spheres().len());
//! ```

pub mod loader;
pub mod scene;

// Re-export commonly used types
pub use loader::{load_scene, scene_from_json, LoadError, LoadResult};
pub use scene::{Material, MaterialId, Plane, Scene, SceneError, Sphere, SKY_MATERIAL};
