//! Vector helpers and the camera coordinate frame.

use crate::Vec3;

/// Squared length below which [`Vec3Ext::normalize_or_self`] leaves a vector alone.
pub const NORMALIZE_EPSILON: f32 = 1e-6;

/// World up axis used to build coordinate frames.
pub const GLOBAL_UP: Vec3 = Vec3::Y;

/// Extra vector operations the renderer needs on top of glam.
pub trait Vec3Ext {
    /// Normalize, or return the input unchanged if its squared length is
    /// below [`NORMALIZE_EPSILON`].
    fn normalize_or_self(self) -> Self;

    /// Mirror this direction about a unit normal: `v - 2 * dot(v, n) * n`.
    fn reflect(self, normal: Self) -> Self;
}

impl Vec3Ext for Vec3 {
    #[inline]
    fn normalize_or_self(self) -> Self {
        let length_squared = self.length_squared();
        if length_squared < NORMALIZE_EPSILON {
            return self;
        }
        self / length_squared.sqrt()
    }

    #[inline]
    fn reflect(self, normal: Self) -> Self {
        self - 2.0 * self.dot(normal) * normal
    }
}

/// Orthonormal basis built around a single axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateFrame {
    pub front: Vec3,
    pub lateral: Vec3,
    pub up: Vec3,
}

impl CoordinateFrame {
    /// Build a frame whose `front` is `axis`.
    ///
    /// `axis` is expected to be normalized. When it is parallel to
    /// [`GLOBAL_UP`] (pointing up or down) the cross product with the up axis
    /// degenerates, so a fixed basis with `lateral = X` is used instead.
    pub fn from_axis(axis: Vec3) -> Self {
        let lateral = GLOBAL_UP.cross(axis);
        if lateral.length_squared() < NORMALIZE_EPSILON {
            let up = if axis.dot(GLOBAL_UP) >= 0.0 {
                Vec3::NEG_Z
            } else {
                Vec3::Z
            };
            return Self {
                front: axis,
                lateral: Vec3::X,
                up,
            };
        }

        let lateral = lateral.normalize_or_self();
        let up = axis.cross(lateral).normalize_or_self();
        Self {
            front: axis,
            lateral,
            up,
        }
    }
}
