//! Model bounds reported by the scene when a model loads

use glam::Vec3;

/// Bounding information for the loaded model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelBounds {
    /// Center of the bounding box
    pub center: Vec3,
    /// Bounding sphere radius
    pub radius: f32,
    /// Box minimum corner
    pub min: Vec3,
    /// Box maximum corner
    pub max: Vec3,
}

impl ModelBounds {
    /// Bounds from an axis-aligned box; the radius encloses the whole box
    pub fn from_box(min: Vec3, max: Vec3) -> Self {
        let center = (min + max) * 0.5;
        Self {
            center,
            radius: (max - min).length() * 0.5,
            min,
            max,
        }
    }

    /// Bounds of a sphere, boxed
    pub fn from_sphere(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius,
            min: center - Vec3::splat(radius),
            max: center + Vec3::splat(radius),
        }
    }

    /// Vertical mid-point of the box, the height the camera frames at
    pub fn look_height(&self) -> f32 {
        (self.min.y + self.max.y) * 0.5
    }
}
