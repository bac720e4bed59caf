//! Shared types used throughout the library.

mod direction;
pub mod resource_location;
mod transform;

pub use direction::{Axis, Direction};
pub use resource_location::ResourceLocation;
pub use transform::{BlockTransform, ElementRotation};

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl BoundingBox {
    pub fn new(min: [f32; 3], max: [f32; 3]) -> Self {
        Self { min, max }
    }

    /// Box spanned by two opposite corners given in any order.
    pub fn from_corners(a: [f32; 3], b: [f32; 3]) -> Self {
        Self::from_points([a, b].into_iter()).unwrap_or(Self::new(a, b))
    }

    pub fn from_points(points: impl Iterator<Item = [f32; 3]>) -> Option<Self> {
        let mut min = [f32::MAX; 3];
        let mut max = [f32::MIN; 3];
        let mut has_points = false;

        for p in points {
            has_points = true;
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }

        if has_points {
            Some(Self { min, max })
        } else {
            None
        }
    }

    pub fn dimensions(&self) -> [f32; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    pub fn center(&self) -> [f32; 3] {
        [
            (self.min[0] + self.max[0]) / 2.0,
            (self.min[1] + self.max[1]) / 2.0,
            (self.min[2] + self.max[2]) / 2.0,
        ]
    }
}
