//! Transform types for block and element rotations.

use super::Axis;
use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};

/// Block-level transform from a blockstate variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockTransform {
    /// X rotation in degrees (0, 90, 180, 270).
    pub x: i32,
    /// Y rotation in degrees (0, 90, 180, 270).
    pub y: i32,
}

impl BlockTransform {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Check if this is an identity transform (no rotation).
    pub fn is_identity(&self) -> bool {
        self.x == 0 && self.y == 0
    }

    /// Rotation matrix: X first, then Y.
    /// Angles are negated because Minecraft rotates clockwise while glam is right-handed.
    pub fn matrix(&self) -> Mat3 {
        let x_rot = Mat3::from_rotation_x((-self.x as f32).to_radians());
        let y_rot = Mat3::from_rotation_y((-self.y as f32).to_radians());
        y_rot * x_rot
    }
}

/// Element-level rotation from a model element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementRotation {
    /// Origin point for rotation (in 0-16 block coordinates).
    #[serde(default = "default_origin")]
    pub origin: [f32; 3],
    /// Axis to rotate around.
    pub axis: Axis,
    /// Rotation angle in degrees (-45 to 45, in 22.5 increments).
    pub angle: f32,
    /// Whether to rescale the element after rotation.
    #[serde(default)]
    pub rescale: bool,
}

fn default_origin() -> [f32; 3] {
    [8.0, 8.0, 8.0]
}

impl ElementRotation {
    /// Get the angle in radians.
    pub fn angle_radians(&self) -> f32 {
        self.angle.to_radians()
    }

    /// Scale applied to the two axes perpendicular to `axis`.
    pub fn rescale_factor(&self) -> f32 {
        if self.rescale {
            1.0 / self.angle_radians().cos()
        } else {
            1.0
        }
    }

    /// Pure rotation part, without rescaling.
    pub fn matrix(&self) -> Mat3 {
        let angle = self.angle_radians();
        match self.axis {
            Axis::X => Mat3::from_rotation_x(angle),
            Axis::Y => Mat3::from_rotation_y(angle),
            Axis::Z => Mat3::from_rotation_z(angle),
        }
    }

    /// Rotate a block-space point about `origin`: translate, rotate, translate back.
    pub fn apply(&self, point: [f32; 3]) -> [f32; 3] {
        let origin = Vec3::from(self.origin);
        let rotated = self.matrix() * (Vec3::from(point) - origin);

        let rescale = self.rescale_factor();
        let scaled = match self.axis {
            Axis::X => Vec3::new(rotated.x, rotated.y * rescale, rotated.z * rescale),
            Axis::Y => Vec3::new(rotated.x * rescale, rotated.y, rotated.z * rescale),
            Axis::Z => Vec3::new(rotated.x * rescale, rotated.y * rescale, rotated.z),
        };

        (scaled + origin).to_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-4)
    }

    #[test]
    fn test_origin_is_fixed_point() {
        let rot = ElementRotation {
            origin: [4.0, 5.0, 6.0],
            axis: Axis::Y,
            angle: 45.0,
            rescale: false,
        };
        assert!(approx(rot.apply([4.0, 5.0, 6.0]), [4.0, 5.0, 6.0]));
    }

    #[test]
    fn test_rotation_about_origin() {
        let rot = ElementRotation {
            origin: [8.0, 8.0, 8.0],
            axis: Axis::Y,
            angle: 90.0,
            rescale: false,
        };
        // +X offset turns to -Z under a right-handed Y rotation.
        assert!(approx(rot.apply([16.0, 8.0, 8.0]), [8.0, 8.0, 0.0]));
    }

    #[test]
    fn test_rescale_stretches_perpendicular_axes() {
        let rot = ElementRotation {
            origin: [8.0, 8.0, 8.0],
            axis: Axis::Z,
            angle: 45.0,
            rescale: true,
        };
        assert!((rot.rescale_factor() - std::f32::consts::SQRT_2).abs() < 1e-4);
        // Along the axis nothing changes.
        assert!(approx(rot.apply([8.0, 8.0, 16.0]), [8.0, 8.0, 16.0]));
    }

    #[test]
    fn test_block_transform_y_turns_north_to_east() {
        let t = BlockTransform::new(0, 90);
        let v = t.matrix() * Vec3::new(0.0, 0.0, -1.0);
        assert!(approx(v.to_array(), [1.0, 0.0, 0.0]));
    }

    #[test]
    fn test_block_transform_x_turns_up_to_north() {
        let t = BlockTransform::new(90, 0);
        let v = t.matrix() * Vec3::new(0.0, 1.0, 0.0);
        assert!(approx(v.to_array(), [0.0, 0.0, -1.0]));
    }

    #[test]
    fn test_parse_element_rotation_defaults() {
        let rot: ElementRotation = serde_json::from_str(r#"{"axis": "x", "angle": 22.5}"#).unwrap();
        assert_eq!(rot.origin, [8.0, 8.0, 8.0]);
        assert!(!rot.rescale);
    }
}
