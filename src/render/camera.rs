//! Isometric camera and light rig.

use glam::{EulerRot, Mat4, Quat, Vec3};

/// Distance from the look-at point along the camera boom.
pub const CAMERA_DISTANCE: f32 = 32.0;
pub const NEAR_PLANE: f32 = 0.01;
pub const FAR_PLANE: f32 = 20000.0;

/// Boom yaw (around Y) in degrees.
pub const BOOM_YAW: f32 = 45.0;
/// Boom tilt (around Z, applied before the yaw) in degrees.
pub const BOOM_PITCH: f32 = 30.0;

/// Base intensity shared by every directional light.
pub const LIGHT_INTENSITY: f32 = 2.85;
pub const AMBIENT_INTENSITY: f32 = 0.75;

/// Orthographic camera looking at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub view: Mat4,
    pub projection: Mat4,
}

impl Camera {
    /// The standard isometric view: `camera_size` model units fit across
    /// the image.
    pub fn isometric(camera_size: f32) -> Self {
        let boom = Quat::from_euler(
            EulerRot::YXZ,
            BOOM_YAW.to_radians(),
            0.0,
            BOOM_PITCH.to_radians(),
        );
        let position = boom * Vec3::new(CAMERA_DISTANCE, 0.0, 0.0);
        let half = camera_size / 2.0;

        Self {
            position,
            view: Mat4::look_at_rh(position, Vec3::ZERO, Vec3::Y),
            projection: Mat4::orthographic_rh(-half, half, -half, half, NEAR_PLANE, FAR_PLANE),
        }
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    /// Unit vector from the scene towards the camera.
    pub fn to_camera(&self) -> Vec3 {
        self.position.normalize_or_zero()
    }
}

/// A light shining from `direction` towards the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Unit vector pointing at the light.
    pub direction: Vec3,
    pub intensity: f32,
}

/// Lights used for `ShadeMode::Lit` faces.
#[derive(Debug, Clone, PartialEq)]
pub struct LightRig {
    pub lights: Vec<DirectionalLight>,
    pub ambient: Option<f32>,
}

impl LightRig {
    /// Top, east and north lights, plus optional ambient fill.
    pub fn standard(ambient: bool) -> Self {
        let light = |direction: Vec3, scale: f32| DirectionalLight {
            direction,
            intensity: LIGHT_INTENSITY * scale,
        };

        Self {
            lights: vec![
                light(Vec3::Y, 0.98),
                light(Vec3::X, 0.8),
                light(Vec3::NEG_Z, 0.608),
            ],
            ambient: ambient.then_some(AMBIENT_INTENSITY),
        }
    }

    /// Brightness factor for a surface normal, 0.0 to 1.0.
    pub fn shade(&self, normal: Vec3) -> f32 {
        let direct: f32 = self
            .lights
            .iter()
            .map(|light| light.intensity * normal.dot(light.direction).max(0.0))
            .sum();
        let ambient = self.ambient.unwrap_or(0.0);
        ((direct + ambient) / std::f32::consts::PI).clamp(0.0, 1.0)
    }
}
