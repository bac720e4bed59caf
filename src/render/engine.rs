//! Render backend boundary and the built-in CPU rasterizer.

use super::camera::{Camera, LightRig};
use crate::mesher::{Mesh, ShadeMode, Vertex};
use crate::resource_pack::TextureData;
use glam::{Mat4, Vec2, Vec3};
use image::{Rgba, RgbaImage};

/// Texels with alpha below this fraction are discarded.
pub const ALPHA_TEST: f32 = 0.1;

/// The 3D engine seam. One frame is `begin_frame`, any number of draws,
/// then `finish_frame`.
pub trait RenderBackend {
    /// Clear color and depth for a new frame.
    fn begin_frame(&mut self);

    /// Draw a textured mesh. UVs are in model texture space (0-16).
    fn draw_mesh(&mut self, mesh: &Mesh, texture: &TextureData, shade: ShadeMode);

    /// Draw a line segment on top of the scene.
    fn draw_line(&mut self, from: Vec3, to: Vec3, color: [u8; 4]);

    /// Return the finished frame.
    fn finish_frame(&mut self) -> RgbaImage;
}

struct ScreenVertex {
    position: Vec3,
    uv: Vec2,
}

/// Depth-tested, alpha-tested rasterizer with nearest texture sampling.
pub struct SoftwareBackend {
    size: u32,
    view_projection: Mat4,
    to_camera: Vec3,
    lights: LightRig,
    color: RgbaImage,
    depth: Vec<f32>,
}

impl SoftwareBackend {
    pub fn new(size: u32, camera: &Camera, lights: LightRig) -> Self {
        let size = size.max(1);
        Self {
            size,
            view_projection: camera.view_projection(),
            to_camera: camera.to_camera(),
            lights,
            color: RgbaImage::new(size, size),
            depth: vec![f32::INFINITY; (size * size) as usize],
        }
    }

    /// World position to pixel coordinates plus NDC depth.
    fn to_screen(&self, position: Vec3) -> Vec3 {
        let ndc = self.view_projection.project_point3(position);
        let size = self.size as f32;
        Vec3::new(
            (ndc.x + 1.0) * 0.5 * size,
            (1.0 - ndc.y) * 0.5 * size,
            ndc.z,
        )
    }

    fn screen_vertex(&self, vertex: &Vertex) -> ScreenVertex {
        ScreenVertex {
            position: self.to_screen(Vec3::from(vertex.position)),
            uv: Vec2::from(vertex.uv),
        }
    }

    fn draw_triangle(&mut self, tri: [ScreenVertex; 3], texture: &TextureData, light: f32) {
        let [a, b, c] = [tri[0].position, tri[1].position, tri[2].position];
        let area = edge(a, b, c);
        if area.abs() < f32::EPSILON {
            return;
        }

        let size = self.size as f32;
        let min_x = a.x.min(b.x).min(c.x).floor().max(0.0) as u32;
        let min_y = a.y.min(b.y).min(c.y).floor().max(0.0) as u32;
        let max_x = a.x.max(b.x).max(c.x).ceil().min(size) as u32;
        let max_y = a.y.max(b.y).max(c.y).ceil().min(size) as u32;

        for y in min_y..max_y {
            for x in min_x..max_x {
                let p = Vec3::new(x as f32 + 0.5, y as f32 + 0.5, 0.0);
                let w0 = edge(b, c, p) / area;
                let w1 = edge(c, a, p) / area;
                let w2 = edge(a, b, p) / area;
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let z = w0 * a.z + w1 * b.z + w2 * c.z;
                let index = (y * self.size + x) as usize;
                if z >= self.depth[index] {
                    continue;
                }

                // Orthographic projection: affine interpolation is exact.
                let uv = tri[0].uv * w0 + tri[1].uv * w1 + tri[2].uv * w2;
                let texel = texture.sample(uv.x, uv.y);
                let alpha = texel[3] as f32 / 255.0;
                if alpha < ALPHA_TEST {
                    continue;
                }

                self.depth[index] = z;
                let shaded = [
                    texel[0] as f32 * light,
                    texel[1] as f32 * light,
                    texel[2] as f32 * light,
                ];
                blend(self.color.get_pixel_mut(x, y), shaded, alpha);
            }
        }
    }
}

/// Twice the signed area of (a, b, p) in screen space.
fn edge(a: Vec3, b: Vec3, p: Vec3) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Source-over blend of a straight-alpha color onto `dst`.
fn blend(dst: &mut Rgba<u8>, src: [f32; 3], alpha: f32) {
    let dst_alpha = dst[3] as f32 / 255.0;
    let out_alpha = alpha + dst_alpha * (1.0 - alpha);
    if out_alpha <= 0.0 {
        return;
    }
    for i in 0..3 {
        let value = (src[i] * alpha + dst[i] as f32 * dst_alpha * (1.0 - alpha)) / out_alpha;
        dst[i] = value.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_alpha * 255.0).round().clamp(0.0, 255.0) as u8;
}

impl RenderBackend for SoftwareBackend {
    fn begin_frame(&mut self) {
        self.color = RgbaImage::new(self.size, self.size);
        self.depth.fill(f32::INFINITY);
    }

    fn draw_mesh(&mut self, mesh: &Mesh, texture: &TextureData, shade: ShadeMode) {
        for [v0, v1, v2] in mesh.triangles() {
            let normal = Vec3::from(v0.normal);
            // Faces turned away from the camera are hidden.
            if normal.dot(self.to_camera) <= 0.0 {
                continue;
            }

            let light = match shade {
                ShadeMode::Lit => self.lights.shade(normal),
                ShadeMode::Flat => 1.0,
            };
            let tri = [
                self.screen_vertex(v0),
                self.screen_vertex(v1),
                self.screen_vertex(v2),
            ];
            self.draw_triangle(tri, texture, light);
        }
    }

    fn draw_line(&mut self, from: Vec3, to: Vec3, color: [u8; 4]) {
        let a = self.to_screen(from);
        let b = self.to_screen(to);
        let steps = (b.x - a.x).abs().max((b.y - a.y).abs()).ceil().max(1.0) as u32;

        for i in 0..=steps {
            let p = a.lerp(b, i as f32 / steps as f32);
            if p.x < 0.0 || p.y < 0.0 {
                continue;
            }
            let (x, y) = (p.x as u32, p.y as u32);
            if x < self.size && y < self.size {
                self.color.put_pixel(x, y, Rgba(color));
            }
        }
    }

    fn finish_frame(&mut self) -> RgbaImage {
        std::mem::replace(&mut self.color, RgbaImage::new(self.size, self.size))
    }
}
