// Software rasterizer for the trail mesh.
// Visual outcomes:
// - Every triangle is filled with its interpolated vertex colors
//   (the equivalent of drawing with a 1x1 white texture).
// - With the max blend, overlapping quads/joints/rings never get darker or
//   brighter than the strongest single piece, so the trail looks uniform.

use crate::types::{FrameBuffer, Mesh, Vertex};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendFactor {
    Zero,
    One,
    SrcAlpha,
    OneMinusSrcAlpha,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendOp {
    /// src * src_factor + dst * dst_factor
    Add,
    /// Per-channel maximum; factors are ignored, as on GPUs.
    Max,
}

/// How a premultiplied source color combines with what is already in the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlendState {
    pub src_rgb: BlendFactor,
    pub dst_rgb: BlendFactor,
    pub op_rgb: BlendOp,
    pub src_alpha: BlendFactor,
    pub dst_alpha: BlendFactor,
    pub op_alpha: BlendOp,
}

impl BlendState {
    /// One/One with Max on both color and alpha. Used for the trail.
    pub const MAX: Self = Self {
        src_rgb: BlendFactor::One,
        dst_rgb: BlendFactor::One,
        op_rgb: BlendOp::Max,
        src_alpha: BlendFactor::One,
        dst_alpha: BlendFactor::One,
        op_alpha: BlendOp::Max,
    };

    /// Regular premultiplied "over".
    pub const SOURCE_OVER: Self = Self {
        src_rgb: BlendFactor::One,
        dst_rgb: BlendFactor::OneMinusSrcAlpha,
        op_rgb: BlendOp::Add,
        src_alpha: BlendFactor::One,
        dst_alpha: BlendFactor::OneMinusSrcAlpha,
        op_alpha: BlendOp::Add,
    };

    #[inline]
    pub fn apply(&self, src: [f32; 4], dst: [f32; 4]) -> [f32; 4] {
        let sa = src[3];
        let mut out = [0.0f32; 4];
        for c in 0..3 {
            out[c] = combine(self.op_rgb, src[c], factor(self.src_rgb, sa), dst[c], factor(self.dst_rgb, sa));
        }
        out[3] = combine(self.op_alpha, src[3], factor(self.src_alpha, sa), dst[3], factor(self.dst_alpha, sa));
        out
    }
}

#[inline]
fn factor(f: BlendFactor, src_alpha: f32) -> f32 {
    match f {
        BlendFactor::Zero => 0.0,
        BlendFactor::One => 1.0,
        BlendFactor::SrcAlpha => src_alpha,
        BlendFactor::OneMinusSrcAlpha => 1.0 - src_alpha,
    }
}

#[inline]
fn combine(op: BlendOp, s: f32, sf: f32, d: f32, df: f32) -> f32 {
    match op {
        BlendOp::Add => (s * sf + d * df).min(1.0),
        BlendOp::Max => s.max(d),
    }
}

/// Premultiplied RGBA render target, cleared to transparent each frame.
pub struct Canvas {
    pub width: usize,
    pub height: usize,
    pixels: Vec<[f32; 4]>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![[0.0; 4]; width * height] }
    }

    pub fn clear(&mut self) {
        self.pixels.fill([0.0; 4]);
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [f32; 4] {
        self.pixels[y * self.width + x]
    }

    /// Draw every indexed triangle of `mesh`. Triangles that reference
    /// missing vertices or have no area are skipped.
    pub fn draw_mesh(&mut self, mesh: &Mesh, blend: BlendState) {
        for tri in mesh.indices.chunks_exact(3) {
            let (Some(v0), Some(v1), Some(v2)) = (
                mesh.vertices.get(tri[0] as usize),
                mesh.vertices.get(tri[1] as usize),
                mesh.vertices.get(tri[2] as usize),
            ) else {
                continue;
            };
            self.fill_triangle(v0, v1, v2, blend);
        }
    }

    fn fill_triangle(&mut self, v0: &Vertex, v1: &Vertex, v2: &Vertex, blend: BlendState) {
        let area = edge_function(v0, v1, v2.x, v2.y);
        if area == 0.0 || !area.is_finite() {
            return;
        }

        // Bounding box, clipped to the canvas
        let min_x = v0.x.min(v1.x).min(v2.x).floor().max(0.0);
        let max_x = v0.x.max(v1.x).max(v2.x).ceil().min(self.width as f32 - 1.0);
        let min_y = v0.y.min(v1.y).min(v2.y).floor().max(0.0);
        let max_y = v0.y.max(v1.y).max(v2.y).ceil().min(self.height as f32 - 1.0);
        if min_x > max_x || min_y > max_y {
            return;
        }

        for y in min_y as usize..=max_y as usize {
            for x in min_x as usize..=max_x as usize {
                // Sample at the pixel center
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                // Dividing by the signed area makes both windings positive inside.
                let w0 = edge_function(v1, v2, px, py) / area;
                let w1 = edge_function(v2, v0, px, py) / area;
                let w2 = edge_function(v0, v1, px, py) / area;
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let src = [
                    v0.r * w0 + v1.r * w1 + v2.r * w2,
                    v0.g * w0 + v1.g * w1 + v2.g * w2,
                    v0.b * w0 + v1.b * w1 + v2.b * w2,
                    v0.a * w0 + v1.a * w1 + v2.a * w2,
                ];
                let idx = y * self.width + x;
                self.pixels[idx] = blend.apply(src, self.pixels[idx]);
            }
        }
    }

    /// Composite over black into the window buffer (0x00RRGGBB).
    pub fn present_into(&self, fb: &mut FrameBuffer) {
        for (dst, px) in fb.pixels.iter_mut().zip(&self.pixels) {
            let r = to_u8(px[0]) as u32;
            let g = to_u8(px[1]) as u32;
            let b = to_u8(px[2]) as u32;
            *dst = (r << 16) | (g << 8) | b;
        }
    }

    /// Straight-alpha RGBA8 bytes, row-major. Used for PNG export.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for px in &self.pixels {
            let a = px[3];
            if a <= 0.0 {
                out.extend_from_slice(&[0, 0, 0, 0]);
                continue;
            }
            out.extend_from_slice(&[to_u8(px[0] / a), to_u8(px[1] / a), to_u8(px[2] / a), to_u8(a)]);
        }
        out
    }
}

/// Signed doubled area of (a, b, p).
#[inline]
fn edge_function(a: &Vertex, b: &Vertex, px: f32, py: f32) -> f32 {
    (px - a.x) * (b.y - a.y) - (py - a.y) * (b.x - a.x)
}

#[inline]
fn to_u8(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}
