// Geometry: turns the live trail + ripples into one triangle mesh per frame.
// Visual outcomes:
// - The trail is a ribbon of quads that tapers with each point's life,
//   with round joints so corners don't show gaps.
// - Each ripple is a flat ring.
// All colors are premultiplied so the mesh can be drawn with the max blend.

use crate::config::Config;
use crate::ripple::RippleState;
use crate::trail::TrailState;
use crate::types::{Mesh, Vertex};
use std::f64::consts::TAU;
use tracing::trace;

/// Triangles per joint/cap disc.
pub const CIRCLE_SEGMENTS: usize = 12;
/// Sections per ripple ring.
pub const RING_SEGMENTS: usize = 20;
/// Ring thickness used when the configured width is not positive.
pub const FALLBACK_RIPPLE_WIDTH: f64 = 2.0;
/// Discs smaller than this are not worth drawing.
const MIN_DISC_RADIUS: f64 = 0.5;

/// Owns the reusable vertex/index buffers.
pub struct GeometryBuilder {
    mesh: Mesh,
}

impl Default for GeometryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryBuilder {
    pub fn new() -> Self {
        Self { mesh: Mesh::with_capacity(1000, 1000) }
    }

    /// Rebuild the mesh for this frame. Empty when nothing is alive.
    pub fn build(&mut self, trail: &TrailState, ripples: &RippleState, cfg: &Config) -> &Mesh {
        self.mesh.clear();

        let [r, g, b, a] = cfg.color_f32();
        let color = Tint { r, g, b, a };

        self.add_trail(trail, cfg.tail_width, color);
        self.add_ripples(ripples, cfg.ripple_width, color);

        trace!(
            vertices = self.mesh.vertices.len(),
            triangles = self.mesh.triangle_count(),
            "mesh built"
        );
        &self.mesh
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    fn add_trail(&mut self, trail: &TrailState, width: f64, color: Tint) {
        let points = trail.points();
        if points.len() < 2 {
            return;
        }

        for pair in points.windows(2) {
            let (p1, p2) = (pair[0], pair[1]);

            let dx = p2.x - p1.x;
            let dy = p2.y - p1.y;
            let len = dx.hypot(dy);
            if len == 0.0 {
                continue;
            }

            // Unit direction rotated 90 degrees.
            let nx = -dy / len;
            let ny = dx / len;

            let w1 = width * p1.life;
            let w2 = width * p2.life;
            let c1 = color.faded(p1.life);
            let c2 = color.faded(p2.life);

            if let Some(base) = self.reserve(4) {
                let v = &mut self.mesh.vertices;
                v.push(Vertex::new(p1.x + nx * w1, p1.y + ny * w1, c1));
                v.push(Vertex::new(p1.x - nx * w1, p1.y - ny * w1, c1));
                v.push(Vertex::new(p2.x + nx * w2, p2.y + ny * w2, c2));
                v.push(Vertex::new(p2.x - nx * w2, p2.y - ny * w2, c2));
                self.mesh
                    .indices
                    .extend_from_slice(&[base, base + 1, base + 2, base + 1, base + 3, base + 2]);
            }

            // Round joint at the start of every segment.
            self.add_disc(p1.x, p1.y, w1, c1);
        }

        // Round cap on the head.
        if let Some(last) = points.last() {
            self.add_disc(last.x, last.y, width * last.life, color.faded(last.life));
        }
    }

    /// Filled circle as a fan around a center vertex.
    fn add_disc(&mut self, x: f64, y: f64, radius: f64, rgba: [f32; 4]) {
        if radius < MIN_DISC_RADIUS {
            return;
        }
        let Some(center) = self.reserve(1 + CIRCLE_SEGMENTS) else {
            return;
        };

        self.mesh.vertices.push(Vertex::new(x, y, rgba));
        for i in 0..CIRCLE_SEGMENTS {
            let angle = i as f64 * TAU / CIRCLE_SEGMENTS as f64;
            let (sin, cos) = angle.sin_cos();
            self.mesh.vertices.push(Vertex::new(x + radius * cos, y + radius * sin, rgba));
        }

        let n = CIRCLE_SEGMENTS as u16;
        for i in 0..n {
            let next = (i + 1) % n;
            self.mesh.indices.extend_from_slice(&[center, center + 1 + i, center + 1 + next]);
        }
    }

    fn add_ripples(&mut self, ripples: &RippleState, width: f64, color: Tint) {
        let thickness = if width > 0.0 { width } else { FALLBACK_RIPPLE_WIDTH };

        for ripple in ripples.ripples() {
            let rgba = color.faded(ripple.life);
            if rgba[3] <= 0.0 {
                continue;
            }

            let r_in = ripple.radius;
            let r_out = ripple.radius + thickness;

            let Some(base) = self.reserve(2 * (RING_SEGMENTS + 1)) else {
                continue;
            };

            // Inner/outer pairs; the seam pair repeats the first angle.
            for i in 0..=RING_SEGMENTS {
                let angle = i as f64 * TAU / RING_SEGMENTS as f64;
                let (sin, cos) = angle.sin_cos();
                self.mesh
                    .vertices
                    .push(Vertex::new(ripple.x + r_in * cos, ripple.y + r_in * sin, rgba));
                self.mesh
                    .vertices
                    .push(Vertex::new(ripple.x + r_out * cos, ripple.y + r_out * sin, rgba));
            }

            for i in 0..RING_SEGMENTS as u16 {
                let idx = base + i * 2;
                self.mesh
                    .indices
                    .extend_from_slice(&[idx, idx + 1, idx + 2, idx + 1, idx + 3, idx + 2]);
            }
        }
    }

    /// Base index for `count` new vertices, or None if they would not fit in u16.
    fn reserve(&self, count: usize) -> Option<u16> {
        let base = self.mesh.vertices.len();
        if base + count > u16::MAX as usize + 1 {
            return None;
        }
        Some(base as u16)
    }
}

/// Straight tail color; `faded` gives the premultiplied vertex color.
#[derive(Clone, Copy)]
struct Tint {
    r: f32,
    g: f32,
    b: f32,
    a: f32,
}

impl Tint {
    #[inline]
    fn faded(self, life: f64) -> [f32; 4] {
        let a = self.a * life as f32;
        [self.r * a, self.g * a, self.b * a, a]
    }
}
