// Core types shared by the trail core, the rasterizer and the window.

#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }
}

/// One mesh vertex: screen position plus premultiplied color.
/// Visual: the rasterizer interpolates these colors across each triangle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Vertex {
    /// `rgba` is already premultiplied (rgb scaled by a).
    #[inline]
    pub fn new(x: f64, y: f64, rgba: [f32; 4]) -> Self {
        Self { x: x as f32, y: y as f32, r: rgba[0], g: rgba[1], b: rgba[2], a: rgba[3] }
    }
}

/// Triangle list for one draw call: every 3 indices form a triangle.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

impl Mesh {
    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self { vertices: Vec::with_capacity(vertices), indices: Vec::with_capacity(indices) }
    }

    /// Truncate both buffers; capacity is kept for the next frame.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}
