//! Cursor trail renderer.
//!
//! Turns a stream of cursor positions into a fading, tapering trail plus
//! click ripples, built as one triangle mesh per frame and drawn with a
//! max blend so overlapping pieces keep a uniform color.

pub mod config;
pub mod draw;
pub mod error;
pub mod frame;
pub mod mesh;
pub mod raster;
pub mod ripple;
pub mod snapshot;
pub mod trail;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use frame::FrameController;
pub use mesh::GeometryBuilder;
pub use raster::{BlendState, Canvas};
pub use ripple::{Ripple, RippleState};
pub use trail::{TrailPoint, TrailState};
pub use types::{FrameBuffer, Mesh, Vertex};
