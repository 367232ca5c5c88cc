// PNG export of the render target, alpha included.

use crate::error::Result;
use crate::raster::Canvas;
use image::RgbaImage;
use image::error::{ImageError, ParameterError, ParameterErrorKind};
use std::path::{Path, PathBuf};
use tracing::info;

/// Next `trail-NNNN.png` in `dir` that does not exist yet; `counter` keeps
/// the last number used so later calls continue from there.
pub fn next_free_path(dir: &Path, counter: &mut u32) -> PathBuf {
    loop {
        *counter += 1;
        let path = dir.join(format!("trail-{:04}.png", *counter));
        if !path.exists() {
            return path;
        }
    }
}

/// Write the canvas as a straight-alpha RGBA PNG.
pub fn save_png(canvas: &Canvas, path: &Path) -> Result<()> {
    let img = RgbaImage::from_raw(canvas.width as u32, canvas.height as u32, canvas.to_rgba8())
        .ok_or_else(|| {
            ImageError::Parameter(ParameterError::from_kind(ParameterErrorKind::DimensionMismatch))
        })?;
    img.save(path)?;
    info!(path = %path.display(), "snapshot saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::mesh::GeometryBuilder;
    use crate::raster::BlendState;
    use crate::ripple::RippleState;
    use crate::trail::{TrailPoint, TrailState};
    use tempfile::TempDir;

    #[test]
    fn test_snapshot_round_trip_pixels() {
        let cfg = Config { tail_color: [0, 0, 255, 255], ..Config::default() };
        let trail = TrailState::from_points(vec![
            TrailPoint { x: 4.0, y: 16.0, life: 1.0 },
            TrailPoint { x: 28.0, y: 16.0, life: 1.0 },
        ]);
        let mut geo = GeometryBuilder::new();
        let mut canvas = Canvas::new(32, 32);
        canvas.draw_mesh(geo.build(&trail, &RippleState::default(), &cfg), BlendState::MAX);

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("frame.png");
        save_png(&canvas, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (32, 32));
        assert_eq!(img.get_pixel(16, 16).0, [0, 0, 255, 255]); // on the trail
        assert_eq!(img.get_pixel(16, 0).0, [0, 0, 0, 0]);      // well outside it
    }

    #[test]
    fn test_next_free_path_skips_existing_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("trail-0001.png"), b"old").unwrap();
        std::fs::write(dir.path().join("trail-0002.png"), b"old").unwrap();

        let mut counter = 0;
        let first = next_free_path(dir.path(), &mut counter);
        assert_eq!(first, dir.path().join("trail-0003.png"));

        let second = next_free_path(dir.path(), &mut counter);
        assert_eq!(second, dir.path().join("trail-0004.png"));

        // saving does not disturb the earlier session's files
        save_png(&Canvas::new(2, 2), &first).unwrap();
        assert_eq!(std::fs::read(dir.path().join("trail-0001.png")).unwrap(), b"old");
    }
}
