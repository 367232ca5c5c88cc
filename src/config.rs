// Config: tunable trail/ripple parameters, stored as `config.json`.
// Visual outcomes:
// - Color, length, width and fade of the trail; ripple toggle, speed and thickness.
// - Editing the file while running changes the look within about a second.
// The renderer reads a `Config` on every update and draw; the host swaps it
// only between frames.

use crate::error::{Error, Result};
use image::Rgba;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Trail color RGBA
    pub tail_color: [u8; 4],
    /// Maximum number of live trail points
    pub tail_length: usize,
    /// Half-width of the trail head in pixels
    pub tail_width: f64,
    /// Retention per tick: each point loses `1 - decay_speed` life per tick
    pub decay_speed: f64,
    /// Cycle the trail color every tick
    pub is_rainbow: bool,
    /// Spawn ripples on click
    pub is_ripple: bool,
    /// Ripple radius growth per tick
    pub ripple_growth_speed: f64,
    /// Ripple life lost per tick
    pub ripple_decay_speed: f64,
    /// Ring thickness in pixels
    pub ripple_width: f64,
    /// UI language; unused by the renderer, kept so files round-trip
    pub language: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tail_color: [255, 0, 0, 255],
            tail_length: 20,
            tail_width: 8.0,
            decay_speed: 0.95,
            is_rainbow: false,
            is_ripple: true,
            ripple_growth_speed: 3.0,
            ripple_decay_speed: 0.04,
            ripple_width: 5.0,
            language: "auto".to_string(),
        }
    }
}

impl Config {
    /// Load from a JSON file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "config not found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let mut cfg: Self = serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        cfg.sanitize();
        debug!(?cfg, "config loaded");
        Ok(cfg)
    }

    /// Write as pretty JSON, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Replace out-of-range values with defaults. A zero `ripple_width` (an
    /// older file without the key) gets the default; a negative one is left
    /// to the geometry fallback.
    pub fn sanitize(&mut self) {
        let d = Self::default();

        if self.tail_length == 0 {
            warn!("tail_length must be > 0, using {}", d.tail_length);
            self.tail_length = d.tail_length;
        }
        if !(self.tail_width.is_finite() && self.tail_width > 0.0) {
            warn!("tail_width must be > 0, got {}", self.tail_width);
            self.tail_width = d.tail_width;
        }
        if !(0.0..1.0).contains(&self.decay_speed) {
            warn!("decay_speed must be in [0, 1), got {}", self.decay_speed);
            self.decay_speed = d.decay_speed;
        }
        if !(self.ripple_growth_speed.is_finite() && self.ripple_growth_speed > 0.0) {
            warn!("ripple_growth_speed must be > 0, got {}", self.ripple_growth_speed);
            self.ripple_growth_speed = d.ripple_growth_speed;
        }
        if !(self.ripple_decay_speed > 0.0 && self.ripple_decay_speed < 1.0) {
            warn!("ripple_decay_speed must be in (0, 1), got {}", self.ripple_decay_speed);
            self.ripple_decay_speed = d.ripple_decay_speed;
        }
        if self.ripple_width == 0.0 || !self.ripple_width.is_finite() {
            self.ripple_width = d.ripple_width;
        }
    }

    pub fn color(&self) -> Rgba<u8> {
        Rgba(self.tail_color)
    }

    /// Tail color as straight (non-premultiplied) floats in [0,1].
    pub fn color_f32(&self) -> [f32; 4] {
        let Rgba([r, g, b, a]) = self.color();
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0]
    }

    /// Rainbow mode: walk each channel at its own rate, wrapping at 255.
    pub fn step_rainbow(&mut self) {
        let c = &mut self.tail_color;
        c[0] = ((c[0] as u16 + 1) % 255) as u8;
        c[1] = ((c[1] as u16 + 2) % 255) as u8;
        c[2] = ((c[2] as u16 + 3) % 255) as u8;
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Hot reload: polls the config file's modification time and reloads it
/// when it changes. A time is only remembered once its file parsed, so a
/// half-written file is retried on the next poll.
pub struct ConfigWatcher {
    path: PathBuf,
    mtime: Option<SystemTime>,
    last_poll: Instant,
    interval: Duration,
}

impl ConfigWatcher {
    /// Load the config at `path` (defaults if missing or broken) and start
    /// watching it.
    pub fn open(path: &Path, interval: Duration) -> (Config, Self) {
        // Read the time before the contents so a write in between is seen later.
        let mtime = modified(path);
        let mut watcher = Self {
            path: path.to_path_buf(),
            mtime: None,
            last_poll: Instant::now(),
            interval,
        };
        let cfg = match Config::load(path) {
            Ok(cfg) => {
                watcher.mtime = mtime;
                cfg
            }
            Err(e) => {
                warn!("{e}; using defaults");
                Config::default()
            }
        };
        (cfg, watcher)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reload into `cfg` if the file changed since the last good load.
    /// Rate-limited to one check per interval. Returns true on reload.
    pub fn poll(&mut self, cfg: &mut Config) -> bool {
        if self.last_poll.elapsed() < self.interval {
            return false;
        }
        self.last_poll = Instant::now();

        let mtime = modified(&self.path);
        if mtime.is_none() || mtime == self.mtime {
            return false;
        }
        match Config::load(&self.path) {
            Ok(new_cfg) => {
                info!(path = %self.path.display(), "config reloaded");
                self.mtime = mtime;
                *cfg = new_cfg;
                true
            }
            Err(e) => {
                warn!("{e}; keeping current config");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn write_at(path: &Path, content: &str, mtime: SystemTime) {
        std::fs::write(path, content).unwrap();
        File::options().write(true).open(path).unwrap().set_modified(mtime).unwrap();
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = Config::load(&dir.path().join("nope.json")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sub").join("config.json");

        let mut cfg = Config::default();
        cfg.tail_color = [10, 20, 30, 200];
        cfg.tail_length = 64;
        cfg.is_rainbow = true;
        cfg.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "tail_color": [0, 255, 0, 128], "tail_length": 40 }"#).unwrap();

        let cfg = Config::load(&path).unwrap();
        assert_eq!(cfg.tail_color, [0, 255, 0, 128]);
        assert_eq!(cfg.tail_length, 40);
        assert!((cfg.ripple_growth_speed - 3.0).abs() < f64::EPSILON);
        assert!((cfg.ripple_width - 5.0).abs() < f64::EPSILON);
        assert_eq!(cfg.language, "auto");
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ tail_length: ").unwrap();

        assert!(matches!(Config::load(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_sanitize_replaces_out_of_range() {
        let mut cfg = Config {
            tail_length: 0,
            tail_width: -1.0,
            decay_speed: 1.5,
            ripple_growth_speed: 0.0,
            ripple_decay_speed: 1.0,
            ripple_width: -3.0,
            ..Config::default()
        };
        cfg.sanitize();

        let d = Config::default();
        assert_eq!(cfg.tail_length, d.tail_length);
        assert_eq!(cfg.tail_width, d.tail_width);
        assert_eq!(cfg.decay_speed, d.decay_speed);
        assert_eq!(cfg.ripple_growth_speed, d.ripple_growth_speed);
        assert_eq!(cfg.ripple_decay_speed, d.ripple_decay_speed);
        // geometry handles this one
        assert_eq!(cfg.ripple_width, -3.0);
    }

    #[test]
    fn test_zero_ripple_width_gets_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "ripple_width": 0 }"#).unwrap();

        let cfg = Config::load(&path).unwrap();
        assert_eq!(cfg.ripple_width, 5.0);

        let mut zero = Config { ripple_width: 0.0, ..Config::default() };
        zero.sanitize();
        assert_eq!(zero.ripple_width, Config::default().ripple_width);
    }

    #[test]
    fn test_watcher_reloads_on_change() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let t0 = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000);
        write_at(&path, r#"{ "tail_length": 30 }"#, t0);

        let (mut cfg, mut watcher) = ConfigWatcher::open(&path, Duration::ZERO);
        assert_eq!(cfg.tail_length, 30);

        write_at(&path, r#"{ "tail_length": 45 }"#, t0 + Duration::from_secs(5));
        assert!(watcher.poll(&mut cfg));
        assert_eq!(cfg.tail_length, 45);
    }

    #[test]
    fn test_watcher_ignores_unchanged_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let t0 = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000);
        write_at(&path, r#"{ "tail_length": 30 }"#, t0);

        let (mut cfg, mut watcher) = ConfigWatcher::open(&path, Duration::ZERO);
        cfg.tail_length = 99; // in-memory change must survive polling
        assert!(!watcher.poll(&mut cfg));
        assert!(!watcher.poll(&mut cfg));
        assert_eq!(cfg.tail_length, 99);
    }

    #[test]
    fn test_watcher_retries_after_broken_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let t0 = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000);
        write_at(&path, r#"{ "tail_length": 30 }"#, t0);
        let (mut cfg, mut watcher) = ConfigWatcher::open(&path, Duration::ZERO);

        // half-written file, then the full write lands with the same timestamp
        let t1 = t0 + Duration::from_secs(1);
        write_at(&path, r#"{ "tail_length": "#, t1);
        assert!(!watcher.poll(&mut cfg));
        assert_eq!(cfg.tail_length, 30);

        write_at(&path, r#"{ "tail_length": 50 }"#, t1);
        assert!(watcher.poll(&mut cfg));
        assert_eq!(cfg.tail_length, 50);
    }

    #[test]
    fn test_watcher_respects_interval() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let t0 = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000);
        write_at(&path, r#"{ "tail_length": 30 }"#, t0);

        let (mut cfg, mut watcher) = ConfigWatcher::open(&path, Duration::from_secs(3600));
        write_at(&path, r#"{ "tail_length": 45 }"#, t0 + Duration::from_secs(5));
        assert!(!watcher.poll(&mut cfg));
        assert_eq!(cfg.tail_length, 30);
    }

    #[test]
    fn test_rainbow_wraps_at_255() {
        let mut cfg = Config { tail_color: [254, 253, 252, 77], ..Config::default() };
        cfg.step_rainbow();
        assert_eq!(cfg.tail_color, [0, 0, 0, 77]);
        cfg.step_rainbow();
        assert_eq!(cfg.tail_color, [1, 2, 3, 77]);
    }

    #[test]
    fn test_color_f32() {
        let cfg = Config { tail_color: [255, 0, 51, 255], ..Config::default() };
        let c = cfg.color_f32();
        assert!((c[0] - 1.0).abs() < 1e-6);
        assert!(c[1].abs() < 1e-6);
        assert!((c[2] - 0.2).abs() < 1e-6);
        assert!((c[3] - 1.0).abs() < 1e-6);
    }
}
