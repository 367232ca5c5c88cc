// Trail: a short history of cursor samples that fade out over time.
// Visual outcomes:
// - Moving the cursor lays down points roughly every 2 px.
// - Each point loses life every tick; the head is fresh, the tail thins out and vanishes.

use crate::config::Config;

/// Minimum per-axis change (px) that counts as "the cursor moved".
pub const MOVE_EPSILON: f64 = 0.1;
/// Minimum spacing (px) between consecutive trail points.
pub const MIN_SPACING: f64 = 2.0;

/// One cursor sample. Visual: a joint of the trail; its width and alpha scale with `life`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailPoint {
    pub x: f64,
    pub y: f64,
    pub life: f64, // 1.0 when laid down, removed once <= 0
}

/// Live trail points, oldest first.
#[derive(Debug, Default)]
pub struct TrailState {
    points: Vec<TrailPoint>,
    last_x: f64,
    last_y: f64,
}

impl TrailState {
    pub fn with_capacity(n: usize) -> Self {
        Self { points: Vec::with_capacity(n), last_x: 0.0, last_y: 0.0 }
    }

    pub fn points(&self) -> &[TrailPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Feed this tick's cursor position, then age the trail.
    /// Returns true while any point is still alive.
    pub fn advance(&mut self, x: f64, y: f64, cfg: &Config) -> bool {
        let moved = (x - self.last_x).abs() > MOVE_EPSILON || (y - self.last_y).abs() > MOVE_EPSILON;
        if moved {
            self.last_x = x;
            self.last_y = y;
        }

        // Resample: an empty trail starts on movement, otherwise only far enough
        // from the previous sample.
        let append = match self.points.last() {
            None => moved,
            Some(last) => (x - last.x).hypot(y - last.y) > MIN_SPACING,
        };
        if append {
            self.points.push(TrailPoint { x, y, life: 1.0 });
        }

        // Cap before decay: the oldest excess points are dropped outright.
        if self.points.len() > cfg.tail_length {
            let excess = self.points.len() - cfg.tail_length;
            self.points.drain(..excess);
        }

        // `decay_speed` is a retention factor, so the loss per tick is its complement.
        let decay = 1.0 - cfg.decay_speed;
        self.points.retain_mut(|p| {
            p.life -= decay;
            p.life > 0.0
        });

        !self.points.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn from_points(points: Vec<TrailPoint>) -> Self {
        Self { points, last_x: 0.0, last_y: 0.0 }
    }
}
