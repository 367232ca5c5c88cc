// Ripples: rings that expand from a click point and fade out.

use crate::config::Config;

/// Radius of a freshly spawned ripple (px).
pub const SPAWN_RADIUS: f64 = 2.0;

/// One click ripple. Visual: a ring centered on (x,y) that widens as `life` drops.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ripple {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub life: f64,
}

/// Live ripples in spawn order. Not capped: only decay removes them.
#[derive(Debug, Default)]
pub struct RippleState {
    ripples: Vec<Ripple>,
}

impl RippleState {
    pub fn with_capacity(n: usize) -> Self {
        Self { ripples: Vec::with_capacity(n) }
    }

    pub fn ripples(&self) -> &[Ripple] {
        &self.ripples
    }

    pub fn len(&self) -> usize {
        self.ripples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ripples.is_empty()
    }

    /// Start a ripple at (x,y). Does nothing while ripples are switched off.
    pub fn spawn(&mut self, x: f64, y: f64, cfg: &Config) {
        if !cfg.is_ripple {
            return;
        }
        self.ripples.push(Ripple { x, y, radius: SPAWN_RADIUS, life: 1.0 });
    }

    /// Grow and fade every ripple, dropping the dead ones.
    /// Returns how many are still alive.
    pub fn advance(&mut self, cfg: &Config) -> usize {
        self.ripples.retain_mut(|r| {
            r.radius += cfg.ripple_growth_speed;
            r.life -= cfg.ripple_decay_speed;
            r.life > 0.0
        });
        self.ripples.len()
    }
}
