// Per-tick driver for the trail core.
// Visual outcomes:
// - While anything is on screen we tick at full rate so the fade is smooth.
// - After about a second of nothing, the tick rate drops to save CPU.

use crate::config::Config;
use crate::mesh::GeometryBuilder;
use crate::ripple::RippleState;
use crate::trail::TrailState;
use crate::types::Mesh;
use tracing::debug;

pub const ACTIVE_TICK_RATE: usize = 60;
pub const IDLE_TICK_RATE: usize = 15;
/// Consecutive idle ticks before dropping to the idle rate (~1 s at 60 Hz).
pub const IDLE_TICKS_BEFORE_THROTTLE: u32 = 60;

pub struct FrameController {
    trail: TrailState,
    ripples: RippleState,
    geometry: GeometryBuilder,
    idle_ticks: u32,
    tick_rate: usize,
}

impl Default for FrameController {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameController {
    pub fn new() -> Self {
        Self {
            trail: TrailState::with_capacity(200),
            ripples: RippleState::with_capacity(20),
            geometry: GeometryBuilder::new(),
            idle_ticks: 0,
            tick_rate: ACTIVE_TICK_RATE,
        }
    }

    pub fn trail(&self) -> &TrailState {
        &self.trail
    }

    pub fn ripples(&self) -> &RippleState {
        &self.ripples
    }

    /// Ticks per second the host loop should run at right now.
    pub fn tick_rate(&self) -> usize {
        self.tick_rate
    }

    /// A click at (x,y): start a ripple if they are enabled.
    pub fn click(&mut self, x: f64, y: f64, cfg: &Config) {
        self.ripples.spawn(x, y, cfg);
    }

    /// One simulation tick with this tick's cursor position.
    /// Takes the config mutably because rainbow mode recolors it.
    /// Returns true while a trail or ripple is alive.
    pub fn update(&mut self, x: f64, y: f64, cfg: &mut Config) -> bool {
        let trail_alive = self.trail.advance(x, y, cfg);
        let ripples_alive = self.ripples.advance(cfg) > 0;
        let active = trail_alive || ripples_alive;

        if active {
            self.idle_ticks = 0;
            self.set_tick_rate(ACTIVE_TICK_RATE);
        } else {
            self.idle_ticks = self.idle_ticks.saturating_add(1);
            if self.idle_ticks > IDLE_TICKS_BEFORE_THROTTLE {
                self.set_tick_rate(IDLE_TICK_RATE);
            }
        }

        if cfg.is_rainbow {
            cfg.step_rainbow();
        }

        active
    }

    /// Mesh for this frame; empty means there is nothing to draw.
    pub fn draw(&mut self, cfg: &Config) -> &Mesh {
        self.geometry.build(&self.trail, &self.ripples, cfg)
    }

    fn set_tick_rate(&mut self, rate: usize) {
        if self.tick_rate != rate {
            debug!(from = self.tick_rate, to = rate, "tick rate changed");
            self.tick_rate = rate;
        }
    }
}
