// Window host for the trail renderer.
// Visual effects provided here:
// 1) A window that shows the rendered trail frame by frame.
// 2) Mouse position + click edges to feed the trail and ripples.
// 3) Tick-rate control so an idle overlay stops spinning at 60 Hz.

use crate::error::Error;
use crate::types::FrameBuffer;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

pub struct Drawer {
    window: Window,  // the on-screen window you see
    left_down: bool, // left button state on the previous poll
}

impl Drawer {
    /// Create a window of the given size.
    /// Visual: a new empty (black) window appears with your chosen title.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        Ok(Self { window, left_down: false })
    }

    /// Push the pixels for this frame to the screen.
    /// Visual: the window immediately displays the new frame.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// True while ESC is held down (we'll exit when this is pressed).
    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// S saves a PNG of the current frame.
    pub fn snapshot_pressed(&self) -> bool {
        self.window.is_key_pressed(Key::S, KeyRepeat::No)
    }

    /// Cursor position in window pixels, None while it is outside the window.
    pub fn mouse_pos(&self) -> Option<(f64, f64)> {
        self.window
            .get_mouse_pos(MouseMode::Discard)
            .map(|(x, y)| (x as f64, y as f64))
    }

    /// True on the tick the left button goes down (one ripple per click).
    pub fn left_clicked(&mut self) -> bool {
        let down = self.window.get_mouse_down(MouseButton::Left);
        let clicked = down && !self.left_down;
        self.left_down = down;
        clicked
    }

    /// Cap how often `present` returns, i.e. the tick rate of the main loop.
    pub fn set_tick_rate(&mut self, fps: usize) {
        self.window.set_target_fps(fps);
    }
}
