// Preview window for the composed image.
// R draws a fresh track, S saves the current one, ESC quits.

use minifb::{Key, KeyRepeat, Window, WindowOptions};
use trackmark::{Error, FrameBuffer, Result};

pub struct Preview {
    window: Window,
}

impl Preview {
    /// Open a window sized to the image.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let mut window = Window::new(title, width, height, WindowOptions { resize: true, ..WindowOptions::default() })
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(30);
        Ok(Self { window })
    }

    /// Push the frame to the screen.
    pub fn present(&mut self, frame: &FrameBuffer) -> Result<()> {
        self.window
            .update_with_buffer(&frame.pixels, frame.width, frame.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))
    }

    /// Pump events without new pixels.
    pub fn idle(&mut self) {
        self.window.update();
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    pub fn regenerate_pressed(&self) -> bool {
        self.window.is_key_pressed(Key::R, KeyRepeat::No)
    }

    pub fn save_pressed(&self) -> bool {
        self.window.is_key_pressed(Key::S, KeyRepeat::No)
    }
}
