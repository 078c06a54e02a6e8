// Window that shows a finished render.
// Visual: a window the size of the canvas opens with the mockup in it and
// stays up until you close it or press ESC.

use crate::error::{Error, Result};
use crate::surface::Canvas;
use minifb::{Key, Window, WindowOptions};

pub struct Preview {
    window: Window,
}

impl Preview {
    /// Open a window sized to the canvas.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::Window(e.to_string()))?;
        // Static image: no need to spin faster than ~30 Hz.
        window.set_target_fps(30);
        Ok(Self { window })
    }

    /// Push the canvas to the screen (its 0x00RRGGBB pixels go in as-is).
    pub fn present(&mut self, canvas: &Canvas) -> Result<()> {
        self.window
            .update_with_buffer(canvas.pixels(), canvas.width() as usize, canvas.height() as usize)
            .map_err(|e| Error::Window(e.to_string()))
    }

    /// Keep showing `canvas` until the window is closed or ESC is pressed.
    pub fn run(mut self, canvas: &Canvas) -> Result<()> {
        while self.window.is_open() && !self.window.is_key_down(Key::Escape) {
            self.present(canvas)?;
        }
        Ok(())
    }
}
