use std::io;

use crate::Framebuffer;

pub trait Chip8Display {
    /// Called with the whole framebuffer whenever the program changed it.
    fn draw(&mut self, frame: &Framebuffer) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;
}
