use std::io;

use crab8_core::{
    Chip8Beeper, Chip8Display, Chip8Keyboard, Framebuffer, DISPLAY_HEIGHT, DISPLAY_WIDTH,
    KEY_COUNT,
};

/// Keeps the most recent frame instead of showing it.
#[derive(Debug, Default)]
pub struct FrameCapture {
    pub last_frame: Option<Framebuffer>,
    pub frames_drawn: u64,
}

impl Chip8Display for FrameCapture {
    fn draw(&mut self, frame: &Framebuffer) -> io::Result<()> {
        self.last_frame = Some(*frame);
        self.frames_drawn += 1;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A keyboard nobody is typing on.
#[derive(Debug, Default)]
pub struct NoInput;

impl Chip8Keyboard for NoInput {
    fn update_keystates(&mut self, keys: &mut [bool; KEY_COUNT], _: u64) -> io::Result<()> {
        keys.fill(false);
        Ok(())
    }
}

/// Logs when the sound timer starts and stops.
#[derive(Debug, Default)]
pub struct LogBeeper {
    playing: bool,
}

impl Chip8Beeper for LogBeeper {
    fn play(&mut self) {
        if !self.playing {
            log::info!("beep on");
            self.playing = true;
        }
    }

    fn pause(&mut self) {
        if self.playing {
            log::info!("beep off");
            self.playing = false;
        }
    }
}

pub fn render(frame: &Framebuffer) -> String {
    let mut out = String::with_capacity((DISPLAY_WIDTH + 1) * DISPLAY_HEIGHT);
    for row in frame.chunks(DISPLAY_WIDTH) {
        out.extend(row.iter().map(|&pixel| if pixel { '#' } else { '.' }));
        out.push('\n');
    }
    out
}
