use std::error::Error;

use clap::Parser;
use crab8_core::Chip8Interpreter;

mod config;
mod headless;

use config::Config;
use headless::{render, FrameCapture, LogBeeper, NoInput};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = Config::parse();

    let mut interpreter = Chip8Interpreter::new(
        config.clock,
        FrameCapture::default(),
        NoInput,
        LogBeeper::default(),
    );
    if let Some(max_frames) = config.max_frames() {
        interpreter = interpreter.with_max_frames(max_frames);
    }

    let state = interpreter.run(&config.program)?;
    log::info!(
        "{} frames drawn, stopped at {:#05X}",
        interpreter.display.frames_drawn,
        state.program_counter
    );

    if let Some(frame) = &interpreter.display.last_frame {
        print!("{}", render(frame));
    }

    Ok(())
}
