use std::{
    path::Path,
    thread,
    time::{Duration, Instant},
};

use crate::{Chip8Beeper, Chip8Display, Chip8Keyboard, Chip8State, RunError};

/// Display refreshes per second.
pub const FRAME_RATE: u32 = 60;

struct Timer {
    interval: Duration,
    last_tick: Instant,
}

impl Timer {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_tick: Instant::now(),
        }
    }

    fn time_left(&self) -> Duration {
        self.interval.saturating_sub(self.last_tick.elapsed())
    }

    fn wait(&mut self) {
        let time_left = self.time_left();
        if !time_left.is_zero() {
            thread::sleep(time_left);
        }
        self.last_tick += self.interval;
    }
}

/// Drives a [`Chip8State`] at `max_clock_speed` instructions per second and
/// connects it to the frontend devices once per frame.
pub struct Chip8Interpreter<D: Chip8Display, K: Chip8Keyboard, B: Chip8Beeper> {
    pub max_clock_speed: u32,
    pub max_frames: Option<u64>,
    pub display: D,
    pub keyboard: K,
    pub beeper: B,
}

impl<D: Chip8Display, K: Chip8Keyboard, B: Chip8Beeper> Chip8Interpreter<D, K, B> {
    pub fn new(max_clock_speed: u32, display: D, keyboard: K, beeper: B) -> Self {
        Self {
            max_clock_speed,
            max_frames: None,
            display,
            keyboard,
            beeper,
        }
    }

    /// Stop after this many frames instead of running until an error.
    pub fn with_max_frames(mut self, max_frames: u64) -> Self {
        self.max_frames = Some(max_frames);
        self
    }

    pub fn steps_per_frame(&self) -> u32 {
        (self.max_clock_speed / FRAME_RATE).max(1)
    }

    pub fn run<P: AsRef<Path>>(&mut self, path: P) -> Result<Chip8State, RunError> {
        let mut state = Chip8State::default();
        state.load_program_file(path)?;
        self.run_state(state)
    }

    pub fn run_program(&mut self, program: &[u8]) -> Result<Chip8State, RunError> {
        let mut state = Chip8State::default();
        state.load_program(program)?;
        self.run_state(state)
    }

    /// Runs an already loaded machine and hands it back once `max_frames` is reached.
    pub fn run_state(&mut self, mut state: Chip8State) -> Result<Chip8State, RunError> {
        let steps_per_frame = self.steps_per_frame();
        let mut timer = Timer::new(Duration::from_secs_f64(1. / FRAME_RATE as f64));
        let mut frame = 0;

        log::debug!(
            "running at {} Hz, {} steps per frame",
            self.max_clock_speed,
            steps_per_frame
        );

        while self.max_frames.map_or(true, |max_frames| frame < max_frames) {
            for _ in 0..steps_per_frame {
                if let Err(error) = state.step() {
                    log::warn!("stopping in frame {frame}: {error}");
                    return Err(error.into());
                }
            }

            if state.take_draw_flag() {
                self.display.draw(&state.display)?;
            }
            if state.sound_timer > 0 {
                self.beeper.play();
            } else {
                self.beeper.pause();
            }
            self.display.flush()?;

            self.keyboard
                .update_keystates(&mut state.keys, timer.time_left().as_micros() as u64)?;
            timer.wait();
            frame += 1;
        }

        Ok(state)
    }
}
