use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "crab8")]
#[command(about = "Headless CHIP-8 interpreter", long_about = None)]
pub struct Config {
    /// Path to the CHIP-8 program image
    pub program: PathBuf,

    /// Instructions executed per second
    #[arg(long, default_value_t = 700, value_parser = clap::value_parser!(u32).range(1..))]
    pub clock: u32,

    /// Frames to run at 60 Hz before stopping (0 runs until the program faults)
    #[arg(long, default_value_t = 600)]
    pub frames: u64,
}

impl Config {
    pub fn max_frames(&self) -> Option<u64> {
        (self.frames > 0).then_some(self.frames)
    }
}
