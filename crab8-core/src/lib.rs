mod beeper;
mod cpu;
mod display;
mod error;
mod interpreter;
mod keyboard;
mod state;

pub use beeper::*;
pub use cpu::*;
pub use display::*;
pub use error::*;
pub use interpreter::*;
pub use keyboard::*;
pub use state::*;
