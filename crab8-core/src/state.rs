use std::{fs, path::Path};

use rand::{rngs::StdRng, SeedableRng};

use crate::LoadError;

pub const RAM_SIZE: usize = 4096;
pub const PROGRAM_START: u16 = 0x200;
pub const MAX_PROGRAM_SIZE: usize = RAM_SIZE - PROGRAM_START as usize;
pub const STACK_SIZE: usize = 16;
pub const KEY_COUNT: usize = 16;
pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

pub type Framebuffer = [bool; DISPLAY_WIDTH * DISPLAY_HEIGHT];

const FONT: [u8; 16 * 5] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// The whole machine: memory, registers, stack, timers, framebuffer and keys.
///
/// Everything except `keys` and `draw_flag` should only be changed through
/// [`Chip8State::step`]. The input frontend writes `keys` between steps and
/// the display frontend clears `draw_flag` after it has drawn `display`.
#[derive(Debug, Clone)]
pub struct Chip8State {
    pub data_registers: [u8; 16],
    pub index_register: u16,
    pub program_counter: u16,
    pub stack_pointer: u8,
    pub ram: [u8; RAM_SIZE],
    pub stack: [u16; STACK_SIZE],
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub display: Framebuffer,
    pub keys: [bool; KEY_COUNT],
    pub draw_flag: bool,
    pub(crate) rng: StdRng,
}

impl Default for Chip8State {
    fn default() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl Chip8State {
    /// A machine whose `Cxkk` results are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        let mut state = Self {
            data_registers: [0; 16],
            index_register: 0,
            program_counter: PROGRAM_START,
            stack_pointer: 0,
            ram: [0; RAM_SIZE],
            stack: [0; STACK_SIZE],
            delay_timer: 0,
            sound_timer: 0,
            display: [false; DISPLAY_WIDTH * DISPLAY_HEIGHT],
            keys: [false; KEY_COUNT],
            draw_flag: false,
            rng,
        };
        state.load_font_data(&FONT);
        state
    }

    /// Zeroes the machine and reinstalls the font. The random source is kept.
    pub fn reset(&mut self) {
        self.data_registers = [0; 16];
        self.index_register = 0;
        self.program_counter = PROGRAM_START;
        self.stack_pointer = 0;
        self.ram = [0; RAM_SIZE];
        self.stack = [0; STACK_SIZE];
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.display = [false; DISPLAY_WIDTH * DISPLAY_HEIGHT];
        self.keys = [false; KEY_COUNT];
        self.draw_flag = false;
        self.load_font_data(&FONT);
    }

    fn load_font_data(&mut self, fonts: &[u8]) {
        self.ram[..fonts.len()].copy_from_slice(fonts);
    }

    /// Copies `program` to 0x200. Nothing is written if it does not fit.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), LoadError> {
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(LoadError::ProgramTooLarge {
                size: program.len(),
                max_size: MAX_PROGRAM_SIZE,
            });
        }
        let start = PROGRAM_START as usize;
        self.ram[start..start + program.len()].copy_from_slice(program);
        log::debug!("loaded {} byte program at {:#05X}", program.len(), start);
        Ok(())
    }

    pub fn load_program_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), LoadError> {
        let path = path.as_ref();
        let program = fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_program(&program)
    }

    pub fn register(&self, register_index: u8) -> u8 {
        self.data_registers[register_index as usize]
    }

    pub fn register_mut(&mut self, register_index: u8) -> &mut u8 {
        &mut self.data_registers[register_index as usize]
    }

    pub fn set_flag(&mut self, flag: bool) {
        *self.register_mut(0xF) = flag as u8;
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.display[(y % DISPLAY_HEIGHT) * DISPLAY_WIDTH + x % DISPLAY_WIDTH]
    }

    pub fn set_key(&mut self, key: u8, down: bool) {
        self.keys[(key & 0xF) as usize] = down;
    }

    /// Returns whether the framebuffer changed since the last call, clearing the flag.
    pub fn take_draw_flag(&mut self) -> bool {
        std::mem::take(&mut self.draw_flag)
    }
}
