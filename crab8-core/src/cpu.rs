use std::ops::Range;

use rand::Rng;

use crate::{
    state::{DISPLAY_HEIGHT, DISPLAY_WIDTH, RAM_SIZE},
    Chip8State, DecodeError,
};

/// What a successful [`Chip8State::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Executed,
    /// `Fx0A` found no key down; the program counter did not move.
    AwaitingKey,
}

impl Chip8State {
    /// Executes one instruction, then ticks both timers once.
    ///
    /// On error nothing is modified, so the faulting instruction can be
    /// inspected at `program_counter`.
    pub fn step(&mut self) -> Result<StepOutcome, DecodeError> {
        let outcome = self.execute()?;
        self.tick_timers();
        Ok(outcome)
    }

    /// The opcode at the program counter. The last word of memory, 0xFFE, is
    /// not fetchable.
    pub fn fetch(&self) -> Result<u16, DecodeError> {
        let pc = self.program_counter as usize;
        if pc >= RAM_SIZE - 2 {
            return Err(DecodeError::ProgramCounterOutOfRange {
                address: self.program_counter,
            });
        }
        Ok(u16::from_be_bytes([self.ram[pc], self.ram[pc + 1]]))
    }

    fn tick_timers(&mut self) {
        if self.delay_timer > 0 {
            self.delay_timer -= 1;
        }
        if self.sound_timer > 0 {
            self.sound_timer -= 1;
            if self.sound_timer == 0 {
                log::debug!("sound timer expired");
            }
        }
    }

    fn memory_range(&self, len: usize) -> Result<Range<usize>, DecodeError> {
        let start = self.index_register as usize;
        if start + len > RAM_SIZE {
            return Err(DecodeError::MemoryOutOfBounds {
                address: self.index_register,
                len,
            });
        }
        Ok(start..start + len)
    }

    fn execute(&mut self) -> Result<StepOutcome, DecodeError> {
        //fetch
        let address = self.program_counter;
        let opcode = self.fetch()?;
        log::trace!("{address:#05X}: {opcode:04X}");

        //decode
        let [byte_a, byte_b] = opcode.to_be_bytes();
        let nibble_0 = (byte_a & 0xF0) >> 4;
        let nibble_1 = byte_a & 0x0F;
        let nibble_2 = (byte_b & 0xF0) >> 4;
        let nibble_3 = byte_b & 0x0F;

        let target = opcode & 0x0FFF;
        let immediate_value = byte_b;

        let next = address.wrapping_add(2);
        let skip_if = |condition: bool| {
            if condition {
                address.wrapping_add(4)
            } else {
                next
            }
        };

        let mut outcome = StepOutcome::Executed;

        //execute
        let program_counter = match [nibble_0, nibble_1, nibble_2, nibble_3] {
            //clear display
            [0x0, 0x0, 0xE, 0x0] => {
                self.display.fill(false);
                self.draw_flag = true;
                next
            }
            //return
            [0x0, 0x0, 0xE, 0xE] => {
                let Some(return_address) = (self.stack_pointer as usize)
                    .checked_sub(1)
                    .and_then(|top| self.stack.get(top))
                    .copied()
                else {
                    return Err(DecodeError::StackUnderflow { address });
                };
                self.stack_pointer -= 1;
                return_address
            }
            //jump to address
            [0x1, _, _, _] => target,
            //call subroutine
            [0x2, _, _, _] => {
                let slot = self
                    .stack
                    .get_mut(self.stack_pointer as usize)
                    .ok_or(DecodeError::StackOverflow { address })?;
                *slot = next;
                self.stack_pointer += 1;
                target
            }
            //skip if Vx == NN
            [0x3, vx, _, _] => skip_if(self.register(vx) == immediate_value),
            //skip if Vx != NN
            [0x4, vx, _, _] => skip_if(self.register(vx) != immediate_value),
            //skip if Vx == Vy
            [0x5, vx, vy, 0x0] => skip_if(self.register(vx) == self.register(vy)),
            //Vx = value
            [0x6, vx, _, _] => {
                *self.register_mut(vx) = immediate_value;
                next
            }
            //Vx += value
            [0x7, vx, _, _] => {
                *self.register_mut(vx) = self.register(vx).wrapping_add(immediate_value);
                next
            }
            [0x8, vx, vy, operation] => {
                self.alu(vx, vy, operation)
                    .ok_or(DecodeError::UnknownOpcode { opcode, address })?;
                next
            }
            // Skip if Vx != Vy
            [0x9, vx, vy, 0x0] => skip_if(self.register(vx) != self.register(vy)),
            //I = address
            [0xA, _, _, _] => {
                self.index_register = target;
                next
            }
            // Jump to NNN + v0
            [0xB, _, _, _] => target + self.register(0x0) as u16,
            // Vx = rand() & NN
            [0xC, vx, _, _] => {
                *self.register_mut(vx) = immediate_value & self.rng.gen::<u8>();
                next
            }
            //Display sprite
            [0xD, vx, vy, height] => {
                let sprite = self.memory_range(height as usize)?;
                let x = self.register(vx) as usize % DISPLAY_WIDTH;
                let y = self.register(vy) as usize % DISPLAY_HEIGHT;
                let mut pixel_cleared = false;
                for (row, sprite_address) in sprite.enumerate() {
                    let to_draw = self.ram[sprite_address];
                    let row = (y + row) % DISPLAY_HEIGHT;
                    for bit in 0..8 {
                        if to_draw & (0x80 >> bit) == 0 {
                            continue;
                        }
                        let col = (x + bit) % DISPLAY_WIDTH;
                        let pixel = &mut self.display[row * DISPLAY_WIDTH + col];
                        pixel_cleared |= *pixel;
                        *pixel = !*pixel;
                    }
                }
                self.set_flag(pixel_cleared);
                self.draw_flag = true;
                next
            }
            // skip if key()
            [0xE, vx, 0x9, 0xE] => skip_if(self.keys[(self.register(vx) & 0xF) as usize]),
            // skip if !key()
            [0xE, vx, 0xA, 0x1] => skip_if(!self.keys[(self.register(vx) & 0xF) as usize]),
            // Vx = delay timer
            [0xF, vx, 0x0, 0x7] => {
                *self.register_mut(vx) = self.delay_timer;
                next
            }
            // Vx = get_key()
            [0xF, vx, 0x0, 0xA] => match self.keys.iter().position(|&down| down) {
                Some(key) => {
                    *self.register_mut(vx) = key as u8;
                    next
                }
                None => {
                    outcome = StepOutcome::AwaitingKey;
                    address
                }
            },
            // Set delay timer to vx
            [0xF, vx, 0x1, 0x5] => {
                self.delay_timer = self.register(vx);
                next
            }
            // Set sound timer to vx
            [0xF, vx, 0x1, 0x8] => {
                self.sound_timer = self.register(vx);
                next
            }
            // I += Vx
            [0xF, vx, 0x1, 0xE] => {
                self.index_register = self
                    .index_register
                    .wrapping_add(self.register(vx) as u16);
                next
            }
            // Convert and store Vx to decimal
            [0xF, vx, 0x3, 0x3] => {
                let digits = self.memory_range(3)?;
                let value = self.register(vx);
                self.ram[digits].copy_from_slice(&[value / 100, value / 10 % 10, value % 10]);
                next
            }
            // Store everything up until Vx
            [0xF, vx, 0x5, 0x5] => {
                let count = vx as usize + 1;
                let destination = self.memory_range(count)?;
                self.ram[destination].copy_from_slice(&self.data_registers[..count]);
                next
            }
            // Load everything up until Vx
            [0xF, vx, 0x6, 0x5] => {
                let count = vx as usize + 1;
                let source = self.memory_range(count)?;
                self.data_registers[..count].copy_from_slice(&self.ram[source]);
                next
            }
            _ => return Err(DecodeError::UnknownOpcode { opcode, address }),
        };

        self.program_counter = program_counter;
        Ok(outcome)
    }

    /// The `8xyN` register operations. `None` for an undefined `N`.
    ///
    /// VF is written before Vx, so with x = F the result overwrites the flag.
    fn alu(&mut self, vx: u8, vy: u8, operation: u8) -> Option<()> {
        let x = self.register(vx);
        let y = self.register(vy);
        let (result, flag) = match operation {
            //Vx = Vy
            0x0 => (y, None),
            //Vx |= Vy
            0x1 => (x | y, None),
            //Vx &= Vy
            0x2 => (x & y, None),
            //Vx ^= Vy
            0x3 => (x ^ y, None),
            //Vx += Vy
            0x4 => {
                let (result, overflow) = x.overflowing_add(y);
                (result, Some(overflow))
            }
            //Vx -= Vy
            0x5 => {
                let (result, borrow) = x.overflowing_sub(y);
                (result, Some(!borrow))
            }
            //Vx >>= 1
            0x6 => (x >> 1, Some(x & 0x01 != 0)),
            //Vx = Vy - Vx
            0x7 => {
                let (result, borrow) = y.overflowing_sub(x);
                (result, Some(!borrow))
            }
            //Vx <<= 1
            0xE => (x << 1, Some(x & 0x80 != 0)),
            _ => return None,
        };
        if let Some(flag) = flag {
            self.set_flag(flag);
        }
        *self.register_mut(vx) = result;
        Some(())
    }
}
