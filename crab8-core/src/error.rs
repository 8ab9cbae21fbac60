use std::{io, path::PathBuf};

/// Failure to place a program image into memory.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("could not read program {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("program is too large ({size} bytes), max size is {max_size} bytes")]
    ProgramTooLarge { size: usize, max_size: usize },
}

/// Fatal condition raised by `step`. The state is left exactly as it was
/// before the faulting instruction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("unknown opcode {opcode:#06X} at {address:#05X}")]
    UnknownOpcode { opcode: u16, address: u16 },

    #[error("stack overflow: call at {address:#05X} with 16 return addresses already stored")]
    StackOverflow { address: u16 },

    #[error("stack underflow: return at {address:#05X} with an empty call stack")]
    StackUnderflow { address: u16 },

    #[error("program counter {address:#06X} is outside of memory")]
    ProgramCounterOutOfRange { address: u16 },

    #[error("access of {len} bytes at {address:#06X} is outside of memory")]
    MemoryOutOfBounds { address: u16, len: usize },
}

/// Everything that can stop `Chip8Interpreter::run`.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("i/o error in a frontend device")]
    Io(#[from] io::Error),
}
