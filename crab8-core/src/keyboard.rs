use std::io;

use crate::KEY_COUNT;

pub trait Chip8Keyboard {
    /// Writes the current key-down state into `keys`, taking at most
    /// `max_duration_microseconds` to wait for events.
    fn update_keystates(
        &mut self,
        keys: &mut [bool; KEY_COUNT],
        max_duration_microseconds: u64,
    ) -> io::Result<()>;
}
