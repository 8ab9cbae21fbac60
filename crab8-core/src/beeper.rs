pub trait Chip8Beeper {
    fn play(&mut self);
    fn pause(&mut self);
}
