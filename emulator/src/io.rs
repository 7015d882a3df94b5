pub mod disk;
pub mod keyboard;
pub mod timer;

use crate::EmulatorState;

// There's a single interrupt line; the source is only kept for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    Timer,
    Keyboard,
}

pub trait MMIOHandler: Send {
    // Called once per cycle, before fetch.
    fn tick(&mut self, _emu: &mut EmulatorState) -> Option<Interrupt> {
        None
    }
    // Called on every device when the interrupt is serviced.
    fn interrupt_accepted(&mut self, _emu: &mut EmulatorState) {}
    fn default_addrs(&self) -> &[u16] {
        &[]
    }

    fn read_word(&mut self, emu: &mut EmulatorState, addr: u16) -> u16;
    fn write_word(&mut self, emu: &mut EmulatorState, addr: u16, val: u16);
}
