use common::asm::{NUM_REGS, Reg};

use log::trace;

use crate::memory::Memory;
use crate::video::VideoBuffer;

// This is separate so a mutable borrow can be passed to the MMIO handlers.
pub struct EmulatorState {
    num_ins: usize,
    num_interrupts: usize,
    mem: Memory,
    video: VideoBuffer,
    regs: [u16; NUM_REGS],
    pc: u16,
    interrupt_pending: bool,
}

impl EmulatorState {
    pub fn new() -> Self {
        EmulatorState {
            num_ins: 0usize,
            num_interrupts: 0usize,
            mem: Memory::new(),
            video: VideoBuffer::new(),
            regs: [0; NUM_REGS],
            pc: 0,
            interrupt_pending: false,
        }
    }

    pub fn inc_ins(&mut self) {
        self.num_ins += 1;
    }

    pub fn num_ins(&self) -> usize {
        self.num_ins
    }

    pub fn num_interrupts(&self) -> usize {
        self.num_interrupts
    }

    pub fn reg_write_word(&mut self, reg: Reg, val: u16) {
        trace!("Reg: writing {val:#06x} to {reg}");
        self.regs[reg.index()] = val;
    }

    pub fn reg_read_word(&self, reg: Reg) -> u16 {
        self.regs[reg.index()]
    }

    pub fn regs(&self) -> &[u16; NUM_REGS] {
        &self.regs
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn set_pc(&mut self, pc: u16) {
        self.pc = pc;
    }

    pub fn mem(&self) -> &Memory {
        &self.mem
    }

    pub fn mem_mut(&mut self) -> &mut Memory {
        &mut self.mem
    }

    pub fn video(&self) -> &VideoBuffer {
        &self.video
    }

    pub fn video_mut(&mut self) -> &mut VideoBuffer {
        &mut self.video
    }

    pub fn raise_interrupt(&mut self) {
        self.interrupt_pending = true;
    }

    pub fn interrupt_pending(&self) -> bool {
        self.interrupt_pending
    }

    pub(crate) fn interrupt_serviced(&mut self) {
        self.interrupt_pending = false;
        self.num_interrupts += 1;
    }
}

impl Default for EmulatorState {
    fn default() -> Self {
        Self::new()
    }
}
