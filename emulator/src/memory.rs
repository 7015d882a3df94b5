use common::constants::*;

use log::{trace, warn};

use crate::error::ExecError;

/// Flat word-addressed memory. `[0, ROM_SIZE)` is ROM: writable until
/// `seal_rom()`, after which only the privileged `load()` path may change it.
pub struct Memory {
    words: Vec<u16>,
    rom_sealed: bool,
}

impl Memory {
    pub fn new() -> Self {
        Memory {
            words: vec![0; MEM_WORDS],
            rom_sealed: false,
        }
    }

    pub fn is_rom(addr: u16) -> bool {
        addr < ROM_END
    }

    pub fn read(&self, addr: u16) -> u16 {
        self.words[addr as usize]
    }

    pub fn write(&mut self, addr: u16, val: u16) -> Result<(), ExecError> {
        if self.rom_sealed && Self::is_rom(addr) {
            return Err(ExecError::ProtectionViolation { addr });
        }
        trace!("Mem: writing {val:#06x} to {addr:#06x}");
        self.words[addr as usize] = val;
        Ok(())
    }

    // Privileged: boot loading and disk DMA. Returns the number of words
    // copied, which is short if `data` runs past the end of memory.
    pub fn load(&mut self, start: u16, data: &[u16]) -> usize {
        let start = start as usize;
        let len = usize::min(data.len(), MEM_WORDS - start);
        if len < data.len() {
            warn!("Mem: dropping {} words past the end of memory", data.len() - len);
        }
        self.words[start..start + len].copy_from_slice(&data[..len]);
        len
    }

    pub fn slice(&self, start: u16, len: usize) -> &[u16] {
        &self.words[start as usize..start as usize + len]
    }

    pub fn seal_rom(&mut self) {
        self.rom_sealed = true;
    }

    pub fn is_rom_sealed(&self) -> bool {
        self.rom_sealed
    }

    // ROM is left alone once sealed.
    pub fn clear(&mut self) {
        let start = if self.rom_sealed { ROM_END as usize } else { 0 };
        self.words[start..].fill(0);
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}
