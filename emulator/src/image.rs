use std::io;
use std::path::Path;

use common::asm::Reg;
use common::asm::{HaltIns, InstrVariant, LodIns};
use common::constants::{DISK_WORDS, SECTOR_WORDS};
use common::mem::{as_byte_slice, words_from_bytes};

use log::warn;

// Raw images are native-endian 16-bit words with no header.
pub fn read_image(path: impl AsRef<Path>) -> io::Result<Vec<u16>> {
    let bytes = std::fs::read(path.as_ref())?;
    if bytes.len() % 2 != 0 {
        warn!("{}: odd length, dropping the last byte", path.as_ref().display());
    }
    Ok(words_from_bytes(&bytes))
}

pub fn write_image(path: impl AsRef<Path>, words: &[u16]) -> io::Result<()> {
    std::fs::write(path, as_byte_slice(words))
}

// lod r0, 10; add r0, r0; halt; with 42 at address 10.
pub fn demo_program() -> Vec<u16> {
    let mut prog = vec![0u16; 11];
    prog[0] = LodIns { reg: Reg::R0, addr: 10 }.encode();
    // add r0, r0 with a stray low bit; bits 3-0 of ADD are ignored.
    prog[1] = 0x2001;
    prog[2] = HaltIns.encode();
    prog[10] = 42;
    prog
}

// Sector 0 filled with 0xabcd, the rest blank.
pub fn demo_disk() -> Vec<u16> {
    let mut disk = vec![0u16; DISK_WORDS];
    disk[..SECTOR_WORDS].fill(0xabcd);
    disk
}
