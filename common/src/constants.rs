pub const WORD_SIZE: usize = 2; // Bytes

pub const MEM_WORDS: usize = (u16::MAX as usize) + 1;

pub const ROM_START: u16 = 0x0000;
pub const ROM_END: u16 = ROM_SIZE; // Exclusive
pub const ROM_SIZE: u16 = 0x0400;

// Disk transfers go through this RAM window.
pub const DISK_WINDOW_START: u16 = ROM_END;
pub const DISK_WINDOW_END: u16 = DISK_WINDOW_START + SECTOR_WORDS as u16; // Exclusive

pub const VIDEO_ROWS: usize = 25;
pub const VIDEO_COLS: usize = 80;
pub const VIDEO_CELLS: usize = VIDEO_ROWS * VIDEO_COLS;
pub const VIDEO_START: u16 = 0x2000;
pub const VIDEO_END: u16 = VIDEO_START + VIDEO_CELLS as u16; // Exclusive

pub const PORT_START: u16 = DISK_DATA_PORT;
pub const DISK_DATA_PORT: u16 = 0xfffc;
pub const DISK_SECTOR_PORT: u16 = 0xfffd;
pub const DISK_COMMAND_PORT: u16 = 0xfffe;
pub const KEYBOARD_PORT: u16 = 0xffff;

pub const SECTOR_WORDS: usize = 1024;
pub const SECTOR_COUNT: u16 = 10;
pub const DISK_WORDS: usize = SECTOR_WORDS * SECTOR_COUNT as usize;

// 8000 instructions at 8 MHz is ~20 ms.
pub const CLOCK_HZ: u32 = 8_000_000;
pub const TIMER_THRESHOLD: u16 = 8_000;
