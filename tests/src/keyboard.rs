
use std::sync::Arc;

use emu_lib::io::disk::MemDisk;
use emu_lib::io::keyboard::{segment_glyph, PipeKeys};
use emu_lib::{Emulator, MachineConfig};
use common::constants::*;
use common::jmp;

fn spin(emu: &mut Emulator) {
    emu.load_image(&[jmp!(0).encode()]);
}

#[test]
fn typed_text_fills_cells_in_order() {
    let mut emu = Emulator::new();
    spin(&mut emu);

    for ch in "hello".chars() {
        emu.press_key(segment_glyph(ch).unwrap());
        emu.tick().unwrap();
    }
    for (col, ch) in "hello".chars().enumerate() {
        assert_eq!(emu.video().read(0, col), segment_glyph(ch).unwrap());
        assert_eq!(emu.mem_read_word(VIDEO_START + col as u16), segment_glyph(ch).unwrap());
    }
    assert_eq!(emu.video().cursor(), 5);
    assert_eq!(emu.get_state().num_interrupts(), 5);
}

#[test]
fn unconsumed_key_is_replaced() {
    let mut emu = Emulator::new();
    spin(&mut emu);

    emu.press_key(0x11);
    emu.press_key(0x22);
    emu.tick().unwrap();
    assert_eq!(emu.video().read(0, 0), 0x22);
    assert_eq!(emu.video().read(0, 1), 0);
    assert_eq!(emu.get_state().num_interrupts(), 1);
}

#[test]
fn key_source_is_polled() {
    let keys = Arc::new(PipeKeys::default());
    keys.push_text("ab");

    let mut emu = Emulator::with_devices(MachineConfig::default(), keys.clone(), Arc::new(MemDisk::new()));
    spin(&mut emu);

    // Latched during a cycle, shown at the start of the next.
    emu.run_for(3).unwrap();
    assert!(keys.is_empty());
    assert_eq!(emu.video().read(0, 0), segment_glyph('a').unwrap());
    assert_eq!(emu.video().read(0, 1), segment_glyph('b').unwrap());
    assert_eq!(emu.get_state().num_interrupts(), 2);
}

#[test]
fn cursor_wraps_to_top() {
    let mut emu = Emulator::new();
    spin(&mut emu);

    for i in 0..=VIDEO_CELLS {
        emu.press_key(i as u16 + 1);
        emu.tick().unwrap();
    }
    assert_eq!(emu.video().read(0, 0), VIDEO_CELLS as u16 + 1);
    assert_eq!(emu.video().read(VIDEO_ROWS - 1, VIDEO_COLS - 1), VIDEO_CELLS as u16);
}
