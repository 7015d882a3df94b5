
use emu_lib::{Emulator, ExecError};
use common::constants::*;

#[test]
fn rom_rejects_writes_after_boot() {
    let mut emu = Emulator::new();
    emu.load_image(&[0xf000]);
    assert!(emu.get_state().mem().is_rom_sealed());

    for addr in [0, 1, 0x100, ROM_SIZE - 1] {
        assert_eq!(emu.mem_write_word(addr, 0xdead), Err(ExecError::ProtectionViolation { addr }));
    }
    assert_eq!(emu.mem_read_word(0), 0xf000);
    assert_eq!(emu.mem_read_word(ROM_SIZE - 1), 0);
}

#[test]
fn rom_writable_before_boot() {
    let mut emu = Emulator::new();
    assert!(!emu.get_state().mem().is_rom_sealed());
    emu.mem_write_word(5, 0x1234).unwrap();
    assert_eq!(emu.mem_read_word(5), 0x1234);
}

#[test]
fn ram_writes_read_back() {
    let mut emu = Emulator::new();
    emu.load_image(&[0xf000]);

    let addrs = [ROM_SIZE, ROM_SIZE + 1, DISK_WINDOW_END, VIDEO_START - 1, VIDEO_END, 0x8000, PORT_START - 1];
    for (i, addr) in addrs.into_iter().enumerate() {
        let val = 0x1111u16.wrapping_mul(i as u16 + 1);
        emu.mem_write_word(addr, val).unwrap();
        assert_eq!(emu.mem_read_word(addr), val, "{addr:#06x}");
    }
}

#[test]
fn image_larger_than_rom() {
    let mut image = vec![0u16; VIDEO_START as usize + 3];
    image[ROM_SIZE as usize] = 0x55;
    image[VIDEO_START as usize + 2] = 0x7f;

    let mut emu = Emulator::new();
    emu.load_image(&image);
    assert_eq!(emu.mem_read_word(ROM_SIZE), 0x55);
    assert_eq!(emu.video().read(0, 2), 0x7f);
}
