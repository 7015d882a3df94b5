
use std::sync::Arc;

use emu_lib::io::disk::{DiskCommand, DiskStatus, DiskStorage, MemDisk};
use emu_lib::{DiskTrigger, Emulator, ExecRet, MachineConfig};
use common::constants::*;
use common::jmp;

// Spins in place so the disk gets a cycle per tick.
fn machine(config: MachineConfig) -> (Emulator, Arc<MemDisk>) {
    let storage = Arc::new(MemDisk::new());
    let mut emu = Emulator::with_disk(config, storage.clone());
    emu.load_image(&[jmp!(0).encode()]);
    (emu, storage)
}

fn command(emu: &mut Emulator, sector: u16, cmd: DiskCommand) {
    emu.mem_write_word(DISK_SECTOR_PORT, sector).unwrap();
    emu.mem_write_word(DISK_COMMAND_PORT, cmd as u16).unwrap();
    assert_eq!(emu.tick(), Ok(ExecRet::Ok));
}

fn window(emu: &mut Emulator) -> Vec<u16> {
    (DISK_WINDOW_START..DISK_WINDOW_END).map(|addr| emu.mem_read_word(addr)).collect()
}

#[test]
fn round_trip_through_ports() {
    let (mut emu, storage) = machine(MachineConfig::default());

    let data: Vec<u16> = (0..SECTOR_WORDS as u16).map(|i| 0x8000 | i).collect();
    for (addr, val) in (DISK_WINDOW_START..).zip(&data) {
        emu.mem_write_word(addr, *val).unwrap();
    }
    command(&mut emu, 6, DiskCommand::Write);
    assert_eq!(emu.mem_read_word(DISK_DATA_PORT), DiskStatus::Ok as u16);
    assert_eq!(storage.sector(6).unwrap(), data);

    command(&mut emu, 2, DiskCommand::Reset);
    assert_eq!(emu.mem_read_word(DISK_SECTOR_PORT), 0);
    assert!(window(&mut emu).iter().all(|w| *w == 0));

    command(&mut emu, 6, DiskCommand::Read);
    assert_eq!(window(&mut emu), data);

    // ROM made it through the reset.
    assert_eq!(emu.mem_read_word(0), jmp!(0).encode());
}

#[test]
fn reset_can_keep_memory() {
    let config = MachineConfig { reset_clears_memory: false, ..Default::default() };
    let (mut emu, _) = machine(config);
    emu.mem_write_word(0x3000, 77).unwrap();
    command(&mut emu, 0, DiskCommand::Reset);
    assert_eq!(emu.mem_read_word(0x3000), 77);
}

#[test]
fn bad_requests_set_status() {
    let (mut emu, storage) = machine(MachineConfig::default());
    storage.write_sector(SECTOR_COUNT - 1, &[0x1111; SECTOR_WORDS]).unwrap();
    emu.mem_write_word(DISK_WINDOW_START, 0x2222).unwrap();

    command(&mut emu, SECTOR_COUNT, DiskCommand::Write);
    assert_eq!(emu.mem_read_word(DISK_DATA_PORT), DiskStatus::InvalidSector as u16);
    command(&mut emu, 0xffff, DiskCommand::Read);
    assert_eq!(emu.mem_read_word(DISK_DATA_PORT), DiskStatus::InvalidSector as u16);
    assert_eq!(emu.mem_read_word(DISK_WINDOW_START), 0x2222);

    emu.mem_write_word(DISK_COMMAND_PORT, 9).unwrap();
    assert_eq!(emu.tick(), Ok(ExecRet::Ok));
    assert_eq!(emu.mem_read_word(DISK_DATA_PORT), DiskStatus::UnknownCommand as u16);

    // A good command clears the status again, and the machine never stopped.
    command(&mut emu, SECTOR_COUNT - 1, DiskCommand::Read);
    assert_eq!(emu.mem_read_word(DISK_DATA_PORT), DiskStatus::Ok as u16);
    assert_eq!(emu.mem_read_word(DISK_WINDOW_START), 0x1111);
    assert!(!emu.is_halted());
}

#[test]
fn edge_triggered_runs_once() {
    let (mut emu, storage) = machine(MachineConfig::default());
    storage.write_sector(1, &[5; SECTOR_WORDS]).unwrap();

    command(&mut emu, 1, DiskCommand::Read);
    emu.mem_write_word(DISK_WINDOW_START, 6).unwrap();
    emu.run_for(3).unwrap();
    assert_eq!(emu.mem_read_word(DISK_WINDOW_START), 6);
}

#[test]
fn level_triggered_repeats() {
    let config = MachineConfig { disk_trigger: DiskTrigger::Level, ..Default::default() };
    let (mut emu, storage) = machine(config);
    storage.write_sector(1, &[5; SECTOR_WORDS]).unwrap();

    command(&mut emu, 1, DiskCommand::Read);
    emu.mem_write_word(DISK_WINDOW_START, 6).unwrap();
    emu.tick().unwrap();
    assert_eq!(emu.mem_read_word(DISK_WINDOW_START), 5);
}
