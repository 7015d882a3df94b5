
use common::asm::*;
use common::decoder::decode;
use common::constants::*;
use crate::config::{MachineConfig, RomLoadPolicy};
use crate::error::{DiskError, ExecError};
use crate::io::disk::{DiskController, DiskStorage, MemDisk};
use crate::io::keyboard::{KeySource, Keyboard, NoKeys};
use crate::io::timer::Timer;
use crate::io::Interrupt;
use crate::memory::Memory;
use crate::video::VideoBuffer;
use crate::EmulatorState;
use crate::MMIOHandler;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use log::{debug, error, info, warn};


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecRet {
    Ok,
    Halt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuState {
    Running,
    ServicingInterrupt,
    Halted,
}


pub struct Emulator {
    state: EmulatorState,
    config: MachineConfig,
    mmio_handlers: HashMap<u16, Arc<Mutex<dyn MMIOHandler>>>,
    // Each handler once, however many ports it has.
    devices: Vec<Arc<Mutex<dyn MMIOHandler>>>,
    timer: Timer,
    cpu: CpuState,
    fault: Option<ExecError>,
}

impl Emulator {
    pub fn new() -> Emulator {
        Self::with_config(MachineConfig::default())
    }

    // Default devices over a blank in-memory disk.
    pub fn with_config(config: MachineConfig) -> Emulator {
        Self::with_disk(config, Arc::new(MemDisk::new()))
    }

    pub fn with_disk(config: MachineConfig, storage: Arc<dyn DiskStorage>) -> Emulator {
        Self::with_devices(config, Arc::new(NoKeys()), storage)
    }

    // A keyboard polling `keys`, and a disk controller on `storage`.
    pub fn with_devices(config: MachineConfig, keys: Arc<dyn KeySource>, storage: Arc<dyn DiskStorage>) -> Emulator {
        let mut emu = Emulator {
            state: EmulatorState::new(),
            config,
            mmio_handlers: HashMap::new(),
            devices: Vec::new(),
            timer: Timer::default(),
            cpu: CpuState::Running,
            fault: None,
        };
        emu.set_mmio_handler(Keyboard::new(keys));
        emu.set_mmio_handler(DiskController::new(storage, &config));
        emu
    }

    // Run until a halt.
    pub fn run(&mut self) -> Result<(), ExecError> {
        while self.tick()? != ExecRet::Halt {}
        Ok(())
    }

    pub fn run_at(&mut self, pc: u16) -> Result<(), ExecError> {
        self.state.set_pc(pc);
        self.run()
    }

    // Run at most `ticks` cycles, stopping early on a halt.
    pub fn run_for(&mut self, ticks: usize) -> Result<ExecRet, ExecError> {
        for _ in 0..ticks {
            if self.tick()? == ExecRet::Halt {
                return Ok(ExecRet::Halt);
            }
        }
        Ok(ExecRet::Ok)
    }

    // One cycle: service a pending interrupt, give each device a time slice,
    // then fetch and execute a single instruction. A fault halts the machine
    // for good; ticking a halted machine does nothing.
    pub fn tick(&mut self) -> Result<ExecRet, ExecError> {
        if self.cpu == CpuState::Halted {
            return Ok(ExecRet::Halt);
        }

        match self.cycle() {
            Ok(ExecRet::Halt) => {
                info!("Halted at pc {:#06x} after {} instructions", self.state.pc(), self.state.num_ins());
                self.cpu = CpuState::Halted;
                Ok(ExecRet::Halt)
            }
            Ok(ExecRet::Ok) => Ok(ExecRet::Ok),
            Err(e) => {
                error!("Halting: {e}");
                self.cpu = CpuState::Halted;
                self.fault = Some(e.clone());
                Err(e)
            }
        }
    }

    fn cycle(&mut self) -> Result<ExecRet, ExecError> {
        if self.state.interrupt_pending() {
            self.service_interrupt();
        }

        if let Some(inter) = self.tick_devices() {
            debug!("Interrupt raised by {inter:?}");
            self.state.raise_interrupt();
        }

        let pc = self.state.pc();
        let word = self.fetch()?;
        let ins = decode(word).map_err(|e| ExecError::from_decode(e, pc))?;
        debug!("PC: {pc:#06x}: {ins}");

        let ret = self.exec(&ins, pc)?;
        if ret == ExecRet::Ok {
            self.state.inc_ins();
            if let Some(inter) = self.timer.advance() {
                debug!("Interrupt raised by {inter:?}");
                self.state.raise_interrupt();
            }
        }
        Ok(ret)
    }

    fn service_interrupt(&mut self) {
        self.cpu = CpuState::ServicingInterrupt;
        debug!("Servicing interrupt at pc {:#06x}", self.state.pc());
        for dev in self.devices.iter() {
            dev.lock().unwrap().interrupt_accepted(&mut self.state);
        }
        self.state.interrupt_serviced();
        self.cpu = CpuState::Running;
    }

    fn tick_devices(&mut self) -> Option<Interrupt> {
        let mut interrupt = None;
        for dev in self.devices.iter() {
            if let Some(inter) = dev.lock().unwrap().tick(&mut self.state) {
                interrupt = Some(inter);
            }
        }
        interrupt
    }

    fn fetch(&mut self) -> Result<u16, ExecError> {
        let pc = self.state.pc();
        if pc >= PORT_START {
            return Err(ExecError::PcOverrun(pc));
        }
        let word = self.mem_read_word(pc);
        self.state.set_pc(pc + 1);
        Ok(word)
    }

    // Boot load: goes around the ROM protection, then seals ROM.
    pub fn load_image(&mut self, data: &[u16]) {
        let loaded = self.state.mem_mut().load(ROM_START, data);
        let end = usize::min(data.len(), VIDEO_END as usize);
        if let Some(video) = data.get(VIDEO_START as usize..end) {
            for (idx, val) in video.iter().enumerate() {
                self.state.video_mut().write_cell(idx, *val);
            }
        }
        self.state.mem_mut().seal_rom();
        info!("Loaded {loaded} word image");
    }

    // Fill ROM from sector 0 of `storage`, then seal it.
    pub fn boot_from_disk(&mut self, storage: &dyn DiskStorage) -> Result<(), DiskError> {
        let mut rom = vec![0u16; SECTOR_WORDS];
        storage.read_sector(0, &mut rom)?;
        rom.truncate(ROM_SIZE as usize);
        self.state.mem_mut().load(ROM_START, &rom);
        self.state.mem_mut().seal_rom();
        info!("Booted {} words of ROM from disk", rom.len());
        Ok(())
    }

    pub fn set_mmio_handler(&mut self, handler: impl MMIOHandler + 'static) {
        let handler: Arc<Mutex<dyn MMIOHandler>> = Arc::new(Mutex::new(handler));
        let addrs = handler.lock().unwrap().default_addrs().to_vec();
        for addr in addrs {
            self.register_handler(handler.clone(), addr);
        }
        self.devices.push(handler);
    }

    fn register_handler(&mut self, handler: Arc<Mutex<dyn MMIOHandler>>, addr: u16) {
        assert!(addr >= PORT_START, "MMIOHandler addr {addr:#06x} outside the port region");
        let prev = self.mmio_handlers.insert(addr, handler);
        assert!(prev.is_none(), "Duplicate MMIOHandler for {addr:#06x}");
    }


    ///////////////////////////////////////////////////////////////////////////


    fn is_video(addr: u16) -> bool {
        (VIDEO_START..VIDEO_END).contains(&addr)
    }

    fn port_read(&mut self, addr: u16) -> u16 {
        if let Some(handler) = self.mmio_handlers.get(&addr) {
            return handler.lock().unwrap().read_word(&mut self.state, addr);
        }
        warn!("Read of unhandled port {addr:#06x}");
        0
    }

    fn port_write(&mut self, addr: u16, val: u16) {
        if let Some(handler) = self.mmio_handlers.get(&addr) {
            handler.lock().unwrap().write_word(&mut self.state, addr, val);
            return;
        }
        warn!("Write of {val:#06x} to unhandled port {addr:#06x}");
    }

    pub fn mem_read_word(&mut self, addr: u16) -> u16 {
        if addr >= PORT_START {
            self.port_read(addr)
        } else if Self::is_video(addr) {
            self.state.video().read_cell((addr - VIDEO_START) as usize)
        } else {
            self.state.mem().read(addr)
        }
    }

    pub fn mem_write_word(&mut self, addr: u16, val: u16) -> Result<(), ExecError> {
        if addr >= PORT_START {
            self.port_write(addr, val);
        } else if Self::is_video(addr) {
            self.state.video_mut().write_cell((addr - VIDEO_START) as usize, val);
        } else {
            self.state.mem_mut().write(addr, val)?;
        }
        Ok(())
    }

    // What an external keyboard does: overwrite the keyboard latch.
    pub fn press_key(&mut self, key: u16) {
        self.port_write(KEYBOARD_PORT, key);
    }

    pub fn get_state(&self) -> &EmulatorState {
        &self.state
    }

    pub fn get_state_mut(&mut self) -> &mut EmulatorState {
        &mut self.state
    }

    pub fn video(&self) -> &VideoBuffer {
        self.state.video()
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn cpu_state(&self) -> CpuState {
        self.cpu
    }

    pub fn is_halted(&self) -> bool {
        self.cpu == CpuState::Halted
    }

    // The error that halted the machine, if it didn't stop on a HALT.
    pub fn fault(&self) -> Option<&ExecError> {
        self.fault.as_ref()
    }

    ///////////////////////////////////////////////////////////////////////////
    // Execute
    ///////////////////////////////////////////////////////////////////////////

    fn exec_lod_ins(&mut self, ins: &LodIns, pc: u16) -> Result<(), ExecError> {
        let addr = ins.addr as u16;
        if self.config.rom_loads == RomLoadPolicy::Deny && Memory::is_rom(addr) {
            return Err(ExecError::RomAccessViolation { addr, pc });
        }
        let val = self.mem_read_word(addr);
        self.state.reg_write_word(ins.reg, val);
        Ok(())
    }

    fn exec_add_ins(&mut self, ins: &AddIns) {
        let dst = self.state.reg_read_word(ins.dst);
        let src = self.state.reg_read_word(ins.src);
        self.state.reg_write_word(ins.dst, dst.wrapping_add(src));
    }

    fn exec_jmp_ins(&mut self, ins: &JmpIns) {
        self.state.set_pc(ins.addr & Opcode::OPERAND_MASK);
    }

    fn exec(&mut self, ins: &Ins, pc: u16) -> Result<ExecRet, ExecError> {
        match ins {
            Ins::Lod(ins) => self.exec_lod_ins(ins, pc)?,
            Ins::Add(ins) => self.exec_add_ins(ins),
            Ins::Jmp(ins) => self.exec_jmp_ins(ins),
            Ins::Halt(_) => { return Ok(ExecRet::Halt); },
        }

        Ok(ExecRet::Ok)
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}
