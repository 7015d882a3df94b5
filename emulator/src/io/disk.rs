use std::io;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use common::constants::*;
use common::mem::as_byte_slice;

use log::{debug, error, info, warn};
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use crate::config::{DiskTrigger, MachineConfig};
use crate::error::DiskError;
use crate::image::read_image;
use crate::io::{Interrupt, MMIOHandler};
use crate::EmulatorState;

/// Backing store for the disk, one `SECTOR_WORDS` sector at a time.
pub trait DiskStorage: Send + Sync {
    fn read_sector(&self, sector: u16, buf: &mut [u16]) -> io::Result<()>;
    fn write_sector(&self, sector: u16, data: &[u16]) -> io::Result<()>;
}

fn sector_range(sector: u16) -> io::Result<Range<usize>> {
    if sector >= SECTOR_COUNT {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, format!("no sector {sector}")));
    }
    let start = sector as usize * SECTOR_WORDS;
    Ok(start..start + SECTOR_WORDS)
}

// Images of the wrong size are padded with zeros or cut down.
fn fit_image(mut words: Vec<u16>, origin: &str) -> Vec<u16> {
    if words.len() != DISK_WORDS {
        warn!("Disk: {origin} has {} words, expected {DISK_WORDS}", words.len());
        words.resize(DISK_WORDS, 0);
    }
    words
}

////////////////////////////////////////////////////////////////////////////////

pub struct MemDisk {
    words: Mutex<Vec<u16>>,
}

impl Default for MemDisk {
    fn default() -> Self {
        Self::new()
    }
}

impl MemDisk {
    pub fn new() -> Self {
        Self::from_words(vec![0; DISK_WORDS])
    }

    pub fn from_words(words: Vec<u16>) -> Self {
        MemDisk { words: Mutex::new(fit_image(words, "in-memory image")) }
    }

    pub fn sector(&self, sector: u16) -> io::Result<Vec<u16>> {
        let range = sector_range(sector)?;
        Ok(self.words.lock().unwrap()[range].to_vec())
    }

    pub fn snapshot(&self) -> Vec<u16> {
        self.words.lock().unwrap().clone()
    }
}

impl DiskStorage for MemDisk {
    fn read_sector(&self, sector: u16, buf: &mut [u16]) -> io::Result<()> {
        let range = sector_range(sector)?;
        buf.copy_from_slice(&self.words.lock().unwrap()[range]);
        Ok(())
    }

    fn write_sector(&self, sector: u16, data: &[u16]) -> io::Result<()> {
        let range = sector_range(sector)?;
        self.words.lock().unwrap()[range].copy_from_slice(data);
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////

// Keeps the whole image in memory and rewrites the file on every write.
pub struct FileDisk {
    path: PathBuf,
    words: Mutex<Vec<u16>>,
}

impl FileDisk {
    // A missing file is treated as a blank disk; it's created on the first write.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let words = match read_image(&path) {
            Ok(words) => fit_image(words, &path.display().to_string()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("Disk: {} not found, starting blank", path.display());
                vec![0; DISK_WORDS]
            }
            Err(e) => return Err(e),
        };
        Ok(FileDisk { path, words: Mutex::new(words) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DiskStorage for FileDisk {
    fn read_sector(&self, sector: u16, buf: &mut [u16]) -> io::Result<()> {
        let range = sector_range(sector)?;
        buf.copy_from_slice(&self.words.lock().unwrap()[range]);
        Ok(())
    }

    fn write_sector(&self, sector: u16, data: &[u16]) -> io::Result<()> {
        let range = sector_range(sector)?;
        let mut words = self.words.lock().unwrap();
        let old = words[range.clone()].to_vec();
        words[range.clone()].copy_from_slice(data);
        if let Err(e) = std::fs::write(&self.path, as_byte_slice(&words)) {
            // Keep the in-memory copy in step with the file.
            words[range].copy_from_slice(&old);
            return Err(e);
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, FromPrimitive, PartialEq, Eq)]
pub enum DiskCommand {
    Reset = 0,
    Read = 1,
    Write = 2,
}

// Read back through DISK_DATA_PORT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiskStatus {
    #[default]
    Ok = 0,
    InvalidSector = 1,
    UnknownCommand = 2,
    IoError = 3,
}

pub struct DiskController {
    storage: Arc<dyn DiskStorage>,
    trigger: DiskTrigger,
    reset_clears_memory: bool,

    command: u16,
    pending: bool,
    sector: u16,
    status: DiskStatus,
}

impl DiskController {
    pub const DATA: u16 = DISK_DATA_PORT;
    pub const SECTOR: u16 = DISK_SECTOR_PORT;
    pub const COMMAND: u16 = DISK_COMMAND_PORT;

    pub fn new(storage: Arc<dyn DiskStorage>, config: &MachineConfig) -> Self {
        DiskController {
            storage,
            trigger: config.disk_trigger,
            reset_clears_memory: config.reset_clears_memory,

            command: 0,
            pending: false,
            sector: 0,
            status: DiskStatus::Ok,
        }
    }

    pub fn status(&self) -> DiskStatus {
        self.status
    }

    fn execute(&mut self, emu: &mut EmulatorState) -> Result<(), DiskError> {
        let Some(cmd) = DiskCommand::from_u16(self.command) else {
            return Err(DiskError::UnknownCommand(self.command));
        };
        debug!("Disk: {cmd:?}, sector {}", self.sector);

        match cmd {
            DiskCommand::Reset => self.reset(emu),
            DiskCommand::Read => self.read(emu),
            DiskCommand::Write => self.write(emu),
        }
    }

    fn reset(&mut self, emu: &mut EmulatorState) -> Result<(), DiskError> {
        self.sector = 0;
        self.command = 0;
        self.pending = false;
        if self.reset_clears_memory {
            emu.mem_mut().clear();
        }
        Ok(())
    }

    fn check_sector(&self) -> Result<u16, DiskError> {
        if self.sector >= SECTOR_COUNT {
            return Err(DiskError::InvalidSector(self.sector));
        }
        Ok(self.sector)
    }

    fn read(&mut self, emu: &mut EmulatorState) -> Result<(), DiskError> {
        let sector = self.check_sector()?;
        let mut buf = vec![0u16; SECTOR_WORDS];
        self.storage.read_sector(sector, &mut buf)?;
        emu.mem_mut().load(DISK_WINDOW_START, &buf);
        info!("Disk: read sector {sector} into {DISK_WINDOW_START:#06x}");
        Ok(())
    }

    fn write(&mut self, emu: &EmulatorState) -> Result<(), DiskError> {
        let sector = self.check_sector()?;
        let data = emu.mem().slice(DISK_WINDOW_START, SECTOR_WORDS);
        self.storage.write_sector(sector, data)?;
        info!("Disk: wrote {DISK_WINDOW_START:#06x} to sector {sector}");
        Ok(())
    }
}

impl MMIOHandler for DiskController {
    fn tick(&mut self, emu: &mut EmulatorState) -> Option<Interrupt> {
        if !self.pending {
            return None;
        }
        if self.trigger == DiskTrigger::Edge {
            self.pending = false;
        }

        self.status = match self.execute(emu) {
            Ok(()) => DiskStatus::Ok,
            Err(e) => {
                error!("Disk: {e}");
                e.status()
            }
        };
        None
    }

    fn read_word(&mut self, _: &mut EmulatorState, addr: u16) -> u16 {
        match addr {
            Self::DATA => self.status as u16,
            Self::SECTOR => self.sector,
            Self::COMMAND => self.command,
            _ => panic!("DiskController doesn't handle address {addr:#06x}"),
        }
    }

    fn write_word(&mut self, _: &mut EmulatorState, addr: u16, val: u16) {
        match addr {
            Self::DATA => warn!("Disk: ignoring write of {val:#06x} to status port"),
            Self::SECTOR => self.sector = val,
            Self::COMMAND => {
                self.command = val;
                self.pending = true;
            }
            _ => panic!("DiskController doesn't handle address {addr:#06x}"),
        }
    }

    fn default_addrs(&self) -> &[u16] {
        &[Self::DATA, Self::SECTOR, Self::COMMAND]
    }
}
