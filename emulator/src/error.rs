use common::asm::DecodeError;

use thiserror::Error;

use crate::io::disk::DiskStatus;

// Anything here stops the machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecError {
    #[error("write to ROM at {addr:#06x}")]
    ProtectionViolation { addr: u16 },

    #[error("load from ROM at {addr:#06x} (pc {pc:#06x})")]
    RomAccessViolation { addr: u16, pc: u16 },

    #[error("invalid register r{reg} (pc {pc:#06x})")]
    InvalidRegister { reg: u16, pc: u16 },

    #[error("unknown instruction {ins:#06x} (pc {pc:#06x})")]
    UnknownInstruction { ins: u16, pc: u16 },

    #[error("pc ran into the port region at {0:#06x}")]
    PcOverrun(u16),
}

impl ExecError {
    pub fn from_decode(err: DecodeError, pc: u16) -> Self {
        match err {
            DecodeError::UnknownInstruction(ins) => ExecError::UnknownInstruction { ins, pc },
            DecodeError::InvalidRegister(reg) => ExecError::InvalidRegister { reg, pc },
        }
    }
}

// These only abort the disk command that raised them.
#[derive(Debug, Error)]
pub enum DiskError {
    #[error("invalid sector {0}")]
    InvalidSector(u16),

    #[error("unknown disk command {0}")]
    UnknownCommand(u16),

    #[error("disk I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl DiskError {
    pub fn status(&self) -> DiskStatus {
        match self {
            DiskError::InvalidSector(_) => DiskStatus::InvalidSector,
            DiskError::UnknownCommand(_) => DiskStatus::UnknownCommand,
            DiskError::Io(_) => DiskStatus::IoError,
        }
    }
}
