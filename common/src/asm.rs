use std::fmt;

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use derive_more::{IsVariant, Unwrap};
use delegate::delegate;
use thiserror::Error;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unknown instruction {0:#06x}")]
    UnknownInstruction(u16),

    #[error("invalid register r{0}")]
    InvalidRegister(u16),
}


pub trait InstrVariant: Sized {
    const OPCODE: Opcode;

    // Just the low OPERAND_BITS bits.
    fn operands(&self) -> u16;

    fn decode_operands(operands: u16) -> Result<Self, DecodeError>;

    fn encode(&self) -> u16 {
        ((Self::OPCODE as u16) << Opcode::SHIFT) | (self.operands() & Opcode::OPERAND_MASK)
    }
}


////////////////////////////////////////////////////////////////////////////////


#[derive(Debug, Clone, Copy, FromPrimitive, PartialEq, Eq)]
pub enum Reg {
    R0 = 0,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
    R8,
    R9,
    R10,
    R11,
    R12,
    R13,
    R14,
    R15,
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", format!("{:?}", self).to_lowercase())
    }
}

pub const NUM_REGS: usize = 16;

impl Reg {
    pub const NUM_BITS: u16 = 4;
    pub const MASK: u16 = (1u16 << Self::NUM_BITS) - 1;

    pub fn from_index(idx: u16) -> Result<Reg, DecodeError> {
        Reg::from_u16(idx).ok_or(DecodeError::InvalidRegister(idx))
    }

    pub fn index(self) -> usize {
        self as usize
    }
}


////////////////////////////////////////////////////////////////////////////////


// Selected by the top nibble of the instruction word.
#[derive(Debug, Clone, Copy, FromPrimitive, PartialEq, Eq)]
pub enum Opcode {
    Lod = 0x1,
    Add = 0x2,
    Jmp = 0x4,
    Halt = 0xf,
}

impl Opcode {
    pub const NUM_BITS: u32 = 4;
    pub const SHIFT: u32 = u16::BITS - Self::NUM_BITS;
    pub const OPERAND_BITS: u32 = Self::SHIFT;
    pub const OPERAND_MASK: u16 = (1u16 << Self::OPERAND_BITS) - 1;

    pub fn of(word: u16) -> Option<Opcode> {
        Opcode::from_u16(word >> Self::SHIFT)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", format!("{:?}", self).to_lowercase())
    }
}


////////////////////////////////////////////////////////////////////////////////


// reg := mem[addr]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LodIns {
    pub reg: Reg,
    pub addr: u8,
}

impl LodIns {
    const REG_SHIFT: u16 = 8;
}

impl InstrVariant for LodIns {
    const OPCODE: Opcode = Opcode::Lod;

    fn operands(&self) -> u16 {
        ((self.reg as u16) << Self::REG_SHIFT) | self.addr as u16
    }

    fn decode_operands(operands: u16) -> Result<Self, DecodeError> {
        let reg = Reg::from_index((operands >> Self::REG_SHIFT) & Reg::MASK)?;
        Ok(LodIns{reg, addr: operands as u8})
    }
}

impl fmt::Display for LodIns {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}\t{}, {:#x}", Self::OPCODE, self.reg, self.addr)
    }
}


// dst := dst + src, wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddIns {
    pub dst: Reg,
    pub src: Reg,
}

impl AddIns {
    const DST_SHIFT: u16 = 8;
    const SRC_SHIFT: u16 = 4;
}

impl InstrVariant for AddIns {
    const OPCODE: Opcode = Opcode::Add;

    fn operands(&self) -> u16 {
        ((self.dst as u16) << Self::DST_SHIFT) | ((self.src as u16) << Self::SRC_SHIFT)
    }

    fn decode_operands(operands: u16) -> Result<Self, DecodeError> {
        let dst = Reg::from_index((operands >> Self::DST_SHIFT) & Reg::MASK)?;
        let src = Reg::from_index((operands >> Self::SRC_SHIFT) & Reg::MASK)?;
        Ok(AddIns{dst, src})
    }
}

impl fmt::Display for AddIns {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}\t{}, {}", Self::OPCODE, self.dst, self.src)
    }
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JmpIns {
    pub addr: u16, // 12 bits
}

impl InstrVariant for JmpIns {
    const OPCODE: Opcode = Opcode::Jmp;

    fn operands(&self) -> u16 {
        self.addr & Opcode::OPERAND_MASK
    }

    fn decode_operands(operands: u16) -> Result<Self, DecodeError> {
        Ok(JmpIns{addr: operands & Opcode::OPERAND_MASK})
    }
}

impl fmt::Display for JmpIns {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}\t{:#05x}", Self::OPCODE, self.addr)
    }
}


// The operand bits are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HaltIns;

impl InstrVariant for HaltIns {
    const OPCODE: Opcode = Opcode::Halt;

    fn operands(&self) -> u16 {
        0
    }

    fn decode_operands(_operands: u16) -> Result<Self, DecodeError> {
        Ok(HaltIns)
    }
}

impl fmt::Display for HaltIns {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", Self::OPCODE)
    }
}


////////////////////////////////////////////////////////////////////////////////


#[derive(Debug, Clone, Copy, PartialEq, Eq, IsVariant, Unwrap)]
pub enum Ins {
    Lod(LodIns),
    Add(AddIns),
    Jmp(JmpIns),
    Halt(HaltIns),
}

impl Ins {
    delegate! {
        to match self {
            Ins::Lod(x) => x,
            Ins::Add(x) => x,
            Ins::Jmp(x) => x,
            Ins::Halt(x) => x,
        } {
            pub fn encode(&self) -> u16;
        }
    }
}

impl fmt::Display for Ins {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Ins::Lod(ins) => write!(f, "{ins}"),
            Ins::Add(ins) => write!(f, "{ins}"),
            Ins::Jmp(ins) => write!(f, "{ins}"),
            Ins::Halt(ins) => write!(f, "{ins}"),
        }
    }
}

#[macro_export]
macro_rules! lod {
    ($reg:ident, $addr:expr) => { $crate::asm::Ins::Lod($crate::asm::LodIns{reg: $crate::asm::Reg::$reg, addr: $addr}) };
}

#[macro_export]
macro_rules! add {
    ($dst:ident, $src:ident) => { $crate::asm::Ins::Add($crate::asm::AddIns{dst: $crate::asm::Reg::$dst, src: $crate::asm::Reg::$src}) };
}

#[macro_export]
macro_rules! jmp {
    ($addr:expr) => { $crate::asm::Ins::Jmp($crate::asm::JmpIns{addr: $addr}) };
}

#[macro_export]
macro_rules! halt {
    () => { $crate::asm::Ins::Halt($crate::asm::HaltIns) };
}
