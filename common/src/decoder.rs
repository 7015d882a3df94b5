
use super::asm::*;

fn decode_variant<T: InstrVariant>(word: u16, wrap: fn(T) -> Ins) -> Result<Ins, DecodeError> {
    T::decode_operands(word & Opcode::OPERAND_MASK).map(wrap)
}

pub fn decode(word: u16) -> Result<Ins, DecodeError> {
    let Some(op) = Opcode::of(word) else {
        return Err(DecodeError::UnknownInstruction(word));
    };

    match op {
        Opcode::Lod => decode_variant(word, Ins::Lod),
        Opcode::Add => decode_variant(word, Ins::Add),
        Opcode::Jmp => decode_variant(word, Ins::Jmp),
        Opcode::Halt => decode_variant(word, Ins::Halt),
    }
}
