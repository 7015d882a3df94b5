use crate::constants::WORD_SIZE;

use bytemuck::cast_slice;

pub fn as_byte_slice(input: &[u16]) -> &[u8] {
    cast_slice(input)
}

// Images are native-endian words. The input may not be aligned, so this copies
// rather than casting, and a trailing odd byte is dropped.
pub fn words_from_bytes(input: &[u8]) -> Vec<u16> {
    input
        .chunks_exact(WORD_SIZE)
        .map(|pair| u16::from_ne_bytes([pair[0], pair[1]]))
        .collect()
}
