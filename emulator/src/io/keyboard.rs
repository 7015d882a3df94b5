use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use common::constants::KEYBOARD_PORT;

use log::{debug, warn};

use crate::EmulatorState;
use crate::io::{Interrupt, MMIOHandler};

/// Something that produces key presses, already encoded as the word the
/// keyboard port should hold.
pub trait KeySource: Send + Sync {
    fn poll_key(&self) -> Option<u16>;
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Default, Clone, Copy)]
pub struct NoKeys();

impl KeySource for NoKeys {
    fn poll_key(&self) -> Option<u16> {
        None
    }
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Default)]
pub struct PipeKeys {
    keys: Mutex<VecDeque<u16>>,
}

impl PipeKeys {
    pub fn push_key(&self, key: u16) {
        self.keys.lock().unwrap().push_back(key);
    }

    // Characters without a glyph are skipped.
    pub fn push_text(&self, text: &str) {
        for ch in text.chars() {
            match segment_glyph(ch) {
                Some(glyph) => self.push_key(glyph),
                None => warn!("Keyboard: no glyph for {ch:?}"),
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keys.lock().unwrap().is_empty()
    }
}

impl KeySource for PipeKeys {
    fn poll_key(&self) -> Option<u16> {
        self.keys.lock().unwrap().pop_front()
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Single-entry key latch behind `KEYBOARD_PORT`. A new key replaces one that
/// hasn't been consumed yet. Servicing an interrupt moves the latched key into
/// the video buffer at its cursor.
pub struct Keyboard {
    source: Arc<dyn KeySource>,
    latch: Option<u16>,
}

impl Default for Keyboard {
    fn default() -> Self {
        Keyboard::new(Arc::new(NoKeys()))
    }
}

impl Keyboard {
    pub const PORT: u16 = KEYBOARD_PORT;

    pub fn new(source: Arc<dyn KeySource>) -> Self {
        Keyboard { source, latch: None }
    }

    pub fn latched(&self) -> Option<u16> {
        self.latch
    }

    fn latch_key(&mut self, key: u16) {
        if let Some(old) = self.latch.replace(key) {
            debug!("Keyboard: {key:#06x} replaces unconsumed {old:#06x}");
        }
    }
}

impl MMIOHandler for Keyboard {
    fn tick(&mut self, _: &mut EmulatorState) -> Option<Interrupt> {
        let key = self.source.poll_key()?;
        self.latch_key(key);
        Some(Interrupt::Keyboard)
    }

    fn interrupt_accepted(&mut self, emu: &mut EmulatorState) {
        if let Some(key) = self.latch.take() {
            debug!("Keyboard: {key:#06x} to video cell {}", emu.video().cursor());
            emu.video_mut().put(key);
        }
    }

    fn read_word(&mut self, _: &mut EmulatorState, addr: u16) -> u16 {
        assert_eq!(addr, Self::PORT);
        self.latch.unwrap_or(0)
    }

    fn write_word(&mut self, emu: &mut EmulatorState, addr: u16, val: u16) {
        assert_eq!(addr, Self::PORT);
        self.latch_key(val);
        emu.raise_interrupt();
    }

    fn default_addrs(&self) -> &[u16] {
        &[Self::PORT]
    }
}

////////////////////////////////////////////////////////////////////////////////

/// ASCII code for a host key name, for front ends that receive named keys.
pub fn ascii_for_key(name: &str) -> Option<u8> {
    match name {
        "Return" => Some(0x0d),
        "Space" => Some(b' '),
        _ => {
            let mut chars = name.chars();
            let ch = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            let ch = ch.to_ascii_lowercase();
            (ch.is_ascii_lowercase() || ch.is_ascii_digit()).then_some(ch as u8)
        }
    }
}

/// Segment pattern used to show `ch` in a video cell. Letters are
/// case-insensitive.
pub fn segment_glyph(ch: char) -> Option<u16> {
    let glyph = match ch.to_ascii_uppercase() {
        'A' => 0b1110111,
        'B' => 0b1111100,
        'C' => 0b1011000,
        'D' => 0b1011110,
        'E' => 0b1111001,
        'F' => 0b1110001,
        'G' => 0b1011011,
        'H' => 0b1110110,
        'I' => 0b0110000,
        'J' => 0b0011110,
        'K' => 0b1110100,
        'L' => 0b0111000,
        'M' => 0b1010100,
        'N' => 0b1010111,
        'O' => 0b1011111,
        'P' => 0b1110011,
        'Q' => 0b1110111,
        'R' => 0b1010000,
        'S' => 0b1101101,
        'T' => 0b0110001,
        'U' => 0b0011111,
        'V' => 0b0011100,
        'W' => 0b1011100,
        'X' => 0b1000100,
        'Y' => 0b1100110,
        'Z' => 0b1011010,
        ' ' => 0b0000000,
        _ => return None,
    };
    Some(glyph)
}
