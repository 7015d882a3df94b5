use common::constants::TIMER_THRESHOLD;

use crate::io::Interrupt;

// Counts executed instructions rather than wall time.
pub struct Timer {
    count: u16,
    threshold: u16,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new(TIMER_THRESHOLD)
    }
}

impl Timer {
    pub fn new(threshold: u16) -> Self {
        assert!(threshold > 0);
        Timer { count: 0, threshold }
    }

    pub fn advance(&mut self) -> Option<Interrupt> {
        self.count += 1;
        if self.count >= self.threshold {
            self.count = 0;
            Some(Interrupt::Timer)
        } else {
            None
        }
    }

    pub fn count(&self) -> u16 {
        self.count
    }

    pub fn threshold(&self) -> u16 {
        self.threshold
    }
}
