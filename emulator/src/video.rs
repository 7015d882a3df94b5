use common::constants::{VIDEO_CELLS, VIDEO_COLS, VIDEO_ROWS};

use log::trace;

/// A `VIDEO_ROWS` x `VIDEO_COLS` grid of segment words. Bit n of a cell is
/// segment n; what that looks like is up to whoever renders it.
pub struct VideoBuffer {
    cells: Vec<u16>,
    cursor: usize,
}

impl VideoBuffer {
    pub const ROWS: usize = VIDEO_ROWS;
    pub const COLS: usize = VIDEO_COLS;

    pub fn new() -> Self {
        VideoBuffer {
            cells: vec![0; VIDEO_CELLS],
            cursor: 0,
        }
    }

    pub fn read(&self, row: usize, col: usize) -> u16 {
        self.cells[Self::index(row, col)]
    }

    pub fn read_cell(&self, idx: usize) -> u16 {
        self.cells[idx]
    }

    pub fn write_cell(&mut self, idx: usize, val: u16) {
        trace!("Video: writing {val:#06x} to cell {idx}");
        self.cells[idx] = val;
    }

    // Writes at the cursor and advances it, wrapping back to the first cell.
    pub fn put(&mut self, val: u16) {
        self.write_cell(self.cursor, val);
        self.cursor = (self.cursor + 1) % VIDEO_CELLS;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn cells(&self) -> &[u16] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u16]> {
        self.cells.chunks(Self::COLS)
    }

    fn index(row: usize, col: usize) -> usize {
        assert!(row < Self::ROWS && col < Self::COLS, "Video cell ({row}, {col}) out of range");
        row * Self::COLS + col
    }
}

impl Default for VideoBuffer {
    fn default() -> Self {
        Self::new()
    }
}
