//! Board state and the collision probe.
//!
//! The board owns its grid exclusively; every mutation goes through the
//! clear/garbage/place operations here. Cell values are ids (`0` empty,
//! `1..=7` piece kinds, anything else garbage).

use crate::core::grid::Grid;
use crate::core::rng::SimpleRng;
use crate::types::EMPTY_CELL;

#[derive(Debug, Clone)]
pub struct Board {
    grid: Grid<u8>,
    lines_cleared: u32,
}

impl Board {
    pub fn new(rows: usize, cols: usize) -> Self {
        Board {
            grid: Grid::new(rows, cols, EMPTY_CELL),
            lines_cleared: 0,
        }
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    pub fn grid(&self) -> &Grid<u8> {
        &self.grid
    }

    /// Lines cleared on this board since construction.
    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    pub fn cell(&self, row: usize, col: usize) -> u8 {
        self.grid.get(row, col)
    }

    pub fn set_cell(&mut self, row: usize, col: usize, value: u8) {
        self.grid.set(row, col, value);
    }

    /// In-bounds occupancy test. Callers pass valid coordinates.
    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        self.grid.get(row, col) != EMPTY_CELL
    }

    /// Corner-probe occupancy: anything outside the board counts as blocked.
    pub fn is_blocked_or_outside(&self, row: i32, col: i32) -> bool {
        if row < 0 || row >= self.rows() as i32 || col < 0 || col >= self.cols() as i32 {
            return true;
        }
        self.is_occupied(row as usize, col as usize)
    }

    /// Tests `shape` anchored at `(row, col)` against walls, floor, and the
    /// stack. Rows above the board never collide, so pieces may spawn and
    /// kick partly above the visible grid.
    pub fn collides(&self, shape: &Grid<u8>, row: i32, col: i32) -> bool {
        for r in 0..shape.rows() {
            for c in 0..shape.cols() {
                if shape.get(r, c) == EMPTY_CELL {
                    continue;
                }
                let target_row = row + r as i32;
                let target_col = col + c as i32;

                if target_col < 0 || target_col >= self.cols() as i32 {
                    return true;
                }
                if target_row >= self.rows() as i32 {
                    return true;
                }
                if target_row < 0 {
                    continue;
                }
                if self.is_occupied(target_row as usize, target_col as usize) {
                    return true;
                }
            }
        }
        false
    }

    fn is_row_full(&self, row: usize) -> bool {
        (0..self.cols()).all(|col| self.is_occupied(row, col))
    }

    /// Fully occupied rows, ascending.
    pub fn full_lines(&self) -> Vec<usize> {
        (0..self.rows()).filter(|&row| self.is_row_full(row)).collect()
    }

    /// Drop row `row` by shifting everything above it down one and clearing
    /// the vacated top row.
    fn clear_row(&mut self, row: usize) {
        for r in (1..=row).rev() {
            for c in 0..self.cols() {
                let above = self.grid.get(r - 1, c);
                self.grid.set(r, c, above);
            }
        }
        for c in 0..self.cols() {
            self.grid.set(0, c, EMPTY_CELL);
        }
    }

    /// The canonical clear: removes every full row top-to-bottom and returns
    /// how many fell. A deferred (frozen-time) clear runs through this same
    /// routine once the freeze expires.
    pub fn clear_full_lines(&mut self) -> u32 {
        let full = self.full_lines();
        for &row in &full {
            self.clear_row(row);
            self.lines_cleared += 1;
        }
        full.len() as u32
    }

    fn shift_up(&mut self) {
        for r in 0..self.rows() - 1 {
            for c in 0..self.cols() {
                let below = self.grid.get(r + 1, c);
                self.grid.set(r, c, below);
            }
        }
    }

    /// Injects `lines` garbage rows from the bottom, all sharing one random
    /// hole column. `lines == 0` is a no-op.
    pub fn add_garbage(&mut self, lines: u32, block_id: u8, rng: &mut SimpleRng) {
        if lines == 0 {
            return;
        }
        let hole = rng.next_range(self.cols() as u32) as usize;

        for _ in 0..lines {
            self.shift_up();
            let bottom = self.rows() - 1;
            for c in 0..self.cols() {
                let value = if c == hole { EMPTY_CELL } else { block_id };
                self.grid.set(bottom, c, value);
            }
        }
    }

    /// Stamps every non-empty shape cell into the board. The caller has
    /// already validated the placement; cells above row 0 are discarded.
    pub fn place(&mut self, shape: &Grid<u8>, row: i32, col: i32) {
        for r in 0..shape.rows() {
            for c in 0..shape.cols() {
                let value = shape.get(r, c);
                if value == EMPTY_CELL {
                    continue;
                }
                let target_row = row + r as i32;
                let target_col = col + c as i32;
                if target_row < 0
                    || target_row >= self.rows() as i32
                    || target_col < 0
                    || target_col >= self.cols() as i32
                {
                    continue;
                }
                self.grid.set(target_row as usize, target_col as usize, value);
            }
        }
    }

    /// Live emptiness check, used for the perfect-clear flag.
    pub fn is_empty(&self) -> bool {
        self.grid.is_empty(EMPTY_CELL)
    }
}
