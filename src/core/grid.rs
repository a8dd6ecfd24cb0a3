//! Generic fixed-size 2D container backing the board and piece shapes.
//!
//! Storage is row-major. Indexing out of range is a programming error and
//! panics; game-level probes (collision, corner checks) bounds-check before
//! touching the grid.

/// Row-major 2D grid of copyable cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    cells: Vec<T>,
}

impl<T: Copy + PartialEq> Grid<T> {
    /// Grid with every cell set to `fill`.
    pub fn new(rows: usize, cols: usize, fill: T) -> Self {
        Grid {
            rows,
            cols,
            cells: vec![fill; rows * cols],
        }
    }

    /// Grid from row-major literal data. `data.len()` must be `rows * cols`.
    pub fn from_rows(rows: usize, cols: usize, data: &[T]) -> Self {
        assert_eq!(data.len(), rows * cols, "grid data length mismatch");
        Grid {
            rows,
            cols,
            cells: data.to_vec(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> T {
        self.cells[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) {
        self.cells[row * self.cols + col] = value;
    }

    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }

    /// Row-major view of the backing storage.
    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    /// In-place transpose. Only square grids transpose; a non-square grid is
    /// left untouched (the board is never transposed, shapes are square).
    pub fn transpose(&mut self) {
        if self.rows != self.cols {
            return;
        }
        for r in 0..self.rows {
            for c in (r + 1)..self.cols {
                let a = self.get(r, c);
                let b = self.get(c, r);
                self.set(r, c, b);
                self.set(c, r, a);
            }
        }
    }

    /// Mirror each row horizontally.
    pub fn reverse_rows(&mut self) {
        for r in 0..self.rows {
            for c in 0..self.cols / 2 {
                let a = self.get(r, c);
                let b = self.get(r, self.cols - 1 - c);
                self.set(r, c, b);
                self.set(r, self.cols - 1 - c, a);
            }
        }
    }

    /// Mirror the grid vertically (swap rows top-to-bottom).
    pub fn flip_rows(&mut self) {
        for r in 0..self.rows / 2 {
            for c in 0..self.cols {
                let a = self.get(r, c);
                let b = self.get(self.rows - 1 - r, c);
                self.set(r, c, b);
                self.set(self.rows - 1 - r, c, a);
            }
        }
    }

    /// True iff every cell equals `empty`.
    pub fn is_empty(&self, empty: T) -> bool {
        self.cells.iter().all(|&c| c == empty)
    }
}
