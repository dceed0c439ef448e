// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Boolean Grid Mask
// ─────────────────────────────────────────────────────────────────────
//! Row-major boolean mask over the (γ rows) × (K cols) sweep grid.

use serde::{Deserialize, Serialize};

use crate::error::{SweepError, SweepResult};

/// Ringing labels for a full grid, stored row-major (γ outer, K inner).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridMask {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl GridMask {
    /// All-false mask.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![false; rows * cols],
        }
    }

    /// Build from row-major cells; the length must equal `rows * cols`.
    pub fn from_cells(rows: usize, cols: usize, cells: Vec<bool>) -> SweepResult<Self> {
        if cells.len() != rows * cols {
            return Err(SweepError::Validation(format!(
                "mask has {} cells, expected {rows}x{cols}",
                cells.len()
            )));
        }
        Ok(Self { rows, cols, cells })
    }

    /// Build from nested rows (convenient in tests and for ad-hoc masks).
    pub fn from_rows(rows: &[Vec<bool>]) -> SweepResult<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != cols) {
            return Err(SweepError::Validation(
                "ragged rows in grid mask".to_string(),
            ));
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            cells: rows.iter().flatten().copied().collect(),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols && self.cells[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: bool) {
        if row < self.rows && col < self.cols {
            self.cells[row * self.cols + col] = value;
        }
    }

    /// One γ row as a slice over K; `None` past the last row.
    pub fn row(&self, row: usize) -> Option<&[bool]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        self.cells.get(start..start + self.cols)
    }

    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    /// Number of true cells (|S|).
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Fraction of true cells; 0 for an empty grid.
    pub fn area_fraction(&self) -> f64 {
        if self.cells.is_empty() {
            return 0.0;
        }
        self.count() as f64 / self.cells.len() as f64
    }
}
