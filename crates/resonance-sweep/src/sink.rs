// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Sweep Output Sinks
// ─────────────────────────────────────────────────────────────────────
//! Receivers for cells as the sweep completes them.
//!
//! In parallel mode cells arrive in completion order, not grid order;
//! sinks that need grid order sort on `(gamma_index, k_index)`.

use parking_lot::Mutex;

use resonance_types::{GridCell, PointResult};

/// Trait for sweep output receivers.
pub trait SweepSink: Send + Sync {
    /// Called once per completed cell with all of its replicates.
    fn on_cell(&self, cell: &GridCell, points: &[PointResult]);

    /// Called when a pass ends, whether it completed or was cancelled.
    fn on_finish(&self, _completed_cells: usize) {}
}

/// Drops everything.
#[derive(Debug, Default)]
pub struct DiscardSink;

impl SweepSink for DiscardSink {
    fn on_cell(&self, _cell: &GridCell, _points: &[PointResult]) {}
}

/// In-memory sink.
///
/// Thread-safe: both buffers are guarded by one `parking_lot::Mutex`.
#[derive(Debug, Default)]
pub struct GridRecorder {
    inner: Mutex<Recorded>,
}

#[derive(Debug, Default)]
struct Recorded {
    cells: Vec<GridCell>,
    points: Vec<PointResult>,
    finished: Option<usize>,
}

impl GridRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded cells in grid (row-major) order.
    pub fn cells(&self) -> Vec<GridCell> {
        let mut cells = self.inner.lock().cells.clone();
        cells.sort_by_key(|c| (c.gamma_index, c.k_index));
        cells
    }

    /// Recorded replicates in arrival order.
    pub fn points(&self) -> Vec<PointResult> {
        self.inner.lock().points.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().cells.is_empty()
    }

    /// Completed-cell count reported by the last `on_finish`.
    pub fn finished(&self) -> Option<usize> {
        self.inner.lock().finished
    }
}

impl SweepSink for GridRecorder {
    fn on_cell(&self, cell: &GridCell, points: &[PointResult]) {
        let mut inner = self.inner.lock();
        inner.cells.push(cell.clone());
        inner.points.extend_from_slice(points);
    }

    fn on_finish(&self, completed_cells: usize) {
        self.inner.lock().finished = Some(completed_cells);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(gamma_index: usize, k_index: usize) -> GridCell {
        GridCell {
            k: k_index as f64,
            gamma: gamma_index as f64,
            gamma_index,
            k_index,
            ring_label: false,
            r_mean: 0.0,
            delta_psd_db: 0.0,
            n_over: 0.0,
            replicates: 1,
            valid_replicates: 1,
            invalid_fraction: 0.0,
            excluded: false,
        }
    }

    #[test]
    fn test_recorder_sorts_row_major() {
        let rec = GridRecorder::new();
        rec.on_cell(&cell(1, 0), &[]);
        rec.on_cell(&cell(0, 1), &[]);
        rec.on_cell(&cell(0, 0), &[]);
        let order: Vec<(usize, usize)> = rec
            .cells()
            .iter()
            .map(|c| (c.gamma_index, c.k_index))
            .collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (1, 0)]);
    }

    #[test]
    fn test_recorder_finish() {
        let rec = GridRecorder::new();
        assert!(rec.is_empty());
        assert_eq!(rec.finished(), None);
        rec.on_finish(7);
        assert_eq!(rec.finished(), Some(7));
    }

    #[test]
    fn test_sink_is_object_safe() {
        let sinks: Vec<Box<dyn SweepSink>> = vec![Box::new(DiscardSink), Box::new(GridRecorder::new())];
        for s in &sinks {
            s.on_cell(&cell(0, 0), &[]);
        }
    }
}
