// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Null Hypothesis Evaluator
// ─────────────────────────────────────────────────────────────────────
//! Grid-level falsification checks on the finished ringing mask M
//! (γ rows × K cols), with S = number of true cells:
//!
//! 1. **no ringing anywhere**: fails if no cell's mean metrics pass the
//!    point-level rule.
//! 2. **region minimum**: fails if |S| / |grid| < area_frac_min or the
//!    largest 4-connected component is smaller than cc_min.
//! 3. **bounded span**: fails unless some row's true cells span a
//!    fraction of the K range in (0, span_frac_max].
//! 4. **negative control**: fails if S > 0 and S_nc ≥ ratio · S, where
//!    S_nc counts true cells of the plasticity-off rerun. Skipped when
//!    no rerun was made.
//!
//! The claim is rejected if any non-skipped check fails.

use resonance_types::{
    GridCell, GridMask, GridSummary, NullCheck, NullDetails, NullEvaluationReport, NullThresholds,
    RingingThresholds, SweepConfig, SweepError, SweepResult,
};

use crate::mask::largest_component;

/// Floor on the K range so a single-column axis cannot divide by zero.
const K_RANGE_EPS: f64 = 1e-12;

pub const NO_RINGING: &str = "no_ringing_anywhere";
pub const REGION_MINIMUM: &str = "region_minimum";
pub const BOUNDED_SPAN: &str = "bounded_span";
pub const NEGATIVE_CONTROL: &str = "negative_control";

/// Reason recorded when the plasticity-off rerun was not performed.
pub const NEGATIVE_CONTROL_SKIPPED: &str = "negative control not run (disabled or quick mode)";

/// Counts reported alongside the checks.
pub fn grid_summary(mask: &GridMask) -> GridSummary {
    GridSummary {
        rows: mask.rows(),
        cols: mask.cols(),
        true_cells: mask.count(),
        total_cells: mask.len(),
        area_fraction: mask.area_fraction(),
        largest_component: largest_component(mask),
    }
}

/// Runs the four checks against one finished sweep.
#[derive(Debug, Clone)]
pub struct NullEvaluator {
    thresholds: RingingThresholds,
    nulls: NullThresholds,
}

impl NullEvaluator {
    pub fn new(thresholds: RingingThresholds, nulls: NullThresholds) -> Self {
        Self { thresholds, nulls }
    }

    pub fn from_config(config: &SweepConfig) -> Self {
        Self::new(config.thresholds.clone(), config.nulls.clone())
    }

    /// Evaluate every check and assemble the report.
    ///
    /// `cells` holds the simulated cells (their mean metrics feed the
    /// no-ringing re-check); `k_values` must match the mask's columns,
    /// and a control mask must match its shape.
    pub fn evaluate(
        &self,
        mask: &GridMask,
        cells: &[GridCell],
        k_values: &[f64],
        control: Option<&GridMask>,
    ) -> SweepResult<NullEvaluationReport> {
        if k_values.len() != mask.cols() {
            return Err(SweepError::Validation(format!(
                "{} K values for a mask with {} columns",
                k_values.len(),
                mask.cols()
            )));
        }
        if let Some(nc) = control {
            if (nc.rows(), nc.cols()) != (mask.rows(), mask.cols()) {
                return Err(SweepError::Validation(format!(
                    "negative control mask is {}x{}, sweep mask is {}x{}",
                    nc.rows(),
                    nc.cols(),
                    mask.rows(),
                    mask.cols()
                )));
            }
        }
        if let Some(k) = k_values.iter().find(|k| !k.is_finite()) {
            return Err(SweepError::Numerical(format!("non-finite K value {k}")));
        }

        let report = NullEvaluationReport::new(
            self.check_no_ringing(cells),
            self.check_region_minimum(mask),
            self.check_bounded_span(mask, k_values),
            self.check_negative_control(mask, control),
            grid_summary(mask),
        );
        for check in report.checks() {
            log::info!("null check {}: {}", check.name, check.status);
        }
        log::info!("claim rejected: {}", report.rejected);
        Ok(report)
    }

    /// Re-applies the point rule to cell means; excluded cells never pass.
    pub fn check_no_ringing(&self, cells: &[GridCell]) -> NullCheck {
        let passing_cells = cells
            .iter()
            .filter(|c| !c.excluded && c.passes(&self.thresholds))
            .count();
        NullCheck::new(
            NO_RINGING,
            passing_cells == 0,
            NullDetails::NoRinging {
                thresholds: self.thresholds.clone(),
                passing_cells,
            },
        )
    }

    pub fn check_region_minimum(&self, mask: &GridMask) -> NullCheck {
        let area_frac = mask.area_fraction();
        let largest_cc = largest_component(mask);
        let failed = area_frac < self.nulls.area_frac_min || largest_cc < self.nulls.cc_min;
        NullCheck::new(
            REGION_MINIMUM,
            failed,
            NullDetails::RegionMinimum {
                area_frac,
                area_frac_min: self.nulls.area_frac_min,
                largest_cc,
                cc_min: self.nulls.cc_min,
            },
        )
    }

    pub fn check_bounded_span(&self, mask: &GridMask, k_values: &[f64]) -> NullCheck {
        let k_min = k_values.iter().copied().fold(f64::INFINITY, f64::min);
        let k_max = k_values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let k_range = (k_max - k_min).max(K_RANGE_EPS);

        let row_span_fracs: Vec<Option<f64>> = (0..mask.rows())
            .map(|r| {
                mask.row(r)
                    .and_then(|row| row_span_fraction(row, k_values, k_range))
            })
            .collect();
        let qualifying_rows = row_span_fracs
            .iter()
            .flatten()
            .filter(|&&f| f > 0.0 && f <= self.nulls.span_frac_max)
            .count();
        NullCheck::new(
            BOUNDED_SPAN,
            qualifying_rows == 0,
            NullDetails::BoundedSpan {
                span_frac_max: self.nulls.span_frac_max,
                row_span_fracs,
                qualifying_rows,
            },
        )
    }

    pub fn check_negative_control(&self, mask: &GridMask, control: Option<&GridMask>) -> NullCheck {
        let Some(nc) = control else {
            return NullCheck::skipped(NEGATIVE_CONTROL, NEGATIVE_CONTROL_SKIPPED);
        };
        let true_cells = mask.count();
        let control_true_cells = nc.count();
        let ratio = if true_cells > 0 {
            control_true_cells as f64 / true_cells as f64
        } else {
            0.0
        };
        let failed = true_cells > 0
            && control_true_cells as f64 >= self.nulls.negative_control_ratio * true_cells as f64;
        NullCheck::new(
            NEGATIVE_CONTROL,
            failed,
            NullDetails::NegativeControl {
                true_cells,
                control_true_cells,
                ratio,
                ratio_min: self.nulls.negative_control_ratio,
            },
        )
    }
}

/// Span of one row's true cells over the K range; `None` if the row has none.
fn row_span_fraction(row: &[bool], k_values: &[f64], k_range: f64) -> Option<f64> {
    let first = row.iter().position(|&c| c)?;
    let last = row.iter().rposition(|&c| c)?;
    Some((k_values[last] - k_values[first]) / k_range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use resonance_types::CheckStatus;

    fn evaluator() -> NullEvaluator {
        NullEvaluator::new(RingingThresholds::default(), NullThresholds::default())
    }

    fn k_axis(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64 * 0.5).collect()
    }

    fn cell(r_mean: f64, delta_psd_db: f64, n_over: f64) -> GridCell {
        GridCell {
            k: 1.0,
            gamma: 0.1,
            gamma_index: 0,
            k_index: 0,
            ring_label: true,
            r_mean,
            delta_psd_db,
            n_over,
            replicates: 3,
            valid_replicates: 3,
            invalid_fraction: 0.0,
            excluded: false,
        }
    }

    #[test]
    fn test_no_ringing_rechecks_means() {
        let e = evaluator();
        // label says true but the means miss the psd threshold
        assert!(e.check_no_ringing(&[cell(0.5, 5.0, 3.0)]).failed());
        assert!(!e.check_no_ringing(&[cell(0.5, 8.0, 3.0)]).failed());
        // mean crossing count 1.67 < 2
        assert!(e.check_no_ringing(&[cell(0.5, 8.0, 5.0 / 3.0)]).failed());
    }

    #[test]
    fn test_no_ringing_ignores_excluded() {
        let mut c = cell(0.9, 12.0, 4.0);
        c.excluded = true;
        assert!(evaluator().check_no_ringing(&[c]).failed());
    }

    #[test]
    fn test_scattered_cells_fail_region_minimum() {
        let mut m = GridMask::new(10, 10);
        m.set(1, 1, true);
        m.set(4, 6, true);
        m.set(8, 3, true);
        let check = evaluator().check_region_minimum(&m);
        match &check.details {
            NullDetails::RegionMinimum {
                area_frac,
                largest_cc,
                ..
            } => {
                assert!((area_frac - 0.03).abs() < 1e-12);
                assert_eq!(*largest_cc, 1);
            }
            other => panic!("unexpected details {other:?}"),
        }
        assert!(check.failed(), "3 scattered cells must fail on component size");
    }

    #[test]
    fn test_compact_region_passes_minimum() {
        let mut m = GridMask::new(10, 10);
        for r in 2..7 {
            for c in 3..7 {
                m.set(r, c, true);
            }
        }
        assert!(!evaluator().check_region_minimum(&m).failed());
    }

    #[test]
    fn test_full_or_empty_rows_fail_bounded_span() {
        let rows: Vec<Vec<bool>> = (0..6).map(|r| vec![r % 2 == 0; 8]).collect();
        let m = GridMask::from_rows(&rows).unwrap();
        let check = evaluator().check_bounded_span(&m, &k_axis(8));
        assert!(check.failed());
        match &check.details {
            NullDetails::BoundedSpan {
                row_span_fracs,
                qualifying_rows,
                ..
            } => {
                assert_eq!(*qualifying_rows, 0);
                assert_eq!(row_span_fracs[0], Some(1.0));
                assert_eq!(row_span_fracs[1], None);
            }
            other => panic!("unexpected details {other:?}"),
        }
    }

    #[test]
    fn test_partial_row_passes_bounded_span() {
        let mut m = GridMask::new(3, 11);
        // K = 0.5 * col; cols 2..=6 → span 2.0 / 5.0 = 0.4
        for c in 2..=6 {
            m.set(1, c, true);
        }
        let check = evaluator().check_bounded_span(&m, &k_axis(11));
        assert!(!check.failed());
    }

    #[test]
    fn test_single_cell_row_has_zero_span() {
        let mut m = GridMask::new(2, 5);
        m.set(0, 2, true);
        assert!(evaluator().check_bounded_span(&m, &k_axis(5)).failed());
    }

    #[test]
    fn test_negative_control_skipped() {
        let check = evaluator().check_negative_control(&GridMask::new(2, 2), None);
        assert_eq!(check.status, CheckStatus::Skip);
        assert!(!check.failed());
    }

    #[test]
    fn test_negative_control_ratio() {
        let e = evaluator();
        let real = GridMask::from_cells(1, 10, vec![true; 10]).unwrap();
        let mut nc = GridMask::new(1, 10);
        for c in 0..7 {
            nc.set(0, c, true);
        }
        assert!(!e.check_negative_control(&real, Some(&nc)).failed(), "7/10 < 0.8");
        nc.set(0, 7, true);
        assert!(e.check_negative_control(&real, Some(&nc)).failed(), "8/10 >= 0.8");
    }

    #[test]
    fn test_negative_control_empty_real_run() {
        let e = evaluator();
        let real = GridMask::new(2, 2);
        let nc = GridMask::from_cells(2, 2, vec![true; 4]).unwrap();
        assert!(!e.check_negative_control(&real, Some(&nc)).failed());
    }

    #[test]
    fn test_evaluate_shape_mismatch() {
        let e = evaluator();
        let m = GridMask::new(2, 3);
        assert!(e.evaluate(&m, &[], &k_axis(4), None).is_err());
        let nc = GridMask::new(3, 3);
        assert!(e.evaluate(&m, &[], &k_axis(3), Some(&nc)).is_err());
    }

    #[test]
    fn test_evaluate_empty_grid_rejects() {
        let m = GridMask::new(3, 3);
        let report = evaluator().evaluate(&m, &[], &k_axis(3), None).unwrap();
        assert!(report.rejected);
        assert!(report.no_ringing.failed());
        assert_eq!(report.negative_control.status, CheckStatus::Skip);
        assert_eq!(report.summary.true_cells, 0);
        assert_eq!(report.summary.total_cells, 9);
    }

    #[test]
    fn test_evaluate_accepts_bounded_region() {
        let mut nulls = NullThresholds::default();
        nulls.cc_min = 4;
        let e = NullEvaluator::new(RingingThresholds::default(), nulls);
        let mut m = GridMask::new(4, 10);
        for r in 1..3 {
            for c in 2..5 {
                m.set(r, c, true);
            }
        }
        let report = e
            .evaluate(&m, &[cell(0.6, 9.0, 3.0)], &k_axis(10), Some(&GridMask::new(4, 10)))
            .unwrap();
        assert!(!report.rejected, "{report:?}");
        assert_eq!(report.summary.largest_component, 6);
    }
}
