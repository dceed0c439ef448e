// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Replicate Aggregation
// ─────────────────────────────────────────────────────────────────────
//! Collapses the replicates of one (K, γ) cell into a [`GridCell`]:
//! strict-majority vote over valid labels, metric means over valid
//! replicates, and the invalid fraction.

use resonance_types::{GridCell, InvalidPolicy, PointResult};

/// Strictly more than half of `labels` must be true. Ties and the empty
/// slice are "not ringing".
pub fn majority_vote(labels: &[bool]) -> bool {
    let yes = labels.iter().filter(|&&l| l).count();
    2 * yes > labels.len()
}

/// Position of a cell in the grid and its axis values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellIndex {
    pub gamma_index: usize,
    pub k_index: usize,
    pub k: f64,
    pub gamma: f64,
}

/// Aggregate one cell's replicates under `policy`.
pub fn aggregate_cell(at: CellIndex, points: &[PointResult], policy: InvalidPolicy) -> GridCell {
    let replicates = points.len();
    let valid: Vec<&PointResult> = points.iter().filter(|p| p.is_valid()).collect();
    let valid_replicates = valid.len();
    let invalid_fraction = if replicates == 0 {
        0.0
    } else {
        (replicates - valid_replicates) as f64 / replicates as f64
    };

    let (mut r_mean, mut delta_psd_db, mut n_over) = (0.0, 0.0, 0.0);
    for m in valid.iter().filter_map(|p| p.metrics()) {
        r_mean += m.r_mean;
        delta_psd_db += m.delta_psd_db;
        n_over += f64::from(m.n_over);
    }
    if valid_replicates > 0 {
        let inv = 1.0 / valid_replicates as f64;
        r_mean *= inv;
        delta_psd_db *= inv;
        n_over *= inv;
    }

    let labels: Vec<bool> = valid.iter().map(|p| p.ring_label()).collect();
    let voted = majority_vote(&labels);

    let excluded = match policy {
        InvalidPolicy::VoteValid => false,
        InvalidPolicy::ExcludeAbove {
            max_invalid_fraction,
        } => invalid_fraction > max_invalid_fraction,
    };
    if excluded {
        log::warn!(
            "cell K={:.4} γ={:.4} excluded: invalid fraction {invalid_fraction:.3}",
            at.k,
            at.gamma
        );
    }

    GridCell {
        k: at.k,
        gamma: at.gamma,
        gamma_index: at.gamma_index,
        k_index: at.k_index,
        ring_label: voted && !excluded,
        r_mean,
        delta_psd_db,
        n_over,
        replicates,
        valid_replicates,
        invalid_fraction,
        excluded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resonance_types::{InvalidReason, PointMetrics};

    const AT: CellIndex = CellIndex {
        gamma_index: 0,
        k_index: 0,
        k: 1.0,
        gamma: 0.5,
    };

    fn ok(rep: usize, r: f64, ring: bool) -> PointResult {
        PointResult::valid(
            1.0,
            0.5,
            rep,
            rep as u64,
            PointMetrics {
                r_mean: r,
                delta_psd_db: 10.0,
                n_over: 4,
            },
            ring,
        )
    }

    fn bad(rep: usize) -> PointResult {
        PointResult::invalid(1.0, 0.5, rep, rep as u64, InvalidReason::NonFinitePhase { step: 3 })
    }

    #[test]
    fn test_majority_two_of_three() {
        assert!(majority_vote(&[true, true, false]));
    }

    #[test]
    fn test_majority_one_of_three() {
        assert!(!majority_vote(&[true, false, false]));
    }

    #[test]
    fn test_majority_even_split_is_false() {
        assert!(!majority_vote(&[true, true, false, false]));
    }

    #[test]
    fn test_majority_empty_is_false() {
        assert!(!majority_vote(&[]));
        assert!(majority_vote(&[true]));
    }

    #[test]
    fn test_means_over_valid_only() {
        let cell = aggregate_cell(
            AT,
            &[ok(0, 0.4, true), ok(1, 0.6, true), bad(2)],
            InvalidPolicy::VoteValid,
        );
        assert!((cell.r_mean - 0.5).abs() < 1e-12);
        assert!((cell.n_over - 4.0).abs() < 1e-12);
        assert_eq!(cell.valid_replicates, 2);
        assert!((cell.invalid_fraction - 1.0 / 3.0).abs() < 1e-12);
        assert!(cell.ring_label, "2 of 2 valid replicates ring");
    }

    #[test]
    fn test_invalid_replicates_do_not_vote() {
        // one valid ringing replicate, two invalid: 1 of 1 valid → true
        let cell = aggregate_cell(AT, &[ok(0, 0.9, true), bad(1), bad(2)], InvalidPolicy::VoteValid);
        assert!(cell.ring_label);
        assert!(!cell.excluded);
    }

    #[test]
    fn test_all_invalid_cell() {
        let cell = aggregate_cell(AT, &[bad(0), bad(1)], InvalidPolicy::VoteValid);
        assert!(!cell.ring_label);
        assert_eq!(cell.r_mean, 0.0);
        assert_eq!(cell.delta_psd_db, 0.0);
        assert_eq!(cell.invalid_fraction, 1.0);
    }

    #[test]
    fn test_exclude_policy_forces_false() {
        let policy = InvalidPolicy::ExcludeAbove {
            max_invalid_fraction: 0.5,
        };
        let cell = aggregate_cell(AT, &[ok(0, 0.9, true), bad(1), bad(2)], policy);
        assert!(cell.excluded);
        assert!(!cell.ring_label, "excluded cell must not ring");
        // metrics still reported
        assert!((cell.r_mean - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_exclude_policy_bound_inclusive() {
        let policy = InvalidPolicy::ExcludeAbove {
            max_invalid_fraction: 0.5,
        };
        let cell = aggregate_cell(AT, &[ok(0, 0.9, true), ok(1, 0.9, true), bad(2), bad(3)], policy);
        assert!(!cell.excluded, "0.5 does not exceed 0.5");
        assert!(cell.ring_label);
    }
}
