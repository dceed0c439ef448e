// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Robust Crossing Statistic
// ─────────────────────────────────────────────────────────────────────

/// Added to the MAD so a flat series standardises to zeros.
pub const MAD_EPS: f64 = 1e-12;

/// Median; the mean of the two middle values for even lengths, 0 for empty.
pub fn median(x: &[f64]) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    let mut sorted = x.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        0.5 * (sorted[mid - 1] + sorted[mid])
    } else {
        sorted[mid]
    }
}

/// Median absolute deviation plus `eps`.
pub fn robust_mad(x: &[f64], eps: f64) -> f64 {
    let med = median(x);
    let deviations: Vec<f64> = x.iter().map(|&v| (v - med).abs()).collect();
    median(&deviations) + eps
}

/// (x − median) / (MAD + ε).
pub fn robust_standardize(x: &[f64]) -> Vec<f64> {
    let med = median(x);
    let mad = robust_mad(x, MAD_EPS);
    x.iter().map(|&v| (v - med) / mad).collect()
}

/// Steps where the previous value is ≤ `level` and the current is > `level`.
pub fn count_upward_crossings(z: &[f64], level: f64) -> u32 {
    z.windows(2)
        .filter(|w| w[0] <= level && w[1] > level)
        .count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
        assert_eq!(median(&[]), 0.0);
    }

    #[test]
    fn test_mad() {
        // deviations from 3: [2,1,0,1,2] → median 1
        let mad = robust_mad(&[1.0, 2.0, 3.0, 4.0, 5.0], 0.0);
        assert!((mad - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_flat_series_standardises_to_zero() {
        let z = robust_standardize(&[0.7; 50]);
        assert!(z.iter().all(|&v| v == 0.0));
        assert_eq!(count_upward_crossings(&z, 1.0), 0);
    }

    #[test]
    fn test_crossings_strict_upward() {
        let z = [0.0, 2.0, 0.5, 1.0, 1.5, 1.5, 0.9, 3.0];
        // 0→2, 1.0→1.5, 0.9→3.0
        assert_eq!(count_upward_crossings(&z, 1.0), 3);
    }

    #[test]
    fn test_crossings_short_series() {
        assert_eq!(count_upward_crossings(&[5.0], 1.0), 0);
        assert_eq!(count_upward_crossings(&[], 1.0), 0);
    }

    #[test]
    fn test_oscillating_dispersion_crosses() {
        let x: Vec<f64> = (0..400).map(|i| 1.0 + 0.1 * (i as f64 * 0.1).sin()).collect();
        let n = count_upward_crossings(&robust_standardize(&x), 1.0);
        // period ≈ 63 samples → ~6 cycles
        assert!((5..=7).contains(&n), "got {n} crossings");
    }
}
