//! Density-adaptive scale factors.
//!
//! A [`ScalingTable`] holds sparse `(density, factor)` control points. Between
//! points the factor is interpolated linearly, but never strays more than
//! [`NEIGHBOR_TOLERANCE`] from the nearer point. Outside the table it follows a
//! power law with exponent [`EXTRAPOLATION_EXPONENT`], which tapers far more
//! gently than extending the end segments would.

use fp_config::ScalingTable;

/// Exponent of the power-law taper outside the table: `(key / density)^(1 / 2.5)`.
///
/// A tunable, not a derived quantity.
pub const EXTRAPOLATION_EXPONENT: f64 = 2.5;

/// Relative band around the nearer control point that interpolation may reach.
pub const NEIGHBOR_TOLERANCE: f64 = 0.10;

/// Scale factor for a group of `density` panels.
///
/// Densities below 1 are treated as 1. The result always lies in
/// `[table.min_factor(), table.max_factor()]`.
pub fn scale_factor(density: usize, table: &ScalingTable) -> f64 {
    let (lo, hi) = (table.min_factor(), table.max_factor());
    let points = table.points();
    let (Some(&(first_key, first_factor)), Some(&(last_key, last_factor))) =
        (points.first(), points.last())
    else {
        return 1.0_f64.clamp(lo, hi);
    };

    let density = density.max(1);
    let d = density as f64;

    let raw = if let Some(&(_, factor)) = points.iter().find(|(k, _)| *k as usize == density) {
        factor
    } else if density < first_key as usize {
        first_factor * (first_key as f64 / d).powf(1.0 / EXTRAPOLATION_EXPONENT)
    } else if density > last_key as usize {
        last_factor * (last_key as f64 / d).powf(1.0 / EXTRAPOLATION_EXPONENT)
    } else {
        interpolate(points, d)
    };

    raw.clamp(lo, hi)
}

/// Linear interpolation inside the table, held within the tolerance band of
/// the nearer control point.
fn interpolate(points: &[(u32, f64)], d: f64) -> f64 {
    let Some(pair) = points
        .windows(2)
        .find(|w| (w[0].0 as f64) < d && d < (w[1].0 as f64))
    else {
        return points.first().map_or(1.0, |p| p.1);
    };
    let ((k0, f0), (k1, f1)) = ((pair[0].0 as f64, pair[0].1), (pair[1].0 as f64, pair[1].1));
    let t = (d - k0) / (k1 - k0);
    // Stay inside [f1, f0] despite rounding.
    let value = (f0 + t * (f1 - f0)).clamp(f1, f0);
    let near = if d - k0 <= k1 - d { f0 } else { f1 };
    value.clamp(
        near * (1.0 - NEIGHBOR_TOLERANCE),
        near * (1.0 + NEIGHBOR_TOLERANCE),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use fp_config::ConfigRecord;
    use proptest::prelude::*;

    fn default_table() -> ScalingTable {
        ConfigRecord::default().scaling_table().unwrap()
    }

    #[test]
    fn exact_points() {
        let table = default_table();
        for &(k, f) in table.points() {
            assert_eq!(scale_factor(k as usize, &table), f);
        }
    }

    #[test]
    fn zero_density_is_one() {
        let table = default_table();
        assert_eq!(scale_factor(0, &table), scale_factor(1, &table));
    }

    #[test]
    fn interpolation_between_points() {
        let table = default_table();
        // Between (2, 0.95) and (4, 0.85)
        let f3 = scale_factor(3, &table);
        assert!((f3 - 0.90).abs() < 1e-12);
    }

    #[test]
    fn interpolation_held_near_neighbor() {
        let table = ScalingTable::new(vec![(1, 1.0), (11, 0.5)], 0.1, 2.0).unwrap();
        // Plain interpolation gives 0.95 at 2; the 10% band around 1.0 allows it.
        assert!((scale_factor(2, &table) - 0.95).abs() < 1e-12);
        // At 5 plain interpolation gives 0.8; the band around 1.0 stops at 0.9.
        assert!((scale_factor(5, &table) - 0.9).abs() < 1e-12);
        // At 7 the nearer point is (11, 0.5); band tops out at 0.55.
        assert!((scale_factor(7, &table) - 0.55).abs() < 1e-12);
    }

    #[test]
    fn extrapolation_above_table() {
        let table = ScalingTable::new(vec![(1, 1.0), (4, 0.8)], 0.1, 2.0).unwrap();
        let expected = 0.8 * (4.0_f64 / 32.0).powf(1.0 / EXTRAPOLATION_EXPONENT);
        assert!((scale_factor(32, &table) - expected).abs() < 1e-12);
    }

    #[test]
    fn extrapolation_below_table() {
        let table = ScalingTable::new(vec![(4, 0.8), (8, 0.7)], 0.1, 2.0).unwrap();
        let expected = 0.8 * 4.0_f64.powf(1.0 / EXTRAPOLATION_EXPONENT);
        assert!((scale_factor(1, &table) - expected).abs() < 1e-12);
    }

    #[test]
    fn clamped_to_bounds() {
        let table = ScalingTable::new(vec![(1, 1.0), (2, 0.9)], 0.6, 1.0).unwrap();
        assert_eq!(scale_factor(10_000, &table), 0.6);
    }

    proptest! {
        #[test]
        fn monotone_non_increasing(a in 0usize..400, b in 0usize..400) {
            let table = default_table();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(scale_factor(lo, &table) >= scale_factor(hi, &table));
        }

        #[test]
        fn always_within_bounds(d in 0usize..100_000) {
            let table = default_table();
            let f = scale_factor(d, &table);
            prop_assert!(f >= table.min_factor() && f <= table.max_factor());
        }

        #[test]
        fn arbitrary_tables_stay_monotone(
            steps in proptest::collection::vec((1u32..6, 0.0f64..0.2), 1..6),
            a in 1usize..80,
            b in 1usize..80,
        ) {
            let mut points = Vec::new();
            let (mut key, mut factor) = (1u32, 1.5f64);
            for (dk, df) in steps {
                points.push((key, factor));
                key += dk;
                factor = (factor - df).max(0.05);
            }
            let table = ScalingTable::new(points, 0.01, 5.0).unwrap();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(scale_factor(lo, &table) >= scale_factor(hi, &table));
        }
    }
}
