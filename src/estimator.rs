//! Landy–Szalay two-point correlation estimator.
//!
//! Normalizes the DD, DR and RR pair counts by their total pair numbers and
//! forms ξ = (DD − 2·DR + RR) / RR per bin. The 2D estimator works on the
//! perpendicular-mirrored grids, so the output is symmetric under r⊥ → −r⊥
//! by construction (the mirror doubles all three counts alike and cancels in
//! the ratio).

use anyhow::{bail, Result};
use tracing::info;

use crate::pairs::{Histogram2d, PairCounts, PairCounts1d};

/// A 2D correlation grid over (r⊥, r∥), same layout as [`Histogram2d`]:
/// axis 0 = perpendicular, axis 1 = parallel, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationGrid {
    nbins: usize,
    r_max: f64,
    values: Vec<f64>,
}

impl CorrelationGrid {
    pub fn nbins(&self) -> usize {
        self.nbins
    }

    pub fn r_max(&self) -> f64 {
        self.r_max
    }

    /// ξ in bin (i = perpendicular index, j = parallel index).
    pub fn at(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.nbins + j]
    }

    /// Raw row-major values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Centers of the bins along either axis.
    pub fn bin_centers(&self) -> Vec<f64> {
        let w = 2.0 * self.r_max / self.nbins as f64;
        (0..self.nbins)
            .map(|i| -self.r_max + (i as f64 + 0.5) * w)
            .collect()
    }

    /// Fold the grid across the parallel axis:
    /// out[i][j] = ξ[i][j] + ξ[i][nbins−1−j].
    ///
    /// For a grid that is statistically symmetric in r∥ this stacks the two
    /// halves on top of each other; apply at most once.
    pub fn fold_parallel(&self) -> Self {
        let mut out = self.clone();
        for i in 0..self.nbins {
            for j in 0..self.nbins {
                out.values[i * self.nbins + j] += self.values[i * self.nbins + (self.nbins - 1 - j)];
            }
        }
        out
    }
}

/// Check that two counted grids can enter the same estimator.
fn check_compatible(name: &str, a: &Histogram2d, b: &Histogram2d) -> Result<()> {
    if a.nbins() != b.nbins() || a.r_max() != b.r_max() {
        bail!(
            "{name} grid ({} bins to {}) does not match DD grid ({} bins to {})",
            b.nbins(),
            b.r_max(),
            a.nbins(),
            a.r_max()
        );
    }
    Ok(())
}

/// Landy–Szalay estimator on 2D (r⊥, r∥) pair counts.
///
/// `dd` and `rr` must be auto-correlations and `dr` the data × random cross
/// count, with consistent catalog sizes. Bins where RR is empty have no
/// estimator value and come out as NaN.
pub fn landy_szalay(
    dd: &PairCounts,
    dr: &PairCounts,
    rr: &PairCounts,
) -> Result<CorrelationGrid> {
    if !dd.auto || !rr.auto || dr.auto {
        bail!("landy_szalay needs auto DD, cross DR, auto RR counts");
    }
    if dd.num_first != dr.num_first {
        bail!(
            "DD counted {} galaxies but DR used {}",
            dd.num_first,
            dr.num_first
        );
    }
    if rr.num_first != dr.num_second {
        bail!(
            "RR counted {} randoms but DR used {}",
            rr.num_first,
            dr.num_second
        );
    }
    check_compatible("DR", &dd.hist, &dr.hist)?;
    check_compatible("RR", &dd.hist, &rr.hist)?;

    let dd_m = dd.mirrored();
    let dr_m = dr.mirrored();
    let rr_m = rr.mirrored();

    let dd_norm = dd.pair_norm();
    let dr_norm = dr.pair_norm();
    let rr_norm = rr.pair_norm();

    let values: Vec<f64> = dd_m
        .counts()
        .iter()
        .zip(dr_m.counts())
        .zip(rr_m.counts())
        .map(|((&ddc, &drc), &rrc)| {
            if rrc == 0 {
                return f64::NAN;
            }
            let ddv = ddc as f64 / dd_norm;
            let drv = drc as f64 / dr_norm;
            let rrv = rrc as f64 / rr_norm;
            (ddv - 2.0 * drv + rrv) / rrv
        })
        .collect();

    let empty_rr = rr_m.counts().iter().filter(|&&c| c == 0).count();
    if empty_rr > 0 {
        info!("{empty_rr} bins have no RR pairs; estimator is NaN there");
    }

    Ok(CorrelationGrid {
        nbins: dd.hist.nbins(),
        r_max: dd.hist.r_max(),
        values,
    })
}

/// Landy–Szalay estimator on 1D radial pair counts. Returns ξ per radial
/// bin; pair bin centers with `dd.hist.bin_centers()`.
pub fn landy_szalay_radial(
    dd: &PairCounts1d,
    dr: &PairCounts1d,
    rr: &PairCounts1d,
) -> Result<Vec<f64>> {
    if !dd.auto || !rr.auto || dr.auto {
        bail!("landy_szalay_radial needs auto DD, cross DR, auto RR counts");
    }
    if dd.hist.nbins() != dr.hist.nbins()
        || dd.hist.nbins() != rr.hist.nbins()
        || dd.hist.r_max() != dr.hist.r_max()
        || dd.hist.r_max() != rr.hist.r_max()
    {
        bail!("radial pair-count grids do not match");
    }

    let dd_norm = dd.pair_norm();
    let dr_norm = dr.pair_norm();
    let rr_norm = rr.pair_norm();

    Ok(dd
        .hist
        .counts()
        .iter()
        .zip(dr.hist.counts())
        .zip(rr.hist.counts())
        .map(|((&ddc, &drc), &rrc)| {
            if rrc == 0 {
                return f64::NAN;
            }
            let ddv = ddc as f64 / dd_norm;
            let drv = drc as f64 / dr_norm;
            let rrv = rrc as f64 / rr_norm;
            (ddv - 2.0 * drv + rrv) / rrv
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pairs::{Histogram1d, Histogram2d};

    fn counts_2d(fills: &[(f64, f64)], n1: u64, n2: u64, auto: bool) -> PairCounts {
        let mut hist = Histogram2d::new(4, 8.0);
        for &(perp, par) in fills {
            hist.fill(perp, par);
        }
        PairCounts {
            hist,
            num_first: n1,
            num_second: n2,
            auto,
        }
    }

    #[test]
    fn equal_normalized_counts_give_zero() {
        // One DD pair among 3 galaxies -> DD/norm = 1/3 in that bin.
        // Matching DR and RR rates make the estimator exactly zero there.
        let dd = counts_2d(&[(1.0, 1.0)], 3, 3, true); // norm 3
        let rr = counts_2d(&[(1.0, 1.0), (1.0, 1.0)], 4, 4, true); // 2/6 = 1/3
        let dr = counts_2d(&[(1.0, 1.0), (1.0, 1.0), (1.0, 1.0), (1.0, 1.0)], 3, 4, false); // 4/12 = 1/3

        let xi = landy_szalay(&dd, &dr, &rr).unwrap();
        // Filled bin: perp 1.0 -> bin 2, par 1.0 -> bin 2.
        assert!(xi.at(2, 2).abs() < 1e-12);
        // Mirror bin carries the same value.
        assert!(xi.at(1, 2).abs() < 1e-12);
    }

    #[test]
    fn overdensity_is_positive() {
        // DD rate 1/3, RR and DR rate 1/6: xi = (1/3 - 2/6 + 1/6)/(1/6) = 1.
        let dd = counts_2d(&[(1.0, 1.0)], 3, 3, true);
        let rr = counts_2d(&[(1.0, 1.0)], 4, 4, true);
        let dr = counts_2d(&[(1.0, 1.0), (1.0, 1.0)], 3, 4, false);

        let xi = landy_szalay(&dd, &dr, &rr).unwrap();
        assert!((xi.at(2, 2) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_rr_bins_are_nan() {
        let dd = counts_2d(&[(1.0, 1.0)], 3, 3, true);
        let rr = counts_2d(&[(5.0, 5.0)], 4, 4, true);
        let dr = counts_2d(&[], 3, 4, false);

        let xi = landy_szalay(&dd, &dr, &rr).unwrap();
        assert!(xi.at(2, 2).is_nan());
        // The RR-occupied bin has a finite value.
        assert!(xi.at(3, 3).is_finite());
    }

    #[test]
    fn output_is_mirror_symmetric() {
        let dd = counts_2d(&[(1.0, 1.0), (5.0, -3.0)], 5, 5, true);
        let rr = counts_2d(&[(1.0, 1.0), (5.0, -3.0), (3.0, 7.0)], 6, 6, true);
        let dr = counts_2d(&[(1.0, 1.0), (3.0, 7.0)], 5, 6, false);

        let xi = landy_szalay(&dd, &dr, &rr).unwrap();
        for i in 0..4 {
            for j in 0..4 {
                let a = xi.at(i, j);
                let b = xi.at(3 - i, j);
                assert!(
                    (a.is_nan() && b.is_nan()) || (a - b).abs() < 1e-12,
                    "asymmetry at ({i}, {j}): {a} vs {b}"
                );
            }
        }
    }

    #[test]
    fn rejects_mismatched_inputs() {
        let dd = counts_2d(&[], 3, 3, true);
        let rr = counts_2d(&[], 4, 4, true);
        let dr = counts_2d(&[], 3, 4, false);

        // Mode mixed up.
        assert!(landy_szalay(&dr, &dd, &rr).is_err());
        // Catalog size mismatch.
        let dr_bad = counts_2d(&[], 5, 4, false);
        assert!(landy_szalay(&dd, &dr_bad, &rr).is_err());
        // Grid shape mismatch.
        let mut rr_bad = rr.clone();
        rr_bad.hist = Histogram2d::new(8, 8.0);
        assert!(landy_szalay(&dd, &dr, &rr_bad).is_err());
    }

    #[test]
    fn fold_parallel_stacks_halves() {
        let dd = counts_2d(&[(1.0, 1.0)], 3, 3, true);
        let rr = counts_2d(&[(1.0, 1.0), (1.0, -2.0)], 4, 4, true);
        let dr = counts_2d(&[(1.0, 1.0)], 3, 4, false);
        let xi = landy_szalay(&dd, &dr, &rr).unwrap();
        let folded = xi.fold_parallel();
        for i in 0..4 {
            for j in 0..4 {
                let expect = xi.at(i, j) + xi.at(i, 3 - j);
                let got = folded.at(i, j);
                assert!(
                    (got.is_nan() && expect.is_nan()) || (got - expect).abs() < 1e-12,
                    "fold mismatch at ({i}, {j})"
                );
            }
        }
    }

    #[test]
    fn radial_estimator_matches_hand_computation() {
        let mk = |fills: &[f64], n1: u64, n2: u64, auto: bool| {
            let mut hist = Histogram1d::new(4, 8.0);
            for &r in fills {
                hist.fill(r);
            }
            PairCounts1d {
                hist,
                num_first: n1,
                num_second: n2,
                auto,
            }
        };
        let dd = mk(&[1.0], 3, 3, true); // rate 1/3 in bin 0
        let rr = mk(&[1.0], 4, 4, true); // rate 1/6
        let dr = mk(&[1.0, 1.0], 3, 4, false); // rate 1/6

        let xi = landy_szalay_radial(&dd, &dr, &rr).unwrap();
        assert!((xi[0] - 1.0).abs() < 1e-12);
        assert!(xi[1].is_nan());
    }
}
