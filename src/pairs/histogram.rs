//! Separation histograms with integer bin counts.
//!
//! Counts are `u64` so that merging partial histograms from chunked or
//! parallel accumulation is exact and independent of merge order. The 2D
//! histogram covers (−r_max, r_max) on both axes with axis 0 = transverse
//! (perpendicular) separation and axis 1 = line-of-sight (parallel)
//! separation, stored row-major. The 1D histogram covers [0, r_max).

use rkyv::{Archive, Deserialize, Serialize};

/// 2D pair-separation histogram over (r⊥, r∥).
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct Histogram2d {
    nbins: usize,
    r_max: f64,
    counts: Vec<u64>,
}

impl Histogram2d {
    /// Create an empty histogram with `nbins` bins per axis spanning
    /// (−r_max, r_max). `nbins` and `r_max` must be positive.
    pub fn new(nbins: usize, r_max: f64) -> Self {
        assert!(nbins > 0, "nbins must be > 0");
        assert!(r_max > 0.0, "r_max must be > 0");
        Self {
            nbins,
            r_max,
            counts: vec![0; nbins * nbins],
        }
    }

    /// Rebuild a histogram from previously stored counts.
    /// `counts` must hold exactly `nbins * nbins` row-major values.
    pub fn from_counts(nbins: usize, r_max: f64, counts: Vec<u64>) -> Self {
        assert!(nbins > 0, "nbins must be > 0");
        assert!(r_max > 0.0, "r_max must be > 0");
        assert_eq!(counts.len(), nbins * nbins, "count vector shape mismatch");
        Self {
            nbins,
            r_max,
            counts,
        }
    }

    pub fn nbins(&self) -> usize {
        self.nbins
    }

    pub fn r_max(&self) -> f64 {
        self.r_max
    }

    /// Width of one bin.
    pub fn bin_width(&self) -> f64 {
        2.0 * self.r_max / self.nbins as f64
    }

    /// Bin index for a separation value, or `None` when out of range.
    /// The right edge of the last bin is inclusive.
    fn bin_index(&self, v: f64) -> Option<usize> {
        if !v.is_finite() || v < -self.r_max || v > self.r_max {
            return None;
        }
        let idx = ((v + self.r_max) / self.bin_width()).floor() as usize;
        Some(idx.min(self.nbins - 1))
    }

    /// Accumulate one pair at (perpendicular, parallel) separation.
    /// Values outside (−r_max, r_max) on either axis are dropped.
    pub fn fill(&mut self, perp: f64, par: f64) {
        if let (Some(i), Some(j)) = (self.bin_index(perp), self.bin_index(par)) {
            self.counts[i * self.nbins + j] += 1;
        }
    }

    /// Count in bin (i = perpendicular index, j = parallel index).
    pub fn at(&self, i: usize, j: usize) -> u64 {
        self.counts[i * self.nbins + j]
    }

    /// Raw row-major counts.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Sum of all bin counts.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Add another histogram's counts into this one. Shapes must match.
    pub fn merge(&mut self, other: &Self) {
        assert_eq!(self.nbins, other.nbins, "histogram bin counts differ");
        assert_eq!(
            self.r_max.to_bits(),
            other.r_max.to_bits(),
            "histogram ranges differ"
        );
        for (a, b) in self.counts.iter_mut().zip(&other.counts) {
            *a += b;
        }
    }

    /// Histogram plus its reflection across the transverse axis:
    /// out[i][j] = self[i][j] + self[nbins−1−i][j].
    ///
    /// Physical pairs always have r⊥ ≥ 0, so raw counts occupy only the
    /// upper half-plane; the reflection completes the lower half and the
    /// result is exactly symmetric under i ↔ nbins−1−i.
    pub fn mirrored(&self) -> Self {
        let mut out = self.clone();
        for i in 0..self.nbins {
            let src = self.nbins - 1 - i;
            for j in 0..self.nbins {
                out.counts[i * self.nbins + j] += self.counts[src * self.nbins + j];
            }
        }
        out
    }

    /// Centers of the bins along either axis, from −r_max to r_max.
    pub fn bin_centers(&self) -> Vec<f64> {
        let w = self.bin_width();
        (0..self.nbins)
            .map(|i| -self.r_max + (i as f64 + 0.5) * w)
            .collect()
    }
}

/// 1D radial pair-separation histogram over [0, r_max).
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct Histogram1d {
    nbins: usize,
    r_max: f64,
    counts: Vec<u64>,
}

impl Histogram1d {
    pub fn new(nbins: usize, r_max: f64) -> Self {
        assert!(nbins > 0, "nbins must be > 0");
        assert!(r_max > 0.0, "r_max must be > 0");
        Self {
            nbins,
            r_max,
            counts: vec![0; nbins],
        }
    }

    pub fn nbins(&self) -> usize {
        self.nbins
    }

    pub fn r_max(&self) -> f64 {
        self.r_max
    }

    pub fn bin_width(&self) -> f64 {
        self.r_max / self.nbins as f64
    }

    /// Accumulate one pair at radial separation `r`; negative, non-finite,
    /// and out-of-range values are dropped. The right edge is inclusive.
    pub fn fill(&mut self, r: f64) {
        if !r.is_finite() || r < 0.0 || r > self.r_max {
            return;
        }
        let idx = (r / self.bin_width()).floor() as usize;
        self.counts[idx.min(self.nbins - 1)] += 1;
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn merge(&mut self, other: &Self) {
        assert_eq!(self.nbins, other.nbins, "histogram bin counts differ");
        assert_eq!(
            self.r_max.to_bits(),
            other.r_max.to_bits(),
            "histogram ranges differ"
        );
        for (a, b) in self.counts.iter_mut().zip(&other.counts) {
            *a += b;
        }
    }

    /// Centers of the radial bins.
    pub fn bin_centers(&self) -> Vec<f64> {
        let w = self.bin_width();
        (0..self.nbins).map(|i| (i as f64 + 0.5) * w).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_bins_and_edges() {
        let mut h = Histogram2d::new(4, 2.0); // bins of width 1.0 over (-2, 2)
        h.fill(-2.0, -2.0); // left edges -> bin (0, 0)
        h.fill(1.99, 0.5); // bin (3, 2)
        h.fill(2.0, 2.0); // right edge inclusive -> bin (3, 3)
        h.fill(2.1, 0.0); // out of range, dropped
        h.fill(f64::NAN, 0.0); // dropped

        assert_eq!(h.at(0, 0), 1);
        assert_eq!(h.at(3, 2), 1);
        assert_eq!(h.at(3, 3), 1);
        assert_eq!(h.total(), 3);
    }

    #[test]
    fn merge_adds_counts() {
        let mut a = Histogram2d::new(4, 2.0);
        let mut b = Histogram2d::new(4, 2.0);
        a.fill(0.5, 0.5);
        b.fill(0.5, 0.5);
        b.fill(-1.5, 1.5);
        a.merge(&b);
        assert_eq!(a.at(2, 2), 2);
        assert_eq!(a.at(0, 3), 1);
        assert_eq!(a.total(), 3);
    }

    #[test]
    fn mirrored_is_reflection_symmetric() {
        let mut h = Histogram2d::new(6, 3.0);
        // Physical fills: perp >= 0 only.
        h.fill(0.2, -1.3);
        h.fill(1.7, 2.4);
        h.fill(2.9, 0.1);
        h.fill(0.9, -2.8);

        let m = h.mirrored();
        assert_eq!(m.total(), 2 * h.total());
        for i in 0..6 {
            for j in 0..6 {
                assert_eq!(m.at(i, j), m.at(5 - i, j), "asymmetry at ({i}, {j})");
            }
        }
    }

    #[test]
    fn radial_histogram_edges() {
        let mut h = Histogram1d::new(5, 10.0);
        h.fill(0.0);
        h.fill(9.99);
        h.fill(10.0); // right edge inclusive
        h.fill(-0.1); // dropped
        h.fill(10.1); // dropped
        assert_eq!(h.counts()[0], 1);
        assert_eq!(h.counts()[4], 2);
        assert_eq!(h.total(), 3);
    }

    #[test]
    fn bin_centers_are_symmetric() {
        let h = Histogram2d::new(4, 2.0);
        let c = h.bin_centers();
        assert_eq!(c.len(), 4);
        assert!((c[0] + 1.5).abs() < 1e-12);
        assert!((c[3] - 1.5).abs() < 1e-12);
    }
}
