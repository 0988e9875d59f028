//! Covariance of the correlation function across mock realizations.
//!
//! Each mock catalog yields a ξ(r, μ) grid; the grids are compressed to
//! their monopole (the μ-integral per radial bin) and the unbiased sample
//! covariance of the monopoles across realizations is the error estimate
//! used for the measured correlation function.

use anyhow::{bail, Result};
use tracing::info;

use crate::Matrix;

/// Integrate a ξ(r, μ) grid over μ with the trapezoidal rule.
///
/// `xi_rmu` holds one row per radial bin, each row sampled at uniform μ
/// spacing `dmu`. Returns one monopole value per radial bin. Rows must be
/// equally long with at least two samples.
pub fn monopole(xi_rmu: &[Vec<f64>], dmu: f64) -> Result<Vec<f64>> {
    let Some(first) = xi_rmu.first() else {
        bail!("monopole of an empty grid");
    };
    if first.len() < 2 {
        bail!("need at least two mu samples per radial bin");
    }
    if !dmu.is_finite() || dmu <= 0.0 {
        bail!("mu spacing must be positive, got {dmu}");
    }

    xi_rmu
        .iter()
        .map(|row| {
            if row.len() != first.len() {
                bail!(
                    "ragged grid: row with {} mu samples, expected {}",
                    row.len(),
                    first.len()
                );
            }
            let interior: f64 = row[1..row.len() - 1].iter().sum();
            Ok(dmu * (0.5 * (row[0] + row[row.len() - 1]) + interior))
        })
        .collect()
}

/// Unbiased sample covariance across realizations.
///
/// Each element of `realizations` is one mock's compressed correlation
/// vector (e.g. a monopole). Needs at least two realizations of equal
/// length; the result is an n×n symmetric matrix with the usual N−1
/// normalization.
pub fn sample_covariance(realizations: &[Vec<f64>]) -> Result<Matrix> {
    let m = realizations.len();
    if m < 2 {
        bail!("covariance needs at least two realizations, got {m}");
    }
    let n = realizations[0].len();
    if n == 0 {
        bail!("covariance of zero-length vectors");
    }
    for (idx, r) in realizations.iter().enumerate() {
        if r.len() != n {
            bail!("realization {idx} has length {}, expected {n}", r.len());
        }
    }

    let mut mean = vec![0.0; n];
    for r in realizations {
        for (m_i, &v) in mean.iter_mut().zip(r) {
            *m_i += v;
        }
    }
    for m_i in &mut mean {
        *m_i /= m as f64;
    }

    let mut cov = Matrix::zeros(n, n);
    for r in realizations {
        for i in 0..n {
            let di = r[i] - mean[i];
            for j in i..n {
                cov[(i, j)] += di * (r[j] - mean[j]);
            }
        }
    }
    let norm = (m - 1) as f64;
    for i in 0..n {
        for j in i..n {
            cov[(i, j)] /= norm;
            cov[(j, i)] = cov[(i, j)];
        }
    }

    info!("Covariance from {m} realizations, {n} bins");
    Ok(cov)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monopole_of_constant_grid() {
        // Integrating a constant over [0, 1] in mu returns the constant.
        let grid = vec![vec![2.0; 41]; 3];
        let mono = monopole(&grid, 1.0 / 40.0).unwrap();
        assert_eq!(mono.len(), 3);
        for v in mono {
            assert!((v - 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn monopole_of_linear_grid() {
        // xi(mu) = mu on [0, 1] integrates to 1/2 exactly under trapezoid.
        let n = 51;
        let dmu = 1.0 / (n as f64 - 1.0);
        let row: Vec<f64> = (0..n).map(|i| i as f64 * dmu).collect();
        let mono = monopole(&[row], dmu).unwrap();
        assert!((mono[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn monopole_rejects_bad_grids() {
        assert!(monopole(&[], 0.1).is_err());
        assert!(monopole(&[vec![1.0]], 0.1).is_err());
        assert!(monopole(&[vec![1.0, 2.0], vec![1.0]], 0.1).is_err());
        assert!(monopole(&[vec![1.0, 2.0]], 0.0).is_err());
    }

    #[test]
    fn covariance_of_known_sample() {
        // Two variables, three realizations; hand-computed covariance.
        let reals = vec![
            vec![1.0, 2.0],
            vec![2.0, 4.0],
            vec![3.0, 6.0],
        ];
        let cov = sample_covariance(&reals).unwrap();
        // var(x) = 1, var(y) = 4, cov(x, y) = 2 with N-1 = 2.
        assert!((cov[(0, 0)] - 1.0).abs() < 1e-12);
        assert!((cov[(1, 1)] - 4.0).abs() < 1e-12);
        assert!((cov[(0, 1)] - 2.0).abs() < 1e-12);
        assert!((cov[(1, 0)] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn covariance_is_symmetric() {
        let reals: Vec<Vec<f64>> = (0..8)
            .map(|m| (0..5).map(|i| ((m * 7 + i * 3) % 11) as f64).collect())
            .collect();
        let cov = sample_covariance(&reals).unwrap();
        for i in 0..5 {
            for j in 0..5 {
                assert_eq!(cov[(i, j)], cov[(j, i)]);
            }
        }
    }

    #[test]
    fn covariance_rejects_degenerate_input() {
        assert!(sample_covariance(&[vec![1.0, 2.0]]).is_err());
        assert!(sample_covariance(&[vec![1.0], vec![1.0, 2.0]]).is_err());
        assert!(sample_covariance(&[vec![], vec![]]).is_err());
    }
}
