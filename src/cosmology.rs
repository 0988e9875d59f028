//! Flat ΛCDM background cosmology and distance measures.
//!
//! Distances are computed from redshift by quadrature of the inverse
//! dimensionless Hubble rate E(z) = sqrt(Ωm (1+z)³ + ΩΛ), with ΩΛ = 1 − Ωm
//! (flat universe, radiation neglected). All distances are in comoving Mpc
//! unless noted otherwise.

use anyhow::{bail, Result};

/// Speed of light in km/s.
pub const SPEED_OF_LIGHT_KM_S: f64 = 299_792.458;

/// Flat ΛCDM background: a Hubble constant and a matter density.
///
/// The dark-energy density is fixed by flatness, ΩΛ = 1 − Ωm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatLambdaCdm {
    /// Hubble constant in km/s/Mpc.
    pub h0: f64,
    /// Matter density parameter at z = 0.
    pub omega_m: f64,
}

impl Default for FlatLambdaCdm {
    /// The fiducial survey cosmology: H0 = 70 km/s/Mpc, Ωm = 0.3.
    fn default() -> Self {
        Self {
            h0: 70.0,
            omega_m: 0.3,
        }
    }
}

impl FlatLambdaCdm {
    /// Hubble distance c/H0 in Mpc.
    pub fn hubble_distance(&self) -> f64 {
        SPEED_OF_LIGHT_KM_S / self.h0
    }

    /// Dimensionless Hubble rate E(z) = H(z)/H0.
    pub fn efunc(&self, z: f64) -> f64 {
        let omega_l = 1.0 - self.omega_m;
        (self.omega_m * (1.0 + z).powi(3) + omega_l).sqrt()
    }

    /// Line-of-sight comoving distance to redshift `z`, in Mpc.
    ///
    /// Dc(z) = (c/H0) ∫₀ᶻ dz'/E(z'), evaluated with composite Simpson
    /// quadrature. Non-negative and monotonically increasing in `z`.
    /// Rejects negative or non-finite redshifts.
    pub fn comoving_distance(&self, z: f64) -> Result<f64> {
        if !z.is_finite() || z < 0.0 {
            bail!("redshift must be finite and non-negative, got {z}");
        }
        if z == 0.0 {
            return Ok(0.0);
        }
        Ok(self.hubble_distance() * self.inverse_efunc_integral(z))
    }

    /// Comoving distances for a whole redshift slice.
    pub fn comoving_distances(&self, redshifts: &[f64]) -> Result<Vec<f64>> {
        redshifts
            .iter()
            .map(|&z| self.comoving_distance(z))
            .collect()
    }

    /// Luminosity distance DL(z) = (1 + z) · Dc(z), in Mpc.
    pub fn luminosity_distance(&self, z: f64) -> Result<f64> {
        Ok((1.0 + z) * self.comoving_distance(z)?)
    }

    /// Distance modulus m − M = 5·log10(DL / 10 pc).
    ///
    /// Undefined at z = 0 (DL = 0), which is reported as an error.
    pub fn distance_modulus(&self, z: f64) -> Result<f64> {
        let dl_mpc = self.luminosity_distance(z)?;
        if dl_mpc <= 0.0 {
            bail!("distance modulus undefined at z = {z}");
        }
        // 1 Mpc = 10^5 * 10 pc
        Ok(5.0 * (dl_mpc * 1.0e5).log10())
    }

    /// ∫₀ᶻ dz'/E(z') by composite Simpson with a step of ~1/512 in z.
    fn inverse_efunc_integral(&self, z: f64) -> f64 {
        // Even interval count, at least 16.
        let n = (((z * 512.0).ceil() as usize).max(16) + 1) & !1;
        let h = z / n as f64;

        let mut sum = 1.0 / self.efunc(0.0) + 1.0 / self.efunc(z);
        for i in 1..n {
            let w = if i % 2 == 0 { 2.0 } else { 4.0 };
            sum += w / self.efunc(i as f64 * h);
        }
        sum * h / 3.0
    }
}
