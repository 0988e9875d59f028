//! A single galaxy catalog entry and its sky/Cartesian conversions.

use crate::cosmology::FlatLambdaCdm;
use crate::Vector3;
use anyhow::Result;

/// One catalog entry: a sky position and a redshift.
/// RA and Dec are in radians; the redshift is the observed (heliocentric)
/// value straight from the catalog, with no peculiar-velocity correction.
#[derive(Debug, Clone, PartialEq)]
pub struct Galaxy {
    pub ra_rad: f64,
    pub dec_rad: f64,
    pub redshift: f64,
}

impl Galaxy {
    /// Unit vector pointing to the galaxy's position on the celestial sphere.
    pub fn uvec(&self) -> Vector3 {
        let (rasin, racos) = self.ra_rad.sin_cos();
        let (decsin, deccos) = self.dec_rad.sin_cos();
        Vector3::new(deccos * racos, deccos * rasin, decsin)
    }

    /// Comoving Cartesian position: comoving distance along the unit vector.
    pub fn position(&self, cosmo: &FlatLambdaCdm) -> Result<Vector3> {
        let comdist = cosmo.comoving_distance(self.redshift)?;
        Ok(self.uvec() * comdist)
    }
}

/// Recover (RA, Dec) in radians from a Cartesian position.
///
/// RA is wrapped into [0, 2π). The comoving distance is discarded; this is
/// the inverse of [`Galaxy::uvec`] up to the radial scale.
pub fn radec_from_xyz(v: &Vector3) -> (f64, f64) {
    let r = v.norm();
    let dec = if r > 0.0 {
        (v.z / r).clamp(-1.0, 1.0).asin()
    } else {
        0.0
    };
    let ra = v.y.atan2(v.x).rem_euclid(std::f64::consts::TAU);
    (ra, dec)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deg2rad(d: f64) -> f64 {
        d.to_radians()
    }

    #[test]
    fn uvec_is_unit_length() {
        let g = Galaxy {
            ra_rad: deg2rad(150.0),
            dec_rad: deg2rad(2.2),
            redshift: 0.5,
        };
        assert!((g.uvec().norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn radec_round_trip() {
        let cosmo = FlatLambdaCdm::default();
        for &(ra_deg, dec_deg) in &[
            (0.0, 0.0),
            (150.0, 2.2),
            (359.5, -45.0),
            (37.95, 89.26),
            (180.0, -89.9),
        ] {
            let g = Galaxy {
                ra_rad: deg2rad(ra_deg),
                dec_rad: deg2rad(dec_deg),
                redshift: 0.55,
            };
            let pos = g.position(&cosmo).unwrap();
            let (ra, dec) = radec_from_xyz(&pos);
            assert!(
                (ra - g.ra_rad).abs() < 1e-9,
                "RA mismatch at ({ra_deg}, {dec_deg})"
            );
            assert!(
                (dec - g.dec_rad).abs() < 1e-9,
                "Dec mismatch at ({ra_deg}, {dec_deg})"
            );
        }
    }

    #[test]
    fn position_magnitude_is_comoving_distance() {
        let cosmo = FlatLambdaCdm::default();
        let g = Galaxy {
            ra_rad: deg2rad(210.0),
            dec_rad: deg2rad(-12.0),
            redshift: 0.43,
        };
        let pos = g.position(&cosmo).unwrap();
        let d = cosmo.comoving_distance(0.43).unwrap();
        assert!((pos.norm() - d).abs() < 1e-9);
    }
}
