//! Owned galaxy catalog: loading, redshift cuts, subsampling, and conversion
//! to comoving Cartesian coordinates.

use std::path::Path;

use anyhow::{bail, Result};
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::catalogs::{boss, mock};
use crate::cosmology::FlatLambdaCdm;
use crate::galaxy::Galaxy;
use crate::Vector3;

/// Lower edge of the CMASS sample redshift window.
pub const CMASS_Z_MIN: f64 = 0.43;
/// Upper edge of the CMASS sample redshift window.
pub const CMASS_Z_MAX: f64 = 0.7;

/// An owned set of galaxies, kept in file order until subsampled.
#[derive(Debug, Clone, Default)]
pub struct GalaxyCatalog {
    galaxies: Vec<Galaxy>,
}

impl GalaxyCatalog {
    /// Build a catalog from owned galaxies.
    pub fn new(galaxies: Vec<Galaxy>) -> Self {
        Self { galaxies }
    }

    /// Load a whitespace-delimited text catalog (RA deg, Dec deg, redshift).
    pub fn from_text_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let galaxies = mock::load_mock_catalog_from_file(path)?;
        info!("Read {} galaxies from {}", galaxies.len(), path.display());
        if galaxies.is_empty() {
            bail!("no parseable rows in {}", path.display());
        }
        Ok(Self::new(galaxies))
    }

    /// Load a BOSS-style CSV catalog (`PLUG_RA`, `PLUG_DEC`, `Z` columns).
    pub fn from_boss_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let galaxies = boss::read_boss_csv(path)?;
        info!("Read {} galaxies from {}", galaxies.len(), path.display());
        if galaxies.is_empty() {
            bail!("no parseable rows in {}", path.display());
        }
        Ok(Self::new(galaxies))
    }

    /// Load a two-column (RA, Dec) random catalog, drawing each redshift
    /// from `donor`'s redshift distribution with a seeded RNG.
    pub fn from_radec_file<P: AsRef<Path>>(path: P, donor: &Self, seed: u64) -> Result<Self> {
        let path = path.as_ref();
        if donor.is_empty() {
            bail!("donor catalog for redshift assignment is empty");
        }
        let radec = mock::load_radec_catalog_from_file(path)?;
        if radec.is_empty() {
            bail!("no parseable rows in {}", path.display());
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let galaxies: Vec<Galaxy> = radec
            .into_iter()
            .map(|(ra_rad, dec_rad)| Galaxy {
                ra_rad,
                dec_rad,
                redshift: donor.galaxies[rng.random_range(0..donor.len())].redshift,
            })
            .collect();
        info!(
            "Read {} randoms from {}, redshifts drawn from {} donors",
            galaxies.len(),
            path.display(),
            donor.len()
        );
        Ok(Self::new(galaxies))
    }

    /// Keep only galaxies with `z_min < z < z_max` (both edges exclusive,
    /// matching the survey cut).
    pub fn with_redshift_window(mut self, z_min: f64, z_max: f64) -> Self {
        let before = self.galaxies.len();
        self.galaxies
            .retain(|g| g.redshift > z_min && g.redshift < z_max);
        info!(
            "Redshift window ({z_min}, {z_max}): kept {} of {before}",
            self.galaxies.len()
        );
        self
    }

    /// Randomly subsample down to at most `max` galaxies with a seeded RNG.
    /// `max == 0` disables subsampling.
    ///
    /// Selection is deterministic for a given (catalog, max, seed); the
    /// drawn galaxies keep their original relative order.
    pub fn subsample(mut self, max: usize, seed: u64) -> Self {
        if max == 0 || self.galaxies.len() <= max {
            return self;
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let mut chosen: Vec<usize> = sample(&mut rng, self.galaxies.len(), max).into_vec();
        chosen.sort_unstable();
        self.galaxies = chosen
            .into_iter()
            .map(|idx| self.galaxies[idx].clone())
            .collect();
        info!("Subsampled catalog to {} galaxies", self.galaxies.len());
        self
    }

    /// Comoving Cartesian positions for every galaxy, in catalog order.
    pub fn positions(&self, cosmo: &FlatLambdaCdm) -> Result<Vec<Vector3>> {
        self.galaxies.iter().map(|g| g.position(cosmo)).collect()
    }

    /// All redshifts, in catalog order.
    pub fn redshifts(&self) -> Vec<f64> {
        self.galaxies.iter().map(|g| g.redshift).collect()
    }

    /// Return the number of galaxies in the catalog.
    pub fn len(&self) -> usize {
        self.galaxies.len()
    }

    /// Return `true` when the catalog contains no galaxies.
    pub fn is_empty(&self) -> bool {
        self.galaxies.is_empty()
    }

    /// Return all galaxies as an immutable slice.
    pub fn galaxies(&self) -> &[Galaxy] {
        &self.galaxies
    }
}
