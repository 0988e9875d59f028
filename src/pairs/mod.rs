//! Pair counting: separation decomposition, chunked accumulation, and the
//! counted results with their persistence.
//!
//! The separation of a galaxy pair is split into a line-of-sight (parallel)
//! and a transverse (perpendicular) component using the midpoint-vector
//! projection: with s = (a + b)/2 and d = b − a,
//!
//!   r∥ = d · ŝ        (signed)
//!   r⊥ = sqrt(|d|² − r∥²)   (non-negative)
//!
//! Counting runs over the first point set in fixed-size chunks. Chunks bound
//! peak memory and give the parallel fan-out its work units; because bin
//! counts are integers, the merged histogram is bit-identical to a single
//! unchunked pass regardless of thread scheduling.

pub mod count;
pub mod histogram;

use anyhow::{anyhow, bail, Result};
use rkyv::{Archive, Deserialize, Serialize};
use tracing::info;

pub use count::{count_pairs, count_pairs_auto, count_pairs_radial, count_pairs_radial_auto};
pub use histogram::{Histogram1d, Histogram2d};

use crate::Vector3;

// ── Separation decomposition ────────────────────────────────────────────────

/// Split the separation of a pair into (perpendicular, parallel) components
/// with the midpoint-vector projection. The parallel component is signed;
/// the perpendicular component is non-negative.
///
/// A degenerate midpoint (antipodal points, |a + b| = 0) has no line-of-sight
/// direction; the full separation is reported as transverse.
pub fn separation_components(a: &Vector3, b: &Vector3) -> (f64, f64) {
    let los = (a + b) * 0.5;
    let d = b - a;
    let los_norm = los.norm();
    if los_norm == 0.0 {
        return (d.norm(), 0.0);
    }
    let r_par = d.dot(&los) / los_norm;
    let r_perp = (d.norm_squared() - r_par * r_par).max(0.0).sqrt();
    (r_perp, r_par)
}

// ── Configuration ───────────────────────────────────────────────────────────

/// Parameters controlling pair counting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairCountConfig {
    /// Number of bins per histogram axis.
    pub nbins: usize,
    /// Histogram half-range in Mpc: 2D axes span (−r_max, r_max),
    /// radial bins span [0, r_max).
    pub r_max: f64,
    /// Number of first-set points processed per chunk.
    pub chunk_size: usize,
}

impl Default for PairCountConfig {
    fn default() -> Self {
        Self {
            nbins: 200,
            r_max: 300.0,
            chunk_size: 50,
        }
    }
}

// ── Counted results ─────────────────────────────────────────────────────────

/// A 2D pair-count result together with the catalog sizes that produced it.
///
/// The histogram holds *raw* counts: each unordered pair (auto mode) or each
/// ordered cross pair appears exactly once, with r⊥ ≥ 0. Use
/// [`PairCounts::mirrored`] for the symmetric two-sided grid.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct PairCounts {
    pub hist: Histogram2d,
    /// Size of the first (chunked) point set.
    pub num_first: u64,
    /// Size of the second point set. Equals `num_first` in auto mode.
    pub num_second: u64,
    /// Auto-correlation mode: both inputs were the same set and only
    /// upper-triangular pairs were counted.
    pub auto: bool,
}

impl PairCounts {
    /// Total number of distinct pairs the count ran over:
    /// n(n−1)/2 in auto mode, n₁·n₂ in cross mode. This is the estimator's
    /// normalization denominator.
    pub fn pair_norm(&self) -> f64 {
        if self.auto {
            let n = self.num_first as f64;
            n * (n - 1.0) / 2.0
        } else {
            self.num_first as f64 * self.num_second as f64
        }
    }

    /// Histogram mirrored across the transverse axis (see
    /// [`Histogram2d::mirrored`]).
    pub fn mirrored(&self) -> Histogram2d {
        self.hist.mirrored()
    }

    // ── Plain-text persistence ──

    /// Render the counts as a text matrix: comment header with the metadata,
    /// then one whitespace-separated row of counts per perpendicular bin.
    /// `loadtxt`-style readers skip the `#` lines.
    pub fn to_text(&self) -> String {
        let nbins = self.hist.nbins();
        let mut out = String::new();
        out.push_str("# twopt pair counts v1\n");
        out.push_str(&format!(
            "# num_first={} num_second={} auto={} nbins={} r_max={}\n",
            self.num_first,
            self.num_second,
            self.auto as u8,
            nbins,
            self.hist.r_max(),
        ));
        for i in 0..nbins {
            for j in 0..nbins {
                if j > 0 {
                    out.push(' ');
                }
                out.push_str(&self.hist.at(i, j).to_string());
            }
            out.push('\n');
        }
        out
    }

    /// Parse the text format written by [`PairCounts::to_text`].
    pub fn from_text(data: &str) -> Result<Self> {
        let mut meta: Option<(u64, u64, bool, usize, f64)> = None;
        let mut counts: Vec<u64> = Vec::new();

        for line in data.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(rest) = line.strip_prefix('#') {
                if rest.contains("num_first=") {
                    meta = Some(parse_count_header(rest)?);
                }
                continue;
            }
            for field in line.split_whitespace() {
                counts.push(
                    field
                        .parse()
                        .map_err(|_| anyhow!("bad count value {field:?}"))?,
                );
            }
        }

        let (num_first, num_second, auto, nbins, r_max) =
            meta.ok_or_else(|| anyhow!("missing pair-count header line"))?;
        if counts.len() != nbins * nbins {
            bail!(
                "expected {} counts for a {nbins}x{nbins} grid, found {}",
                nbins * nbins,
                counts.len()
            );
        }
        Ok(Self {
            hist: Histogram2d::from_counts(nbins, r_max, counts),
            num_first,
            num_second,
            auto,
        })
    }

    /// Write the text matrix to a file.
    pub fn save_text(&self, path: &str) -> Result<()> {
        std::fs::write(path, self.to_text())?;
        info!("Saved pair counts to {path}");
        Ok(())
    }

    /// Read a text matrix from a file.
    pub fn load_text(path: &str) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_text(&data)
    }
}

/// Parse `num_first=.. num_second=.. auto=.. nbins=.. r_max=..` fields.
fn parse_count_header(rest: &str) -> Result<(u64, u64, bool, usize, f64)> {
    let mut num_first = None;
    let mut num_second = None;
    let mut auto = None;
    let mut nbins = None;
    let mut r_max = None;
    for field in rest.split_whitespace() {
        let Some((key, value)) = field.split_once('=') else {
            continue;
        };
        match key {
            "num_first" => num_first = value.parse::<u64>().ok(),
            "num_second" => num_second = value.parse::<u64>().ok(),
            "auto" => auto = value.parse::<u8>().ok().map(|v| v != 0),
            "nbins" => nbins = value.parse::<usize>().ok(),
            "r_max" => r_max = value.parse::<f64>().ok(),
            _ => {}
        }
    }
    match (num_first, num_second, auto, nbins, r_max) {
        (Some(a), Some(b), Some(c), Some(d), Some(e)) if d > 0 && e > 0.0 => Ok((a, b, c, d, e)),
        _ => bail!("malformed pair-count header: {rest:?}"),
    }
}

/// A 1D radial pair-count result (see [`PairCounts`]).
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct PairCounts1d {
    pub hist: Histogram1d,
    pub num_first: u64,
    pub num_second: u64,
    pub auto: bool,
}

impl PairCounts1d {
    /// Estimator normalization denominator; see [`PairCounts::pair_norm`].
    pub fn pair_norm(&self) -> f64 {
        if self.auto {
            let n = self.num_first as f64;
            n * (n - 1.0) / 2.0
        } else {
            self.num_first as f64 * self.num_second as f64
        }
    }
}

// ── Bundled DD/DR/RR set ────────────────────────────────────────────────────

/// The three pair counts an estimator run needs, serialized together so a
/// counting run can be reloaded without re-reading the catalogs.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct PairCountSet {
    pub dd: PairCounts,
    pub dr: PairCounts,
    pub rr: PairCounts,
}

impl PairCountSet {
    /// Serialize the set to bytes using rkyv.
    pub fn to_rkyv_bytes(&self) -> Vec<u8> {
        rkyv::to_bytes::<rkyv::rancor::Error>(self)
            .expect("rkyv serialization failed")
            .to_vec()
    }

    /// Save the set to a file using rkyv.
    pub fn save_to_file(&self, path: &str) -> Result<()> {
        let bytes = self.to_rkyv_bytes();
        std::fs::write(path, &bytes)?;
        info!("Saved pair-count set to {path} ({} bytes)", bytes.len());
        Ok(())
    }

    /// Load a set from an rkyv file.
    pub fn load_from_file(path: &str) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let set = rkyv::from_bytes::<Self, rkyv::rancor::Error>(&bytes)
            .map_err(|e| anyhow!("rkyv deserialization failed: {}", e))?;
        info!(
            "Loaded pair-count set: {} DD, {} DR, {} RR entries",
            set.dd.hist.total(),
            set.dr.hist.total(),
            set.rr.hist.total()
        );
        Ok(set)
    }
}
