//! Chunked pair-count accumulation.
//!
//! The first point set is split into fixed-size chunks; each chunk scans its
//! partners and bins separations into a private histogram, and the partial
//! histograms are merged by integer addition. Chunks run on the rayon pool,
//! but because bin counts are integers the merged result is identical to a
//! sequential single-pass count whatever the reduction tree looks like, so
//! the parallelism is observable only in wall-clock time.
//!
//! Auto mode (both inputs the same set) counts strictly upper-triangular
//! (i, j) with j > i: no point pairs with itself and each unordered pair is
//! counted exactly once. Cross mode counts every (i, j) of first × second
//! once.

use rayon::prelude::*;
use tracing::info;

use super::histogram::{Histogram1d, Histogram2d};
use super::{separation_components, PairCountConfig, PairCounts, PairCounts1d};
use crate::Vector3;

/// Count cross pairs between two point sets into a 2D (r⊥, r∥) histogram.
pub fn count_pairs(
    first: &[Vector3],
    second: &[Vector3],
    config: &PairCountConfig,
) -> PairCounts {
    info!(
        "Counting cross pairs: {} x {} points, {} bins to {} Mpc",
        first.len(),
        second.len(),
        config.nbins,
        config.r_max
    );
    let hist = accumulate_2d(first, second, config, false);
    info!("Cross pair counting done: {} pairs in range", hist.total());
    PairCounts {
        hist,
        num_first: first.len() as u64,
        num_second: second.len() as u64,
        auto: false,
    }
}

/// Count auto pairs of one point set into a 2D (r⊥, r∥) histogram.
/// Only unordered pairs are counted; self-pairs are excluded.
pub fn count_pairs_auto(points: &[Vector3], config: &PairCountConfig) -> PairCounts {
    info!(
        "Counting auto pairs: {} points, {} bins to {} Mpc",
        points.len(),
        config.nbins,
        config.r_max
    );
    let hist = accumulate_2d(points, points, config, true);
    info!("Auto pair counting done: {} pairs in range", hist.total());
    PairCounts {
        hist,
        num_first: points.len() as u64,
        num_second: points.len() as u64,
        auto: true,
    }
}

/// Count cross pairs into 1D radial |d| bins.
pub fn count_pairs_radial(
    first: &[Vector3],
    second: &[Vector3],
    config: &PairCountConfig,
) -> PairCounts1d {
    let hist = accumulate_1d(first, second, config, false);
    PairCounts1d {
        hist,
        num_first: first.len() as u64,
        num_second: second.len() as u64,
        auto: false,
    }
}

/// Count auto pairs into 1D radial |d| bins.
pub fn count_pairs_radial_auto(points: &[Vector3], config: &PairCountConfig) -> PairCounts1d {
    let hist = accumulate_1d(points, points, config, true);
    PairCounts1d {
        hist,
        num_first: points.len() as u64,
        num_second: points.len() as u64,
        auto: true,
    }
}

fn accumulate_2d(
    first: &[Vector3],
    second: &[Vector3],
    config: &PairCountConfig,
    auto: bool,
) -> Histogram2d {
    let chunk_size = config.chunk_size.max(1);
    first
        .par_chunks(chunk_size)
        .enumerate()
        .map(|(chunk_idx, chunk)| {
            let base = chunk_idx * chunk_size;
            let mut hist = Histogram2d::new(config.nbins, config.r_max);
            for (offset, a) in chunk.iter().enumerate() {
                // In auto mode only partners after this point, so each
                // unordered pair is binned once and never against itself.
                let start = if auto { base + offset + 1 } else { 0 };
                for b in &second[start..] {
                    let (perp, par) = separation_components(a, b);
                    hist.fill(perp, par);
                }
            }
            hist
        })
        .reduce(
            || Histogram2d::new(config.nbins, config.r_max),
            |mut total, partial| {
                total.merge(&partial);
                total
            },
        )
}

fn accumulate_1d(
    first: &[Vector3],
    second: &[Vector3],
    config: &PairCountConfig,
    auto: bool,
) -> Histogram1d {
    let chunk_size = config.chunk_size.max(1);
    first
        .par_chunks(chunk_size)
        .enumerate()
        .map(|(chunk_idx, chunk)| {
            let base = chunk_idx * chunk_size;
            let mut hist = Histogram1d::new(config.nbins, config.r_max);
            for (offset, a) in chunk.iter().enumerate() {
                let start = if auto { base + offset + 1 } else { 0 };
                for b in &second[start..] {
                    hist.fill((b - a).norm());
                }
            }
            hist
        })
        .reduce(
            || Histogram1d::new(config.nbins, config.r_max),
            |mut total, partial| {
                total.merge(&partial);
                total
            },
        )
}
