//! Whitespace-delimited mock catalog files.
//!
//! Mock galaxy catalogs ship as plain text with one object per line:
//! RA (degrees), Dec (degrees), redshift. Random catalogs sometimes carry
//! only the two sky columns; those load as (RA, Dec) pairs and get their
//! redshifts drawn from a data catalog afterwards (see
//! `GalaxyCatalog::attach_redshifts_from`).
//!
//! Lines starting with `#` and lines that fail to parse are skipped.

use crate::galaxy::Galaxy;

/// Parse a single RA/Dec/redshift row. Angles are degrees in the file.
fn parse_galaxy_row(line: &str) -> Option<Galaxy> {
    let mut fields = line.split_whitespace();
    let ra_deg: f64 = fields.next()?.parse().ok()?;
    let dec_deg: f64 = fields.next()?.parse().ok()?;
    let redshift: f64 = fields.next()?.parse().ok()?;
    Some(Galaxy {
        ra_rad: ra_deg.to_radians(),
        dec_rad: dec_deg.to_radians(),
        redshift,
    })
}

/// Parse a single RA/Dec row (randoms without redshifts). Degrees in the file.
fn parse_radec_row(line: &str) -> Option<(f64, f64)> {
    let mut fields = line.split_whitespace();
    let ra_deg: f64 = fields.next()?.parse().ok()?;
    let dec_deg: f64 = fields.next()?.parse().ok()?;
    Some((ra_deg.to_radians(), dec_deg.to_radians()))
}

fn data_lines(data: &str) -> impl Iterator<Item = &str> {
    data.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
}

/// Load a three-column mock catalog from an in-memory string.
pub fn load_mock_catalog(data: &str) -> Vec<Galaxy> {
    data_lines(data).filter_map(parse_galaxy_row).collect()
}

/// Load a two-column (RA, Dec) random catalog from an in-memory string.
/// Angles are returned in radians.
pub fn load_radec_catalog(data: &str) -> Vec<(f64, f64)> {
    data_lines(data).filter_map(parse_radec_row).collect()
}

pub fn load_mock_catalog_from_file<P: AsRef<std::path::Path>>(
    path: P,
) -> anyhow::Result<Vec<Galaxy>> {
    let data = std::fs::read_to_string(path)?;
    Ok(load_mock_catalog(&data))
}

pub fn load_radec_catalog_from_file<P: AsRef<std::path::Path>>(
    path: P,
) -> anyhow::Result<Vec<(f64, f64)>> {
    let data = std::fs::read_to_string(path)?;
    Ok(load_radec_catalog(&data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_three_column_rows() {
        let text = "# ra dec z\n150.0 2.2 0.55\n210.5 -12.0 0.48\nbadrow x y\n";
        let gals = load_mock_catalog(text);
        assert_eq!(gals.len(), 2);
        assert!((gals[0].ra_rad - 150.0_f64.to_radians()).abs() < 1e-12);
        assert!((gals[1].dec_rad - (-12.0_f64).to_radians()).abs() < 1e-12);
        assert_eq!(gals[1].redshift, 0.48);
    }

    #[test]
    fn parses_two_column_randoms() {
        let text = "10.0 -5.0\n20.0 5.0\n";
        let radec = load_radec_catalog(text);
        assert_eq!(radec.len(), 2);
        assert!((radec[0].1 - (-5.0_f64).to_radians()).abs() < 1e-12);
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        let text = "\n# header\n\n  150.0 2.2 0.55  \n";
        assert_eq!(load_mock_catalog(text).len(), 1);
    }
}
