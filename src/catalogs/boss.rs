//! CSV exports of BOSS/SDSS spectroscopic catalogs.
//!
//! The survey pipeline distributes its galaxy sample as FITS tables; for this
//! crate the relevant columns (`PLUG_RA`, `PLUG_DEC`, `Z`) are expected as a
//! CSV export with a header row. Angles are degrees in the file.

use std::path::Path;

use anyhow::{anyhow, Result};

use crate::galaxy::Galaxy;

/// Required column names in the CSV header.
const RA_COLUMN: &str = "PLUG_RA";
const DEC_COLUMN: &str = "PLUG_DEC";
const Z_COLUMN: &str = "Z";

/// Read a BOSS-style CSV catalog. Column order is free; the header row must
/// name `PLUG_RA`, `PLUG_DEC` and `Z`. Rows with unparseable values are
/// skipped, matching the text-mock reader.
pub fn read_boss_csv<P: AsRef<Path>>(file: P) -> Result<Vec<Galaxy>> {
    let mut rdr = csv::Reader::from_path(file)?;

    let headers = rdr.headers()?;
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .ok_or_else(|| anyhow!("missing column {name} in CSV header"))
    };
    let ra_idx = column(RA_COLUMN)?;
    let dec_idx = column(DEC_COLUMN)?;
    let z_idx = column(Z_COLUMN)?;

    let mut galaxies = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let field = |idx: usize| record.get(idx).and_then(|s| s.trim().parse::<f64>().ok());
        let (Some(ra_deg), Some(dec_deg), Some(redshift)) =
            (field(ra_idx), field(dec_idx), field(z_idx))
        else {
            continue;
        };
        galaxies.push(Galaxy {
            ra_rad: ra_deg.to_radians(),
            dec_rad: dec_deg.to_radians(),
            redshift,
        });
    }
    Ok(galaxies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn reads_named_columns_in_any_order() {
        let path = write_temp(
            "twopt_boss_cols.csv",
            "Z,PLUG_DEC,PLUG_RA\n0.55,2.2,150.0\n0.48,-12.0,210.5\n",
        );
        let gals = read_boss_csv(&path).unwrap();
        assert_eq!(gals.len(), 2);
        assert!((gals[0].ra_rad - 150.0_f64.to_radians()).abs() < 1e-12);
        assert_eq!(gals[1].redshift, 0.48);
    }

    #[test]
    fn skips_unparseable_rows() {
        let path = write_temp(
            "twopt_boss_bad.csv",
            "PLUG_RA,PLUG_DEC,Z\n150.0,2.2,0.55\nnot,a,row\n",
        );
        let gals = read_boss_csv(&path).unwrap();
        assert_eq!(gals.len(), 1);
    }

    #[test]
    fn missing_column_is_an_error() {
        let path = write_temp("twopt_boss_missing.csv", "PLUG_RA,PLUG_DEC\n150.0,2.2\n");
        assert!(read_boss_csv(&path).is_err());
    }
}
