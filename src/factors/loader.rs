//! CSV-based factor table loader
//!
//! Reads `year,total_factor` rows; every year 0..=30 must be present.

use std::fs::File;
use std::path::Path;

use super::table::{CashValueFactors, TABLE_LEN};
use crate::error::{EngineError, Result};

/// Default location of the shipped factor table
pub const DEFAULT_FACTOR_PATH: &str = "data/factors/cash_value_factors.csv";

/// Load total cash value factors from a CSV file
/// Returns the factors indexed by policy year
pub fn load_factor_table(path: &Path) -> Result<[f64; TABLE_LEN]> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);

    let mut factors: [Option<f64>; TABLE_LEN] = [None; TABLE_LEN];

    for result in reader.records() {
        let record = result?;
        let year: usize = parse_cell(&record, 0, "year")?;
        let factor: f64 = parse_cell(&record, 1, "total_factor")?;

        if year >= TABLE_LEN {
            return Err(EngineError::InvalidFactorTable {
                reason: format!("year {} is outside 0..={}", year, TABLE_LEN - 1),
            });
        }
        if factor <= 0.0 {
            return Err(EngineError::InvalidFactorTable {
                reason: format!("factor for year {} must be positive, got {}", year, factor),
            });
        }
        factors[year] = Some(factor);
    }

    let mut total = [0.0; TABLE_LEN];
    for (year, slot) in factors.iter().enumerate() {
        total[year] = slot.ok_or_else(|| EngineError::InvalidFactorTable {
            reason: format!("missing factor for year {}", year),
        })?;
    }

    Ok(total)
}

fn parse_cell<T: std::str::FromStr>(record: &csv::StringRecord, idx: usize, column: &str) -> Result<T> {
    let raw = record.get(idx).unwrap_or("").trim();
    raw.parse().map_err(|_| EngineError::InvalidFactorTable {
        reason: format!("column {} has non-numeric value {:?}", column, raw),
    })
}

impl CashValueFactors {
    /// Load a factor table from a CSV file
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        Ok(Self::from_total(load_factor_table(path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn shipped_table() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_FACTOR_PATH)
    }

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("premium_finance_{}_{}.csv", name, std::process::id()));
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_shipped_table_matches_builtin() {
        let loaded = CashValueFactors::from_csv_path(&shipped_table()).unwrap();
        assert_eq!(loaded, CashValueFactors::standard());
    }

    #[test]
    fn test_missing_year_rejected() {
        let mut contents = String::from("year,total_factor\n");
        for year in 0..30 {
            contents.push_str(&format!("{},1.0\n", year));
        }
        let path = write_temp("missing_year", &contents);
        let err = load_factor_table(&path).unwrap_err();
        assert!(matches!(err, EngineError::InvalidFactorTable { .. }));
        assert!(err.to_string().contains("year 30"));
    }

    #[test]
    fn test_non_positive_factor_rejected() {
        let path = write_temp("negative", "year,total_factor\n0,-0.5\n");
        assert!(matches!(
            load_factor_table(&path),
            Err(EngineError::InvalidFactorTable { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_factor_table(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(matches!(err, EngineError::Io(_)));
    }
}
