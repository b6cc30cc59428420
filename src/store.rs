//! Portfolio persistence.
//!
//! A single pretty-printed JSON file in the working directory, read whole
//! and written whole. The file is the source of truth between runs.

use crate::grants::{self, Portfolio};
use anyhow::Context;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

pub const STORE_FILE: &str = "netvest.json";

/// Load the portfolio from the given file
pub fn load(path: &Path) -> anyhow::Result<Portfolio> {
    let file = File::open(path)
        .with_context(|| format!("failed to open portfolio file {}", path.display()))?;
    grants::read_json(BufReader::new(file))
        .with_context(|| format!("failed to parse portfolio file {}", path.display()))
}

/// Write the portfolio back, replacing the previous contents
pub fn save(path: &Path, portfolio: &Portfolio) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to write portfolio file {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), portfolio)?;
    log::debug!("saved portfolio to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grants::PersonalInfo;
    use rust_decimal_macros::dec;

    #[test]
    fn save_then_load_round_trips() {
        let dir = std::env::temp_dir().join("netvest-store-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(STORE_FILE);

        let portfolio = Portfolio {
            personal_info: PersonalInfo {
                monthly_salary: dec!(40_000),
                credit_points: dec!(2.25),
                exchange_rate: dec!(3.5),
                stock_price: dec!(20),
            },
            options: vec![],
            rsus: vec![],
        };

        save(&path, &portfolio).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded.personal_info, portfolio.personal_info);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_reports_the_path() {
        let err = load(Path::new("/nonexistent/netvest.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/netvest.json"));
    }
}
