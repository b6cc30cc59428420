//! Exchange rate snapshots.
//!
//! Rates come from a small JSON snapshot file rather than a live feed, so
//! runs are reproducible and work offline. The snapshot carries the date it
//! was taken so stale rates are visible to the user.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

const MIN_RATE: Decimal = dec!(1);
const MAX_RATE: Decimal = dec!(10);

/// A USD/NIS exchange rate observed on a given date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub rate: Decimal,
    pub date: NaiveDate,
}

#[derive(Debug, Error)]
pub enum RateError {
    #[error("failed to read rate snapshot: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse rate snapshot: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("exchange rate {0} outside the plausible 1-10 range")]
    OutOfRange(Decimal),
}

/// Read and sanity-check a rate snapshot, e.g.
/// `{"rate": 3.45, "date": "2025-06-30"}`
pub fn read_snapshot<R: Read>(reader: R) -> Result<ExchangeRate, RateError> {
    let snapshot: ExchangeRate = serde_json::from_reader(reader)?;
    if snapshot.rate < MIN_RATE || snapshot.rate > MAX_RATE {
        return Err(RateError::OutOfRange(snapshot.rate));
    }
    log::debug!("loaded exchange rate {} from {}", snapshot.rate, snapshot.date);
    Ok(snapshot)
}

/// Open and read a rate snapshot file
pub fn load_snapshot(path: &Path) -> Result<ExchangeRate, RateError> {
    read_snapshot(File::open(path)?)
}
