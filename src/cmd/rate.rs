//! Rate command - apply an exchange rate snapshot to the stored portfolio

use crate::cmd::load_portfolio;
use crate::rates;
use crate::store::{self, STORE_FILE};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct RateCommand {
    /// Portfolio JSON file
    #[arg(short, long, default_value = STORE_FILE)]
    file: PathBuf,

    /// Rate snapshot file, e.g. {"rate": 3.45, "date": "2025-06-30"}
    #[arg(short, long)]
    rates: PathBuf,
}

impl RateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let snapshot = rates::load_snapshot(&self.rates)?;
        let mut portfolio = load_portfolio(&self.file)?;

        let previous = portfolio.personal_info.exchange_rate;
        portfolio.personal_info.exchange_rate = snapshot.rate;
        store::save(&self.file, &portfolio)?;

        println!(
            "Exchange rate updated: {previous} -> {} (as of {})",
            snapshot.rate, snapshot.date
        );
        Ok(())
    }
}
