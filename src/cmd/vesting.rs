//! Vesting command - schedule progress per grant

use crate::cmd::load_validated;
use crate::store::STORE_FILE;
use crate::tax::options::available_quantity;
use chrono::NaiveDate;
use clap::Args;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct VestingCommand {
    /// Portfolio JSON file
    #[arg(short, long, default_value = STORE_FILE)]
    file: PathBuf,

    /// Evaluate the schedules as of this date (YYYY-MM-DD)
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Tabled, serde::Serialize)]
struct VestingRow {
    #[tabled(rename = "Grant")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Schedule")]
    schedule: String,
    #[tabled(rename = "First Vesting")]
    first_vesting: String,
    #[tabled(rename = "Total")]
    total: u32,
    #[tabled(rename = "Vested")]
    vested: u32,
    #[tabled(rename = "Used")]
    used: u32,
    #[tabled(rename = "Available")]
    available: u32,
}

impl VestingCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let portfolio = load_validated(&self.file)?;

        let rows: Vec<VestingRow> = portfolio
            .grants()
            .iter()
            .map(|grant| {
                let vested = grant.vested_as_of(self.as_of);
                VestingRow {
                    name: grant.name().to_string(),
                    kind: grant.kind().to_string(),
                    schedule: format!(
                        "{}y {}",
                        grant.vesting_duration_years(),
                        grant.vesting_frequency()
                    ),
                    first_vesting: grant
                        .first_vesting_date()
                        .map_or("-".to_string(), |d| d.to_string()),
                    total: grant.total_quantity(),
                    vested,
                    used: grant.used_quantity(),
                    available: available_quantity(vested, grant.used_quantity()),
                }
            })
            .collect();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&rows)?);
            return Ok(());
        }

        println!();
        // Without a date the rows reflect stored quantities, so the header
        // must not claim a recomputation date
        match self.as_of {
            Some(date) => println!("VESTING (as of {date})"),
            None => println!("VESTING"),
        }
        println!();

        if rows.is_empty() {
            println!("No grants in portfolio");
            return Ok(());
        }

        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{table}");
        Ok(())
    }
}
