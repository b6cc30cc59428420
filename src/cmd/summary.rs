//! Summary command - portfolio totals with the aggregated tax model

use crate::cmd::load_validated;
use crate::rates;
use crate::store::STORE_FILE;
use crate::tax::portfolio::{calculate, Simulation};
use crate::tax::CalculationResult;
use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct SummaryCommand {
    /// Portfolio JSON file
    #[arg(short, long, default_value = STORE_FILE)]
    file: PathBuf,

    /// Simulate the portfolio as of this date (YYYY-MM-DD), recomputing
    /// vesting from each grant's schedule
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Override the stock price, USD
    #[arg(long)]
    stock_price: Option<Decimal>,

    /// Override the USD/NIS exchange rate
    #[arg(long)]
    exchange_rate: Option<Decimal>,

    /// Take the exchange rate from a rate snapshot file instead
    #[arg(long, conflicts_with = "exchange_rate")]
    rates: Option<PathBuf>,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

impl SummaryCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let portfolio = load_validated(&self.file)?;

        let exchange_rate = match &self.rates {
            Some(path) => Some(rates::load_snapshot(path)?.rate),
            None => self.exchange_rate,
        };

        let simulation = self.simulation(&portfolio, exchange_rate);
        let result = calculate(
            &portfolio.personal_info,
            &portfolio.options,
            &portfolio.rsus,
            simulation.as_ref(),
        );

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        } else {
            print_summary(&result, self.as_of);
            Ok(())
        }
    }

    fn simulation(
        &self,
        portfolio: &crate::grants::Portfolio,
        exchange_rate: Option<Decimal>,
    ) -> Option<Simulation> {
        if self.as_of.is_none() && self.stock_price.is_none() && exchange_rate.is_none() {
            return None;
        }
        Some(Simulation {
            as_of: self.as_of,
            stock_price: self
                .stock_price
                .unwrap_or(portfolio.personal_info.stock_price),
            exchange_rate,
        })
    }
}

fn print_summary(result: &CalculationResult, as_of: Option<NaiveDate>) {
    let info = &result.personal_info;

    println!();
    match as_of {
        Some(date) => println!("NET EQUITY SUMMARY (as of {date})"),
        None => println!("NET EQUITY SUMMARY"),
    }
    println!();

    println!("INPUTS");
    println!(
        "  Salary: {}/mo ({}/yr) | Credit points: {}",
        format_nis(info.monthly_salary),
        format_nis(result.annual_salary),
        info.credit_points
    );
    println!(
        "  Stock: {} | Rate: {} NIS/USD | Marginal rate: {:.0}%",
        format_usd(info.stock_price),
        info.exchange_rate,
        result.marginal_tax_rate
    );
    println!();

    println!("GRANTS");
    if result.packages.is_empty() {
        println!("  (nothing vested and unsold)");
    }
    for pkg in &result.packages {
        if pkg.is_underwater {
            println!("  {} ({}): underwater, no value", pkg.name, pkg.kind);
            continue;
        }
        let route = pkg
            .route
            .map_or(String::new(), |r| format!(", {r} route"));
        println!(
            "  {} ({}{route}): gross {} | tax {} | net {}",
            pkg.name,
            pkg.kind,
            format_nis(pkg.gross_value_nis),
            format_nis(pkg.tax.total_tax),
            format_nis(pkg.net_value_nis)
        );
    }
    println!();

    let totals = &result.totals;
    println!("TAX");
    println!(
        "  Income: {} | Capital gains: {}",
        format_nis(totals.tax.income_tax),
        format_nis(totals.tax.capital_gains_tax)
    );
    println!(
        "  Bituah Leumi: {} | Health: {} | Credit points: -{}",
        format_nis(totals.tax.bituah_leumi),
        format_nis(totals.tax.health_insurance),
        format_nis(totals.tax.credit_points_reduction)
    );
    println!();

    println!(
        "TOTAL: gross {} ({}) | tax {} ({:.1}%) | net {} ({})",
        format_nis(totals.gross_value_nis),
        format_usd(totals.gross_value_usd),
        format_nis(totals.tax.total_tax),
        totals.effective_tax_rate,
        format_nis(totals.net_value_nis),
        format_usd(totals.net_value_usd)
    );
    println!();
}

fn format_nis(amount: Decimal) -> String {
    format!("\u{20aa}{:.2}", amount)
}

fn format_usd(amount: Decimal) -> String {
    format!("${:.2}", amount)
}
