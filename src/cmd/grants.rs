//! Grants command - per-grant results with the precise tax attribution

use crate::cmd::load_validated;
use crate::grants::GrantKind;
use crate::store::STORE_FILE;
use crate::tax::il::TaxYear;
use crate::tax::options::calculate_option_result;
use crate::tax::rsu::calculate_rsu_result;
use crate::tax::PackageResult;
use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use std::io;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct GrantsCommand {
    /// Portfolio JSON file
    #[arg(short, long, default_value = STORE_FILE)]
    file: PathBuf,

    /// Only show grants of this kind
    #[arg(short, long, value_enum)]
    kind: Option<KindArg>,

    /// Evaluate RSU vesting as of this date (YYYY-MM-DD); option grants are
    /// always valued in full
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Output as JSON instead of formatted table
    #[arg(long, conflicts_with = "csv")]
    json: bool,

    /// Output as CSV instead of formatted table
    #[arg(long)]
    csv: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Option,
    Rsu,
}

impl From<KindArg> for GrantKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Option => GrantKind::Option,
            KindArg::Rsu => GrantKind::Rsu,
        }
    }
}

impl GrantsCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let portfolio = load_validated(&self.file)?;
        let info = &portfolio.personal_info;
        let year = TaxYear::default();
        let kind_filter: Option<GrantKind> = self.kind.map(Into::into);

        let mut results: Vec<PackageResult> = Vec::new();

        if kind_filter != Some(GrantKind::Rsu) {
            for option in &portfolio.options {
                // The isolated option report values the whole grant, so
                // vesting (and --as-of) does not apply here
                results.push(calculate_option_result(
                    option,
                    info.stock_price,
                    info.exchange_rate,
                    info.annual_salary(),
                    info.credit_points,
                    year,
                ));
            }
        }
        if kind_filter != Some(GrantKind::Option) {
            for rsu in &portfolio.rsus {
                let vested = rsu.vested_as_of(self.as_of);
                if let Some(result) = calculate_rsu_result(
                    rsu,
                    vested,
                    info.stock_price,
                    info.exchange_rate,
                    info.annual_salary(),
                    info.credit_points,
                    year,
                ) {
                    results.push(result);
                }
            }
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&results)?);
        } else if self.csv {
            write_csv(&results, io::stdout())?;
        } else {
            print_table(&results);
        }
        Ok(())
    }
}

#[derive(Debug, Tabled)]
struct GrantRow {
    #[tabled(rename = "Grant")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Route")]
    route: String,
    #[tabled(rename = "Gross (NIS)")]
    gross_nis: String,
    #[tabled(rename = "Tax (NIS)")]
    tax_nis: String,
    #[tabled(rename = "Net (NIS)")]
    net_nis: String,
    #[tabled(rename = "Net (USD)")]
    net_usd: String,
}

fn print_table(results: &[PackageResult]) {
    if results.is_empty() {
        println!("No grants with available shares");
        return;
    }

    let rows: Vec<GrantRow> = results
        .iter()
        .map(|r| GrantRow {
            name: r.name.clone(),
            kind: r.kind.to_string(),
            route: match (r.is_underwater, r.route) {
                (true, _) => "underwater".to_string(),
                (false, Some(route)) => route.to_string(),
                (false, None) => "-".to_string(),
            },
            gross_nis: format_amount(r.gross_value_nis),
            tax_nis: format_amount(r.tax.total_tax),
            net_nis: format_amount(r.net_value_nis),
            net_usd: format_amount(r.net_value_usd),
        })
        .collect();

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}

fn write_csv<W: io::Write>(results: &[PackageResult], writer: W) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([
        "id",
        "name",
        "kind",
        "route",
        "gross_value_nis",
        "income_tax",
        "capital_gains_tax",
        "bituah_leumi",
        "health_insurance",
        "surtax",
        "total_tax",
        "net_value_nis",
        "net_value_usd",
    ])?;
    for r in results {
        let route = match (r.is_underwater, r.route) {
            (true, _) => "underwater".to_string(),
            (false, Some(route)) => route.to_string(),
            (false, None) => String::new(),
        };
        wtr.write_record([
            r.id.clone(),
            r.name.clone(),
            r.kind.display().to_string(),
            route,
            format_amount(r.gross_value_nis),
            format_amount(r.tax.income_tax),
            format_amount(r.tax.capital_gains_tax),
            format_amount(r.tax.bituah_leumi),
            format_amount(r.tax.health_insurance),
            format_amount(r.tax.surtax),
            format_amount(r.tax.total_tax),
            format_amount(r.net_value_nis),
            format_amount(r.net_value_usd),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount)
}
