use clap::{Parser, Subcommand};

mod cmd;
mod grants;
mod rates;
mod store;
mod tax;
mod validate;
mod vesting;

/// Israeli net-of-tax calculator for employee stock options and RSUs
#[derive(Parser, Debug)]
#[command(name = "netvest", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a starter portfolio file
    Init(cmd::init::InitCommand),
    /// Portfolio totals with the aggregated tax model
    Summary(cmd::summary::SummaryCommand),
    /// Per-grant results with the precise tax attribution
    Grants(cmd::grants::GrantsCommand),
    /// Vesting schedule progress per grant
    Vesting(cmd::vesting::VestingCommand),
    /// Check the portfolio file for input problems
    Validate(cmd::validate::ValidateCommand),
    /// Apply an exchange rate snapshot to the portfolio
    Rate(cmd::rate::RateCommand),
    /// Print the JSON schema for the portfolio file
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Init(cmd) => cmd.exec(),
        Command::Summary(cmd) => cmd.exec(),
        Command::Grants(cmd) => cmd.exec(),
        Command::Vesting(cmd) => cmd.exec(),
        Command::Validate(cmd) => cmd.exec(),
        Command::Rate(cmd) => cmd.exec(),
        Command::Schema(cmd) => cmd.exec(),
    }
}
