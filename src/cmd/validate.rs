//! Validate command - surface input problems without running a calculation

use crate::cmd::load_portfolio;
use crate::store::STORE_FILE;
use crate::validate::validate_portfolio;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// Portfolio JSON file
    #[arg(short, long, default_value = STORE_FILE)]
    file: PathBuf,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct ValidationIssue {
    field: String,
    message: String,
}

#[derive(Debug, Serialize)]
struct ValidationOutput {
    issue_count: usize,
    issues: Vec<ValidationIssue>,
}

impl ValidateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let portfolio = load_portfolio(&self.file)?;
        let errors = validate_portfolio(&portfolio);

        let issues: Vec<ValidationIssue> = errors
            .iter()
            .map(|(field, message)| ValidationIssue {
                field: field.clone(),
                message: message.clone(),
            })
            .collect();

        if self.json {
            let output = ValidationOutput {
                issue_count: issues.len(),
                issues,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!();
            if errors.is_empty() {
                println!("\u{2713} No issues found.");
            } else {
                println!("\u{26a0} {} issue(s) found:", errors.len());
                println!();
                for (field, message) in errors.iter() {
                    println!("  {field}: {message}");
                }
            }
            println!();
        }

        if !errors.is_empty() {
            std::process::exit(1);
        }
        Ok(())
    }
}
