//! Input validation for the stored portfolio.
//!
//! All checks run before any calculation; the first failure per field wins
//! so a single bad value does not cascade into a wall of messages.

use crate::grants::{Portfolio, RsuGrant, StockOptionGrant};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

const MAX_CREDIT_POINTS: Decimal = dec!(20);
const MIN_EXCHANGE_RATE: Decimal = dec!(1);
const MAX_EXCHANGE_RATE: Decimal = dec!(10);
const MAX_NAME_LEN: usize = 50;
const MAX_VESTING_YEARS: u32 = 10;

/// Validation failures keyed by field path, e.g. `options[0].used_quantity`
#[derive(Debug, Default)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }

    fn add(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.entry(path.into()).or_insert_with(|| message.into());
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (path, message) in &self.0 {
            writeln!(f, "{path}: {message}")?;
        }
        Ok(())
    }
}

/// Check every field of the portfolio, returning all failures at once
pub fn validate_portfolio(portfolio: &Portfolio) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    let info = &portfolio.personal_info;
    if info.monthly_salary < Decimal::ZERO {
        errors.add("personal_info.monthly_salary", "must not be negative");
    }
    if info.credit_points < Decimal::ZERO || info.credit_points > MAX_CREDIT_POINTS {
        errors.add("personal_info.credit_points", "must be between 0 and 20");
    }
    if info.exchange_rate < MIN_EXCHANGE_RATE || info.exchange_rate > MAX_EXCHANGE_RATE {
        errors.add("personal_info.exchange_rate", "must be between 1 and 10");
    }
    if info.stock_price <= Decimal::ZERO {
        errors.add("personal_info.stock_price", "must be positive");
    }

    for (i, option) in portfolio.options.iter().enumerate() {
        validate_option(option, &format!("options[{i}]"), &mut errors);
    }
    for (i, rsu) in portfolio.rsus.iter().enumerate() {
        validate_rsu(rsu, &format!("rsus[{i}]"), &mut errors);
    }

    errors
}

fn validate_option(option: &StockOptionGrant, path: &str, errors: &mut ValidationErrors) {
    validate_name(&option.name, path, errors);
    validate_quantities(
        option.total_quantity,
        option.vested_quantity,
        option.used_quantity,
        path,
        errors,
    );
    validate_schedule(option.vesting_duration_years, path, errors);
    if option.exercise_price < Decimal::ZERO {
        errors.add(format!("{path}.exercise_price"), "must not be negative");
    }
    if option.average_price < Decimal::ZERO {
        errors.add(format!("{path}.average_price"), "must not be negative");
    }
}

fn validate_rsu(rsu: &RsuGrant, path: &str, errors: &mut ValidationErrors) {
    validate_name(&rsu.name, path, errors);
    validate_quantities(
        rsu.total_quantity,
        rsu.vested_quantity,
        rsu.used_quantity,
        path,
        errors,
    );
    validate_schedule(rsu.vesting_duration_years, path, errors);
    if rsu.average_vesting_price < Decimal::ZERO {
        errors.add(format!("{path}.average_vesting_price"), "must not be negative");
    }
}

fn validate_name(name: &str, path: &str, errors: &mut ValidationErrors) {
    if name.trim().is_empty() {
        errors.add(format!("{path}.name"), "must not be empty");
    } else if name.len() > MAX_NAME_LEN {
        errors.add(format!("{path}.name"), "must be at most 50 characters");
    }
}

fn validate_quantities(
    total: u32,
    vested: Option<u32>,
    used: u32,
    path: &str,
    errors: &mut ValidationErrors,
) {
    if total == 0 {
        errors.add(format!("{path}.total_quantity"), "must be positive");
    }
    if let Some(vested) = vested {
        if vested > total {
            errors.add(
                format!("{path}.vested_quantity"),
                "must not exceed total_quantity",
            );
        }
        if used > vested {
            errors.add(
                format!("{path}.used_quantity"),
                "must not exceed vested_quantity",
            );
        }
    } else if used > total {
        errors.add(
            format!("{path}.used_quantity"),
            "must not exceed total_quantity",
        );
    }
}

fn validate_schedule(duration_years: u32, path: &str, errors: &mut ValidationErrors) {
    if duration_years == 0 || duration_years > MAX_VESTING_YEARS {
        errors.add(
            format!("{path}.vesting_duration_years"),
            "must be between 1 and 10",
        );
    }
}
