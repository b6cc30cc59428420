use crate::vesting;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// Personal financial inputs for a calculation.
///
/// Immutable once handed to the engine; a changed value requires a full
/// recalculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PersonalInfo {
    /// Gross monthly salary, NIS
    #[schemars(with = "f64")]
    pub monthly_salary: Decimal,
    /// Credit points (Nekudot Zikuy), 0-20
    #[schemars(with = "f64")]
    pub credit_points: Decimal,
    /// USD/NIS exchange rate, 1-10
    #[schemars(with = "f64")]
    pub exchange_rate: Decimal,
    /// Current stock price, USD
    #[schemars(with = "f64")]
    pub stock_price: Decimal,
}

impl PersonalInfo {
    pub fn annual_salary(&self) -> Decimal {
        self.monthly_salary * dec!(12)
    }
}

impl Default for PersonalInfo {
    fn default() -> Self {
        PersonalInfo {
            monthly_salary: Decimal::ZERO,
            credit_points: dec!(2.25),
            exchange_rate: dec!(3.20),
            stock_price: Decimal::ZERO,
        }
    }
}

/// How often shares vest within the schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum VestingFrequency {
    Monthly,
    #[default]
    Quarterly,
    Annually,
}

impl VestingFrequency {
    pub fn periods_per_year(&self) -> u32 {
        match self {
            VestingFrequency::Monthly => 12,
            VestingFrequency::Quarterly => 4,
            VestingFrequency::Annually => 1,
        }
    }

    pub fn display(&self) -> &'static str {
        match self {
            VestingFrequency::Monthly => "monthly",
            VestingFrequency::Quarterly => "quarterly",
            VestingFrequency::Annually => "annually",
        }
    }
}

impl std::fmt::Display for VestingFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// An employee stock option grant
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StockOptionGrant {
    pub id: String,
    pub name: String,
    pub total_quantity: u32,
    /// Vested shares; recomputed from the schedule when absent
    #[serde(default)]
    pub vested_quantity: Option<u32>,
    /// Shares already exercised
    #[serde(default)]
    pub used_quantity: u32,
    /// Strike price, USD
    #[schemars(with = "f64")]
    pub exercise_price: Decimal,
    /// 30-day average price at grant date, USD. Drives route classification.
    #[schemars(with = "f64")]
    pub average_price: Decimal,
    #[serde(default)]
    pub first_vesting_date: Option<NaiveDate>,
    #[serde(default = "default_vesting_duration")]
    pub vesting_duration_years: u32,
    #[serde(default)]
    pub vesting_frequency: VestingFrequency,
}

/// A restricted stock unit grant
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RsuGrant {
    pub id: String,
    pub name: String,
    pub total_quantity: u32,
    /// Vested shares; recomputed from the schedule when absent
    #[serde(default)]
    pub vested_quantity: Option<u32>,
    /// Shares already sold
    #[serde(default)]
    pub used_quantity: u32,
    /// Average price at vesting, USD. The RSU cost basis.
    #[schemars(with = "f64")]
    pub average_vesting_price: Decimal,
    #[serde(default)]
    pub first_vesting_date: Option<NaiveDate>,
    #[serde(default = "default_vesting_duration")]
    pub vesting_duration_years: u32,
    #[serde(default)]
    pub vesting_frequency: VestingFrequency,
}

fn default_vesting_duration() -> u32 {
    4
}

impl StockOptionGrant {
    /// Vested quantity as of the given date, or the stored value when no
    /// simulation date is supplied.
    pub fn vested_as_of(&self, as_of: Option<NaiveDate>) -> u32 {
        resolve_vested(
            self.total_quantity,
            self.vested_quantity,
            self.first_vesting_date,
            self.vesting_duration_years,
            self.vesting_frequency,
            as_of,
        )
    }
}

impl RsuGrant {
    /// Vested quantity as of the given date, or the stored value when no
    /// simulation date is supplied.
    pub fn vested_as_of(&self, as_of: Option<NaiveDate>) -> u32 {
        resolve_vested(
            self.total_quantity,
            self.vested_quantity,
            self.first_vesting_date,
            self.vesting_duration_years,
            self.vesting_frequency,
            as_of,
        )
    }
}

/// An explicit date overrides any stored vested quantity; otherwise the
/// stored value wins and the schedule is only consulted when it is absent.
fn resolve_vested(
    total: u32,
    stored: Option<u32>,
    first_vesting_date: Option<NaiveDate>,
    duration_years: u32,
    frequency: VestingFrequency,
    as_of: Option<NaiveDate>,
) -> u32 {
    match (as_of, stored) {
        (Some(date), _) => {
            vesting::vested_quantity(total, first_vesting_date, duration_years, frequency, date)
        }
        (None, Some(vested)) => vested,
        (None, None) => vesting::vested_quantity(
            total,
            first_vesting_date,
            duration_years,
            frequency,
            vesting::today(),
        ),
    }
}

/// Kind discriminant carried through results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum GrantKind {
    Option,
    Rsu,
}

impl GrantKind {
    pub fn display(&self) -> &'static str {
        match self {
            GrantKind::Option => "option",
            GrantKind::Rsu => "rsu",
        }
    }
}

impl std::fmt::Display for GrantKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Tagged union over the two grant kinds, for uniform listing.
///
/// Kind-specific fields (exercise price, vesting-time cost basis) stay on
/// the variants so they cannot be confused at the type level.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Grant {
    Option(StockOptionGrant),
    Rsu(RsuGrant),
}

impl Grant {
    pub fn kind(&self) -> GrantKind {
        match self {
            Grant::Option(_) => GrantKind::Option,
            Grant::Rsu(_) => GrantKind::Rsu,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Grant::Option(g) => &g.id,
            Grant::Rsu(g) => &g.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Grant::Option(g) => &g.name,
            Grant::Rsu(g) => &g.name,
        }
    }

    pub fn total_quantity(&self) -> u32 {
        match self {
            Grant::Option(g) => g.total_quantity,
            Grant::Rsu(g) => g.total_quantity,
        }
    }

    pub fn used_quantity(&self) -> u32 {
        match self {
            Grant::Option(g) => g.used_quantity,
            Grant::Rsu(g) => g.used_quantity,
        }
    }

    pub fn first_vesting_date(&self) -> Option<NaiveDate> {
        match self {
            Grant::Option(g) => g.first_vesting_date,
            Grant::Rsu(g) => g.first_vesting_date,
        }
    }

    pub fn vesting_duration_years(&self) -> u32 {
        match self {
            Grant::Option(g) => g.vesting_duration_years,
            Grant::Rsu(g) => g.vesting_duration_years,
        }
    }

    pub fn vesting_frequency(&self) -> VestingFrequency {
        match self {
            Grant::Option(g) => g.vesting_frequency,
            Grant::Rsu(g) => g.vesting_frequency,
        }
    }

    pub fn vested_as_of(&self, as_of: Option<NaiveDate>) -> u32 {
        match self {
            Grant::Option(g) => g.vested_as_of(as_of),
            Grant::Rsu(g) => g.vested_as_of(as_of),
        }
    }
}

/// The persisted input triple: personal info plus the two grant lists
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Portfolio {
    pub personal_info: PersonalInfo,
    #[serde(default)]
    pub options: Vec<StockOptionGrant>,
    #[serde(default)]
    pub rsus: Vec<RsuGrant>,
}

impl Portfolio {
    /// All grants in display order: options first, then RSUs
    pub fn grants(&self) -> Vec<Grant> {
        self.options
            .iter()
            .cloned()
            .map(Grant::Option)
            .chain(self.rsus.iter().cloned().map(Grant::Rsu))
            .collect()
    }
}

/// Read a portfolio from JSON
pub fn read_json<R: Read>(reader: R) -> anyhow::Result<Portfolio> {
    let portfolio: Portfolio = serde_json::from_reader(reader)?;
    Ok(portfolio)
}
