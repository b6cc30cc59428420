//! Result value types shared by the per-grant calculators and the
//! portfolio aggregator. All monetary fields are NIS unless the name says
//! otherwise, and none are mutated once a calculation has produced them.

use crate::grants::{GrantKind, PersonalInfo};
use crate::tax::options::TaxRoute;
use rust_decimal::Decimal;
use serde::Serialize;

/// Per-grant (and portfolio-total) tax breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaxBreakdown {
    pub income_tax: Decimal,
    pub capital_gains_tax: Decimal,
    pub bituah_leumi: Decimal,
    pub health_insurance: Decimal,
    pub credit_points_reduction: Decimal,
    pub surtax: Decimal,
    pub total_tax: Decimal,
}

impl TaxBreakdown {
    pub fn zero() -> Self {
        TaxBreakdown {
            income_tax: Decimal::ZERO,
            capital_gains_tax: Decimal::ZERO,
            bituah_leumi: Decimal::ZERO,
            health_insurance: Decimal::ZERO,
            credit_points_reduction: Decimal::ZERO,
            surtax: Decimal::ZERO,
            total_tax: Decimal::ZERO,
        }
    }
}

/// Outcome for a single grant
#[derive(Debug, Clone, Serialize)]
pub struct PackageResult {
    pub id: String,
    pub name: String,
    pub kind: GrantKind,
    pub gross_value_usd: Decimal,
    pub gross_value_nis: Decimal,
    pub tax: TaxBreakdown,
    pub net_value_usd: Decimal,
    pub net_value_nis: Decimal,
    /// Article 102 route, options only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<TaxRoute>,
    pub work_income_nis: Decimal,
    pub capital_gain_nis: Decimal,
    /// Options only: exercise price at or above the current price.
    /// Omitted from JSON unless set, since it never applies to RSUs.
    #[serde(skip_serializing_if = "is_false")]
    pub is_underwater: bool,
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

/// Portfolio-level totals
#[derive(Debug, Clone, Serialize)]
pub struct Totals {
    pub gross_value_usd: Decimal,
    pub gross_value_nis: Decimal,
    pub tax: TaxBreakdown,
    pub net_value_usd: Decimal,
    pub net_value_nis: Decimal,
    /// Total tax as a percentage of gross value, 0 when gross is 0
    pub effective_tax_rate: Decimal,
}

/// A full calculation run: the inputs it saw and everything it derived.
///
/// Created fresh on every invocation; any input change requires a new run.
#[derive(Debug, Clone, Serialize)]
pub struct CalculationResult {
    /// Snapshot of the inputs used, with any simulation overrides applied
    pub personal_info: PersonalInfo,
    pub annual_salary: Decimal,
    /// Portfolio marginal income tax rate, percent
    pub marginal_tax_rate: Decimal,
    /// One entry per grant, in input order (options first, then RSUs)
    pub packages: Vec<PackageResult>,
    pub totals: Totals,
}
