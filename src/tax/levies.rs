//! Social security, health insurance and capital gains calculators shared by
//! the option and RSU paths. All apply to NIS amounts.

use crate::tax::il::TaxYear;
use rust_decimal::Decimal;

/// Calculate the Bituah Leumi (social security) contribution on equity work
/// income.
///
/// The statutory ceiling applies to combined work income, so the salary
/// consumes its share of the ceiling first. If salary alone meets the
/// ceiling, equity work income owes nothing. Capital gains are never
/// subject to Bituah Leumi.
pub fn bituah_leumi(work_income: Decimal, annual_salary: Decimal, year: TaxYear) -> Decimal {
    if work_income <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let ceiling = year.bituah_leumi_ceiling();
    let used_by_salary = annual_salary.min(ceiling);
    let remaining_ceiling = (ceiling - used_by_salary).max(Decimal::ZERO);

    let taxable = work_income.min(remaining_ceiling);
    taxable * year.bituah_leumi_rate()
}

/// Calculate the health insurance contribution on equity work income.
///
/// Applies to all work income with no ceiling, never to capital gains.
pub fn health_insurance(work_income: Decimal, year: TaxYear) -> Decimal {
    if work_income <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    work_income * year.health_rate()
}

/// Capital gains tax split into base and surtax components
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapitalGainsTax {
    pub base_tax: Decimal,
    pub surtax: Decimal,
    pub total_tax: Decimal,
}

impl CapitalGainsTax {
    pub fn zero() -> Self {
        CapitalGainsTax {
            base_tax: Decimal::ZERO,
            surtax: Decimal::ZERO,
            total_tax: Decimal::ZERO,
        }
    }
}

/// Calculate capital gains tax on a single gain.
///
/// The surtax applies only to the slice of this gain that sits above the
/// annual threshold within `total_gains_for_surtax`, so callers blending
/// several grants' gains into one running total get the surtax attributed
/// correctly. When `None`, the gain is treated as its own total.
pub fn capital_gains_tax(
    gain: Decimal,
    total_gains_for_surtax: Option<Decimal>,
    year: TaxYear,
) -> CapitalGainsTax {
    if gain <= Decimal::ZERO {
        return CapitalGainsTax::zero();
    }

    let total_gains = total_gains_for_surtax.unwrap_or(gain);
    let base_tax = gain * year.cgt_base_rate();

    let threshold = year.cgt_surtax_threshold();
    let surtax = if total_gains > threshold {
        let above_threshold = (total_gains - threshold).min(gain).max(Decimal::ZERO);
        above_threshold * year.cgt_surtax_rate()
    } else {
        Decimal::ZERO
    };

    CapitalGainsTax {
        base_tax,
        surtax,
        total_tax: base_tax + surtax,
    }
}
