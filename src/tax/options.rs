use crate::grants::{GrantKind, StockOptionGrant};
use crate::tax::il::TaxYear;
use crate::tax::levies::{bituah_leumi, capital_gains_tax, health_insurance};
use crate::tax::result::{PackageResult, TaxBreakdown};
use crate::tax::{equity_income_tax, EquityIncomeTax};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Article 102 tax route for a stock option grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxRoute {
    /// Route A: entire profit taxed as capital gain
    CapitalGain,
    /// Route B: split between work income and capital gain
    OrdinaryIncome,
}

impl TaxRoute {
    pub fn display(&self) -> &'static str {
        match self {
            TaxRoute::CapitalGain => "capital gain",
            TaxRoute::OrdinaryIncome => "ordinary income",
        }
    }
}

impl std::fmt::Display for TaxRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Classify a stock option grant by exercise price vs. the 30-day average
/// price at grant. Options granted at or above the average ("in the money"
/// relative to baseline) are pure capital gain; discounted grants are split.
pub fn detect_route(exercise_price: Decimal, average_price: Decimal) -> TaxRoute {
    if exercise_price >= average_price {
        TaxRoute::CapitalGain
    } else {
        TaxRoute::OrdinaryIncome
    }
}

/// Shares remaining out of a holding after those already exercised or sold
pub fn available_quantity(quantity: u32, used_quantity: u32) -> u32 {
    quantity.saturating_sub(used_quantity)
}

/// Calculate the full tax breakdown for a single stock option grant in
/// isolation, using the precise credit-point attribution.
///
/// The isolated report values the whole grant: quantity is
/// `total_quantity - used_quantity`, unvested shares included. The
/// aggregator counts only vested shares; the two views are intentionally
/// different.
///
/// Underwater grants (current price at or below exercise price) come back
/// with every monetary field zeroed and the route still reported, so the
/// grant can be labeled without affecting totals.
pub fn calculate_option_result(
    option: &StockOptionGrant,
    stock_price: Decimal,
    exchange_rate: Decimal,
    annual_salary: Decimal,
    credit_points: Decimal,
    year: TaxYear,
) -> PackageResult {
    let route = detect_route(option.exercise_price, option.average_price);
    let quantity = Decimal::from(available_quantity(
        option.total_quantity,
        option.used_quantity,
    ));

    let gross_profit_per_share = stock_price - option.exercise_price;
    if gross_profit_per_share <= Decimal::ZERO {
        log::debug!(
            "option {} underwater: price={stock_price} exercise={}",
            option.id,
            option.exercise_price
        );
        return underwater_result(option, route);
    }

    let gross_value_usd = gross_profit_per_share * quantity;
    let gross_value_nis = gross_value_usd * exchange_rate;

    let mut work_income_nis = Decimal::ZERO;
    let mut capital_gain_nis = Decimal::ZERO;
    let mut income = EquityIncomeTax::zero();
    let mut social_security = Decimal::ZERO;
    let mut health = Decimal::ZERO;

    match route {
        TaxRoute::CapitalGain => {
            // Route A: the whole profit is capital gain
            capital_gain_nis = gross_value_nis;
        }
        TaxRoute::OrdinaryIncome => {
            // Route B: the grant-date discount is work income, appreciation
            // beyond the average price is capital gain
            let work_income_per_share = option.average_price - option.exercise_price;
            work_income_nis = work_income_per_share * quantity * exchange_rate;

            let capital_gain_per_share = stock_price - option.average_price;
            capital_gain_nis =
                (capital_gain_per_share * quantity * exchange_rate).max(Decimal::ZERO);

            income = equity_income_tax(work_income_nis, annual_salary, credit_points, year);
            social_security = bituah_leumi(work_income_nis, annual_salary, year);
            health = health_insurance(work_income_nis, year);
        }
    }

    // Credit points never reduce capital gains tax
    let cgt = capital_gains_tax(capital_gain_nis, None, year);

    let total_tax =
        income.income_tax + cgt.base_tax + social_security + health + cgt.surtax;
    let net_value_nis = gross_value_nis - total_tax;
    let net_value_usd = net_value_nis / exchange_rate;

    log::debug!(
        "option {} route={route}: gross={gross_value_nis} work={work_income_nis} \
         gain={capital_gain_nis} tax={total_tax}",
        option.id
    );

    PackageResult {
        id: option.id.clone(),
        name: option.name.clone(),
        kind: GrantKind::Option,
        gross_value_usd: gross_value_usd.max(Decimal::ZERO),
        gross_value_nis: gross_value_nis.max(Decimal::ZERO),
        tax: TaxBreakdown {
            income_tax: income.income_tax,
            capital_gains_tax: cgt.base_tax,
            bituah_leumi: social_security,
            health_insurance: health,
            credit_points_reduction: income.credit_points_reduction,
            surtax: cgt.surtax,
            total_tax,
        },
        net_value_usd: net_value_usd.max(Decimal::ZERO),
        net_value_nis: net_value_nis.max(Decimal::ZERO),
        route: Some(route),
        work_income_nis,
        capital_gain_nis,
        is_underwater: false,
    }
}

fn underwater_result(option: &StockOptionGrant, route: TaxRoute) -> PackageResult {
    PackageResult {
        id: option.id.clone(),
        name: option.name.clone(),
        kind: GrantKind::Option,
        gross_value_usd: Decimal::ZERO,
        gross_value_nis: Decimal::ZERO,
        tax: TaxBreakdown::zero(),
        net_value_usd: Decimal::ZERO,
        net_value_nis: Decimal::ZERO,
        route: Some(route),
        work_income_nis: Decimal::ZERO,
        capital_gain_nis: Decimal::ZERO,
        is_underwater: true,
    }
}
