//! Portfolio-level aggregation.
//!
//! Per-grant raw value splits are computed first (they depend on each
//! grant's own prices), then taxed with a single portfolio marginal rate
//! and a flat effective capital gains rate. Social security, health and
//! the credit-point offset apply once, at the portfolio level, because
//! their ceilings and floors are defined over combined income. This is
//! deliberately coarser than the single-grant calculators in
//! `tax::options` / `tax::rsu`, which attribute credits precisely; the two
//! strategies coexist and are not to be unified.

use crate::grants::{GrantKind, PersonalInfo, RsuGrant, StockOptionGrant};
use crate::tax::il::TaxYear;
use crate::tax::income::{credit_points_value, marginal_rate};
use crate::tax::options::{available_quantity, detect_route, TaxRoute};
use crate::tax::result::{CalculationResult, PackageResult, TaxBreakdown, Totals};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Overrides for projecting a future valuation without touching stored
/// grants. When `as_of` is given, vested quantities are recomputed from
/// each schedule instead of using stored values; `stock_price` (and
/// `exchange_rate` when given) replace the live personal-info values in
/// the result snapshot.
#[derive(Debug, Clone, Copy)]
pub struct Simulation {
    pub as_of: Option<NaiveDate>,
    pub stock_price: Decimal,
    pub exchange_rate: Option<Decimal>,
}

/// Raw per-grant value split before any tax is applied
struct RawPackage {
    id: String,
    name: String,
    kind: GrantKind,
    gross_value_nis: Decimal,
    gross_value_usd: Decimal,
    work_income_nis: Decimal,
    capital_gain_nis: Decimal,
    route: Option<TaxRoute>,
    is_underwater: bool,
}

/// Run a full portfolio calculation.
///
/// Pure over its inputs: the same snapshot always produces the same
/// result, and nothing is cached or mutated between runs.
pub fn calculate(
    personal: &PersonalInfo,
    options: &[StockOptionGrant],
    rsus: &[RsuGrant],
    simulation: Option<&Simulation>,
) -> CalculationResult {
    let year = TaxYear::default();

    let stock_price = simulation.map_or(personal.stock_price, |s| s.stock_price);
    let exchange_rate = simulation
        .and_then(|s| s.exchange_rate)
        .unwrap_or(personal.exchange_rate);
    let as_of = simulation.and_then(|s| s.as_of);

    let snapshot = PersonalInfo {
        stock_price,
        exchange_rate,
        ..personal.clone()
    };
    let annual_salary = snapshot.annual_salary();
    let stock_price_nis = stock_price * exchange_rate;

    // Step 1: raw value split per grant, options first then RSUs
    let mut packages: Vec<RawPackage> = Vec::new();
    let mut total_work_income = Decimal::ZERO;

    for option in options {
        let vested = option.vested_as_of(as_of);
        let available = Decimal::from(available_quantity(vested, option.used_quantity));
        let route = detect_route(option.exercise_price, option.average_price);

        let exercise_nis = option.exercise_price * exchange_rate;
        let average_nis = option.average_price * exchange_rate;
        let gross_profit_per_share = stock_price_nis - exercise_nis;

        if gross_profit_per_share <= Decimal::ZERO {
            // Underwater grants stay in the output with zero values so the
            // caller can still show them
            packages.push(RawPackage {
                id: option.id.clone(),
                name: option.name.clone(),
                kind: GrantKind::Option,
                gross_value_nis: Decimal::ZERO,
                gross_value_usd: Decimal::ZERO,
                work_income_nis: Decimal::ZERO,
                capital_gain_nis: Decimal::ZERO,
                route: Some(route),
                is_underwater: true,
            });
            continue;
        }

        let gross_value_nis = gross_profit_per_share * available;
        let gross_value_usd = gross_value_nis / exchange_rate;

        let (work_income_nis, capital_gain_nis) = match route {
            TaxRoute::CapitalGain => (Decimal::ZERO, gross_value_nis),
            TaxRoute::OrdinaryIncome => {
                let work = (average_nis - exercise_nis) * available;
                let gain = ((stock_price_nis - average_nis) * available).max(Decimal::ZERO);
                total_work_income += work;
                (work, gain)
            }
        };

        packages.push(RawPackage {
            id: option.id.clone(),
            name: option.name.clone(),
            kind: GrantKind::Option,
            gross_value_nis,
            gross_value_usd,
            work_income_nis,
            capital_gain_nis,
            route: Some(route),
            is_underwater: false,
        });
    }

    for rsu in rsus {
        let vested = rsu.vested_as_of(as_of);
        let available = available_quantity(vested, rsu.used_quantity);
        if available == 0 {
            continue;
        }
        let available = Decimal::from(available);

        let vesting_price_nis = rsu.average_vesting_price * exchange_rate;
        let gross_value_nis = stock_price_nis * available;
        let gross_value_usd = gross_value_nis / exchange_rate;

        let work_income_nis = vesting_price_nis * available;
        total_work_income += work_income_nis;
        let capital_gain_nis =
            ((stock_price_nis - vesting_price_nis) * available).max(Decimal::ZERO);

        packages.push(RawPackage {
            id: rsu.id.clone(),
            name: rsu.name.clone(),
            kind: GrantKind::Rsu,
            gross_value_nis,
            gross_value_usd,
            work_income_nis,
            capital_gain_nis,
            route: None,
            is_underwater: false,
        });
    }

    // Step 2: one marginal rate for all work income, taken at the midpoint
    // of the equity slice to approximate the blended bracket
    let midpoint_income = annual_salary + total_work_income / dec!(2);
    let portfolio_rate = marginal_rate(midpoint_income, year);

    log::debug!(
        "portfolio: {} packages, work income={total_work_income}, marginal rate={portfolio_rate}",
        packages.len()
    );

    // Step 3: per-grant tax at the shared rates
    let effective_cgt = year.cgt_effective_rate();
    let mut total_income_tax = Decimal::ZERO;
    let mut total_cgt = Decimal::ZERO;
    let mut total_gross_nis = Decimal::ZERO;
    let mut total_gross_usd = Decimal::ZERO;

    let packages: Vec<PackageResult> = packages
        .into_iter()
        .map(|pkg| {
            let income_tax = pkg.work_income_nis * portfolio_rate;
            // Surtax is folded into the flat 30% here, unlike the
            // single-grant calculators
            let capital_gains_tax = pkg.capital_gain_nis * effective_cgt;
            let total_tax = income_tax + capital_gains_tax;
            let net_value_nis = pkg.gross_value_nis - total_tax;
            let net_value_usd = net_value_nis / exchange_rate;

            total_income_tax += income_tax;
            total_cgt += capital_gains_tax;
            total_gross_nis += pkg.gross_value_nis;
            total_gross_usd += pkg.gross_value_usd;

            PackageResult {
                id: pkg.id,
                name: pkg.name,
                kind: pkg.kind,
                gross_value_usd: pkg.gross_value_usd,
                gross_value_nis: pkg.gross_value_nis,
                tax: TaxBreakdown {
                    income_tax,
                    capital_gains_tax,
                    // Levies and credits apply once at the total level
                    bituah_leumi: Decimal::ZERO,
                    health_insurance: Decimal::ZERO,
                    credit_points_reduction: Decimal::ZERO,
                    surtax: Decimal::ZERO,
                    total_tax,
                },
                net_value_usd,
                net_value_nis,
                route: pkg.route,
                work_income_nis: pkg.work_income_nis,
                capital_gain_nis: pkg.capital_gain_nis,
                is_underwater: pkg.is_underwater,
            }
        })
        .collect();

    // Step 4: levies on combined work income
    let ceiling = year.bituah_leumi_ceiling();
    let total_bituah_leumi = total_work_income.min(ceiling) * year.bituah_leumi_rate();
    let total_health = total_work_income * year.health_rate();

    // Step 5: single credit-point offset against the combined liability
    let tax_before_credits =
        total_income_tax + total_cgt + total_bituah_leumi + total_health;
    let credit_value = credit_points_value(snapshot.credit_points, year);
    let credit_points_reduction = credit_value.min(tax_before_credits);
    let total_tax = tax_before_credits - credit_points_reduction;

    let total_net_nis = total_gross_nis - total_tax;
    let total_net_usd = total_net_nis / exchange_rate;

    let effective_tax_rate = if total_gross_nis > Decimal::ZERO {
        total_tax / total_gross_nis * dec!(100)
    } else {
        Decimal::ZERO
    };

    CalculationResult {
        personal_info: snapshot,
        annual_salary,
        marginal_tax_rate: portfolio_rate * dec!(100),
        packages,
        totals: Totals {
            gross_value_usd: total_gross_usd,
            gross_value_nis: total_gross_nis,
            tax: TaxBreakdown {
                income_tax: total_income_tax,
                capital_gains_tax: total_cgt,
                bituah_leumi: total_bituah_leumi,
                health_insurance: total_health,
                credit_points_reduction,
                // Folded into the 30% capital gains rate
                surtax: Decimal::ZERO,
                total_tax,
            },
            net_value_usd: total_net_usd,
            net_value_nis: total_net_nis,
            effective_tax_rate,
        },
    }
}
