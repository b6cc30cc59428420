use crate::grants::{GrantKind, RsuGrant};
use crate::tax::il::TaxYear;
use crate::tax::levies::{bituah_leumi, capital_gains_tax, health_insurance};
use crate::tax::options::available_quantity;
use crate::tax::result::{PackageResult, TaxBreakdown};
use crate::tax::equity_income_tax;
use rust_decimal::Decimal;

/// Calculate the full tax breakdown for a single RSU grant in isolation.
///
/// RSUs are taxed twice: the value at vesting is work income at marginal
/// rates, and appreciation since vesting is capital gain. There is no route
/// detection. Grants with nothing available are excluded entirely, so this
/// returns `None` rather than a zeroed result.
pub fn calculate_rsu_result(
    rsu: &RsuGrant,
    vested_quantity: u32,
    stock_price: Decimal,
    exchange_rate: Decimal,
    annual_salary: Decimal,
    credit_points: Decimal,
    year: TaxYear,
) -> Option<PackageResult> {
    let available = available_quantity(vested_quantity, rsu.used_quantity);
    if available == 0 {
        log::debug!("rsu {} has no available shares, excluded", rsu.id);
        return None;
    }
    let quantity = Decimal::from(available);

    let gross_value_usd = stock_price * quantity;
    let gross_value_nis = gross_value_usd * exchange_rate;

    // Value at vesting is the work income cost basis
    let work_income_nis = rsu.average_vesting_price * quantity * exchange_rate;

    // Appreciation since vesting is capital gain, never negative
    let capital_gain_per_share = stock_price - rsu.average_vesting_price;
    let capital_gain_nis = (capital_gain_per_share * quantity * exchange_rate).max(Decimal::ZERO);

    let income = equity_income_tax(work_income_nis, annual_salary, credit_points, year);
    let social_security = bituah_leumi(work_income_nis, annual_salary, year);
    let health = health_insurance(work_income_nis, year);
    let cgt = capital_gains_tax(capital_gain_nis, None, year);

    let total_tax = income.income_tax + cgt.base_tax + social_security + health + cgt.surtax;
    let net_value_nis = gross_value_nis - total_tax;
    let net_value_usd = net_value_nis / exchange_rate;

    log::debug!(
        "rsu {}: gross={gross_value_nis} work={work_income_nis} gain={capital_gain_nis} \
         tax={total_tax}",
        rsu.id
    );

    Some(PackageResult {
        id: rsu.id.clone(),
        name: rsu.name.clone(),
        kind: GrantKind::Rsu,
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
        route: None,
        work_income_nis,
        capital_gain_nis,
        is_underwater: false,
    })
}
