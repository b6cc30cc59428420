use crate::tax::il::TaxYear;
use rust_decimal::Decimal;

/// Calculate progressive income tax on annual income (NIS).
///
/// Walks the bracket table in order, taxing the slice of income that falls
/// within each bracket at that bracket's rate.
pub fn progressive_tax(annual_income: Decimal, year: TaxYear) -> Decimal {
    if annual_income <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let mut tax = Decimal::ZERO;
    let mut remaining = annual_income;

    for bracket in year.brackets() {
        let taxable = match bracket.size() {
            Some(size) => remaining.min(size),
            // Top bracket takes whatever is left
            None => remaining,
        };
        if taxable <= Decimal::ZERO {
            break;
        }
        tax += taxable * bracket.rate;
        remaining -= taxable;
    }

    tax
}

/// Marginal tax rate for the given annual income.
///
/// Returns the rate of the bracket containing the income. Income at or below
/// zero is clamped to the first bracket.
pub fn marginal_rate(annual_income: Decimal, year: TaxYear) -> Decimal {
    let brackets = year.brackets();
    if annual_income <= Decimal::ZERO {
        return brackets[0].rate;
    }

    brackets
        .iter()
        .find(|b| b.contains(annual_income))
        .map(|b| b.rate)
        // The last bracket has no ceiling, so find always matches
        .unwrap_or_else(|| brackets.last().map(|b| b.rate).unwrap_or(Decimal::ZERO))
}

/// Annual NIS value of the given credit points (Nekudot Zikuy)
pub fn credit_points_value(credit_points: Decimal, year: TaxYear) -> Decimal {
    credit_points * year.credit_point_value()
}

/// Income tax attributed to the equity slice of total income
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EquityIncomeTax {
    /// Post-credit tax owed on the equity work income
    pub income_tax: Decimal,
    /// Portion of the credit value absorbed by the equity slice (display only)
    pub credit_points_reduction: Decimal,
}

impl EquityIncomeTax {
    pub fn zero() -> Self {
        EquityIncomeTax {
            income_tax: Decimal::ZERO,
            credit_points_reduction: Decimal::ZERO,
        }
    }
}

/// Calculate income tax on equity work income, accounting for credit points.
///
/// Credit points reduce the TOTAL tax liability (salary + equity work
/// income), not the equity tax in isolation. The tax attributed to the
/// equity slice is the difference between the post-credit tax on the
/// combined income and the post-credit tax on salary alone. If salary alone
/// already consumes the full credit, the equity slice gets no reduction.
pub fn equity_income_tax(
    work_income: Decimal,
    annual_salary: Decimal,
    credit_points: Decimal,
    year: TaxYear,
) -> EquityIncomeTax {
    if work_income <= Decimal::ZERO {
        return EquityIncomeTax::zero();
    }

    let credit_value = credit_points_value(credit_points, year);

    let tax_on_salary = progressive_tax(annual_salary, year);
    let tax_on_combined = progressive_tax(annual_salary + work_income, year);

    let tax_on_salary_after = (tax_on_salary - credit_value).max(Decimal::ZERO);
    let tax_on_combined_after = (tax_on_combined - credit_value).max(Decimal::ZERO);

    let income_tax = (tax_on_combined_after - tax_on_salary_after).max(Decimal::ZERO);

    // Credit absorbed by the equity slice: the pre-credit equity tax less
    // what remains owed after credits
    let pre_credit_equity_tax = tax_on_combined - tax_on_salary;
    let credit_points_reduction = (pre_credit_equity_tax - income_tax).max(Decimal::ZERO);

    log::debug!(
        "equity income tax: work={work_income} salary={annual_salary} \
         pre_credit={pre_credit_equity_tax} tax={income_tax} credit_used={credit_points_reduction}"
    );

    EquityIncomeTax {
        income_tax,
        credit_points_reduction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const YEAR: TaxYear = TaxYear(2025);

    #[test]
    fn progressive_tax_zero_and_negative() {
        assert_eq!(progressive_tax(dec!(0), YEAR), dec!(0));
        assert_eq!(progressive_tax(dec!(-5000), YEAR), dec!(0));
    }

    #[test]
    fn progressive_tax_within_first_bracket() {
        // Entirely inside the 10% bracket
        assert_eq!(progressive_tax(dec!(50_000), YEAR), dec!(5_000));
        assert_eq!(progressive_tax(dec!(83_880), YEAR), dec!(8_388));
    }

    #[test]
    fn progressive_tax_spanning_two_brackets() {
        // 83,880 @ 10% + 16,120 @ 14%
        let expected = dec!(83_880) * dec!(0.10) + dec!(16_120) * dec!(0.14);
        assert_eq!(progressive_tax(dec!(100_000), YEAR), expected);
        assert_eq!(progressive_tax(dec!(100_000), YEAR), dec!(10_644.80));
    }

    #[test]
    fn progressive_tax_top_bracket() {
        // Everything above 721,560 is taxed at 50%
        let at_threshold = progressive_tax(dec!(721_560), YEAR);
        let above = progressive_tax(dec!(821_560), YEAR);
        assert_eq!(above - at_threshold, dec!(50_000));
    }

    #[test]
    fn progressive_tax_is_non_decreasing() {
        let mut last = Decimal::ZERO;
        for income in (0..1_000_000).step_by(50_000) {
            let tax = progressive_tax(Decimal::from(income), YEAR);
            assert!(tax >= last, "tax decreased at income {income}");
            last = tax;
        }
    }

    #[test]
    fn progressive_tax_is_continuous_at_bracket_edges() {
        for bracket in YEAR.brackets() {
            let Some(ceiling) = bracket.ceiling else {
                continue;
            };
            let below = progressive_tax(ceiling, YEAR);
            let above = progressive_tax(ceiling + dec!(1), YEAR);
            // One extra NIS is taxed at the next bracket's rate, nothing more
            assert!(above - below <= dec!(0.50));
        }
    }

    #[test]
    fn marginal_rate_matches_bracket() {
        assert_eq!(marginal_rate(dec!(0), YEAR), dec!(0.10));
        assert_eq!(marginal_rate(dec!(-1), YEAR), dec!(0.10));
        assert_eq!(marginal_rate(dec!(50_000), YEAR), dec!(0.10));
        assert_eq!(marginal_rate(dec!(83_880), YEAR), dec!(0.10));
        assert_eq!(marginal_rate(dec!(83_881), YEAR), dec!(0.14));
        assert_eq!(marginal_rate(dec!(300_000), YEAR), dec!(0.35));
        assert_eq!(marginal_rate(dec!(721_561), YEAR), dec!(0.50));
        assert_eq!(marginal_rate(dec!(99_999_999), YEAR), dec!(0.50));
    }

    #[test]
    fn marginal_rate_is_non_decreasing() {
        let mut last = Decimal::ZERO;
        for income in (0..1_200_000).step_by(10_000) {
            let rate = marginal_rate(Decimal::from(income), YEAR);
            assert!(rate >= last);
            last = rate;
        }
    }

    #[test]
    fn credit_points_value_scales_linearly() {
        assert_eq!(credit_points_value(dec!(0), YEAR), dec!(0));
        assert_eq!(credit_points_value(dec!(1), YEAR), dec!(2_784));
        assert_eq!(credit_points_value(dec!(2.25), YEAR), dec!(6_264));
    }

    #[test]
    fn equity_tax_zero_work_income() {
        let result = equity_income_tax(dec!(0), dec!(200_000), dec!(2.25), YEAR);
        assert_eq!(result, EquityIncomeTax::zero());
        let result = equity_income_tax(dec!(-100), dec!(200_000), dec!(2.25), YEAR);
        assert_eq!(result, EquityIncomeTax::zero());
    }

    #[test]
    fn equity_tax_no_credit_points() {
        // Without credits the equity tax is the plain marginal difference
        let result = equity_income_tax(dec!(50_000), dec!(300_000), dec!(0), YEAR);
        let expected =
            progressive_tax(dec!(350_000), YEAR) - progressive_tax(dec!(300_000), YEAR);
        assert_eq!(result.income_tax, expected);
        assert_eq!(result.credit_points_reduction, dec!(0));
    }

    #[test]
    fn salary_consumes_entire_credit() {
        // High salary: the credit is exhausted by salary tax on both sides
        // of the difference, so the equity slice sees no reduction
        let result = equity_income_tax(dec!(100_000), dec!(500_000), dec!(2.25), YEAR);
        let pre_credit =
            progressive_tax(dec!(600_000), YEAR) - progressive_tax(dec!(500_000), YEAR);
        assert_eq!(result.income_tax, pre_credit);
        assert_eq!(result.credit_points_reduction, dec!(0));
    }

    #[test]
    fn zero_salary_credit_absorbed_by_equity() {
        // No salary: the whole credit offsets the equity tax
        let result = equity_income_tax(dec!(30_000), dec!(0), dec!(1), YEAR);
        let pre_credit = progressive_tax(dec!(30_000), YEAR);
        let expected = (pre_credit - dec!(2_784)).max(Decimal::ZERO);
        assert_eq!(result.income_tax, expected);
        assert_eq!(result.credit_points_reduction, pre_credit - expected);
    }

    #[test]
    fn credit_floors_tax_at_zero() {
        // Credit larger than the whole liability never produces negative tax
        let result = equity_income_tax(dec!(5_000), dec!(0), dec!(20), YEAR);
        assert_eq!(result.income_tax, dec!(0));
        assert_eq!(result.credit_points_reduction, dec!(500));
    }

    #[test]
    fn more_credit_points_never_increase_tax() {
        let mut last = Decimal::MAX;
        for points in 0..=20 {
            let result =
                equity_income_tax(dec!(80_000), dec!(120_000), Decimal::from(points), YEAR);
            assert!(result.income_tax <= last);
            last = result.income_tax;
        }
    }
}
