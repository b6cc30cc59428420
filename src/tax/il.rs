use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// A single progressive income tax bracket.
///
/// Brackets are ordered by ascending floor, non-overlapping and gapless.
/// The last bracket has no ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxBracket {
    pub floor: Decimal,
    pub ceiling: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxBracket {
    /// Width of the bracket, `None` for the open-ended top bracket.
    pub fn size(&self) -> Option<Decimal> {
        self.ceiling.map(|c| c - self.floor)
    }

    /// Whether the given annual income falls within this bracket.
    pub fn contains(&self, annual_income: Decimal) -> bool {
        match self.ceiling {
            Some(ceiling) => annual_income <= ceiling,
            None => true,
        }
    }
}

/// Israeli tax year (calendar year)
///
/// All figures are the 2025 tables. Earlier years are approximated with the
/// same values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaxYear(pub i32);

impl TaxYear {
    /// Create a tax year from a date
    pub fn from_date(date: NaiveDate) -> Self {
        TaxYear(date.year())
    }

    /// Income tax brackets for this tax year (annual income, NIS)
    pub fn brackets(&self) -> Vec<TaxBracket> {
        vec![
            bracket(dec!(0), Some(dec!(83_880)), dec!(0.10)),
            bracket(dec!(83_880), Some(dec!(120_720)), dec!(0.14)),
            bracket(dec!(120_720), Some(dec!(193_800)), dec!(0.20)),
            bracket(dec!(193_800), Some(dec!(269_280)), dec!(0.31)),
            bracket(dec!(269_280), Some(dec!(560_280)), dec!(0.35)),
            bracket(dec!(560_280), Some(dec!(721_560)), dec!(0.47)),
            bracket(dec!(721_560), None, dec!(0.50)),
        ]
    }

    /// Annual value of a single credit point (Nekudot Zikuy), NIS
    pub fn credit_point_value(&self) -> Decimal {
        dec!(2_784)
    }

    /// Bituah Leumi (social security) employee rate on work income
    pub fn bituah_leumi_rate(&self) -> Decimal {
        dec!(0.07)
    }

    /// Health insurance rate on work income (no ceiling)
    pub fn health_rate(&self) -> Decimal {
        dec!(0.05)
    }

    /// Annual income ceiling for Bituah Leumi contributions, NIS
    pub fn bituah_leumi_ceiling(&self) -> Decimal {
        dec!(560_280)
    }

    /// Base capital gains tax rate
    pub fn cgt_base_rate(&self) -> Decimal {
        dec!(0.25)
    }

    /// Surtax rate added on capital gains above the threshold
    pub fn cgt_surtax_rate(&self) -> Decimal {
        dec!(0.05)
    }

    /// Annual threshold above which the capital gains surtax applies, NIS
    pub fn cgt_surtax_threshold(&self) -> Decimal {
        dec!(721_560)
    }

    /// Combined capital gains rate (base + surtax) used at the portfolio level
    pub fn cgt_effective_rate(&self) -> Decimal {
        dec!(0.30)
    }
}

impl std::fmt::Display for TaxYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for TaxYear {
    fn default() -> Self {
        TaxYear(2025)
    }
}

fn bracket(floor: Decimal, ceiling: Option<Decimal>, rate: Decimal) -> TaxBracket {
    TaxBracket {
        floor,
        ceiling,
        rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tax_year_from_date() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        assert_eq!(TaxYear::from_date(date), TaxYear(2025));
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(TaxYear::from_date(date), TaxYear(2024));
    }

    #[test]
    fn brackets_are_gapless_and_ascending() {
        let brackets = TaxYear::default().brackets();
        assert_eq!(brackets.len(), 7);

        for pair in brackets.windows(2) {
            // Each bracket starts where the previous one ends
            assert_eq!(pair[0].ceiling, Some(pair[1].floor));
            assert!(pair[0].rate < pair[1].rate);
        }

        assert_eq!(brackets[0].floor, dec!(0));
        assert_eq!(brackets[0].rate, dec!(0.10));
        assert_eq!(brackets.last().unwrap().ceiling, None);
        assert_eq!(brackets.last().unwrap().rate, dec!(0.50));
    }

    #[test]
    fn top_bracket_contains_everything() {
        let brackets = TaxYear::default().brackets();
        let top = brackets.last().unwrap();
        assert!(top.contains(dec!(10_000_000)));
        assert_eq!(top.size(), None);
    }

    #[test]
    fn levy_rates() {
        let year = TaxYear(2025);
        assert_eq!(year.bituah_leumi_rate(), dec!(0.07));
        assert_eq!(year.health_rate(), dec!(0.05));
        assert_eq!(year.bituah_leumi_ceiling(), dec!(560_280));
    }

    #[test]
    fn capital_gains_rates() {
        let year = TaxYear(2025);
        assert_eq!(year.cgt_base_rate(), dec!(0.25));
        assert_eq!(year.cgt_surtax_rate(), dec!(0.05));
        assert_eq!(year.cgt_surtax_threshold(), dec!(721_560));
        assert_eq!(
            year.cgt_effective_rate(),
            year.cgt_base_rate() + year.cgt_surtax_rate()
        );
    }

    #[test]
    fn credit_point_value() {
        assert_eq!(TaxYear(2025).credit_point_value(), dec!(2784));
    }
}
