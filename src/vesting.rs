//! Vesting schedule math.
//!
//! Periods are continuous day-fractions of a 365.25-day mean year rather
//! than calendar month boundaries, so a quarterly period is exactly
//! 91.3125 days regardless of leap years.

use crate::grants::VestingFrequency;
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

const DAYS_PER_YEAR: Decimal = dec!(365.25);

/// Today's date in the local timezone
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Number of shares vested as of `as_of`.
///
/// Returns 0 when the schedule has no start date, nothing was granted, the
/// duration is degenerate, or vesting has not started yet. Saturates at
/// `total_quantity` once the full duration has elapsed. Whole shares only,
/// rounded to nearest.
pub fn vested_quantity(
    total_quantity: u32,
    first_vesting_date: Option<NaiveDate>,
    duration_years: u32,
    frequency: VestingFrequency,
    as_of: NaiveDate,
) -> u32 {
    let Some(start) = first_vesting_date else {
        return 0;
    };
    if total_quantity == 0 || duration_years == 0 {
        return 0;
    }
    if start > as_of {
        return 0;
    }

    let elapsed_days = as_of.signed_duration_since(start).num_days();

    let periods_per_year = frequency.periods_per_year();
    let days_per_period = DAYS_PER_YEAR / Decimal::from(periods_per_year);
    let total_periods = Decimal::from(duration_years * periods_per_year);

    let completed = (Decimal::from(elapsed_days) / days_per_period)
        .floor()
        .min(total_periods);

    let vested = (Decimal::from(total_quantity) * completed / total_periods)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    log::debug!(
        "vesting: total={total_quantity} elapsed={elapsed_days}d \
         completed={completed}/{total_periods} periods -> {vested}"
    );

    vested.to_u32().unwrap_or(0)
}
