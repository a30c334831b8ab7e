use crate::ParseEnumError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Number of days after a booking ends during which excesses may still be filed
pub const EXCESS_WINDOW_DAYS: i64 = 60;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// How the rental cost written to the ledger at booking time is computed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChargePolicy {
    /// One daily rate, regardless of the rental length
    #[default]
    DailyRate,
    /// Daily rate multiplied by the number of rental days
    FullTerm,
}

impl ChargePolicy {
    /// `None` when the full-term product overflows
    pub fn charge(&self, daily_rate: Decimal, rental_days: i32) -> Option<Decimal> {
        match self {
            Self::DailyRate => Some(daily_rate),
            Self::FullTerm => daily_rate.checked_mul(Decimal::from(rental_days)),
        }
    }
}

impl FromStr for ChargePolicy {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily-rate" => Ok(Self::DailyRate),
            "full-term" => Ok(Self::FullTerm),
            _ => Err(ParseEnumError::new("charge policy", s)),
        }
    }
}

/// Whole days between two instants, rounded up
pub fn days_between(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let seconds = (end - start).num_seconds().abs();
    (seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY
}

/// An excess can only be filed once the booking has ended, and for at most
/// [`EXCESS_WINDOW_DAYS`] afterwards
pub fn can_add_excess(booking_end: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    booking_end < now && days_between(booking_end, now) <= EXCESS_WINDOW_DAYS
}
