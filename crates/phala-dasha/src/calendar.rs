//! Calendar arithmetic on period boundaries.

use chrono::{Days, Months, NaiveDate};

use crate::{Error, Result};

/// Mean Gregorian year, used only where a fractional number of years has to
/// become a day count.
pub const MEAN_YEAR_DAYS: f64 = 365.2425;

/// Slack applied before rounding up, so that a value a hair above a whole
/// number through float drift does not gain an extra day.
const CEIL_EPSILON: f64 = 1e-9;

/// Round a non-negative day count up to whole days.
pub fn ceil_days(days: f64) -> u64 {
  let rounded = (days - CEIL_EPSILON).ceil();
  if rounded <= 0.0 { 0 } else { rounded as u64 }
}

/// `date` plus a fractional number of days, rounded up to the next whole date.
pub fn add_days_ceil(date: NaiveDate, days: f64) -> Result<NaiveDate> {
  date
    .checked_add_days(Days::new(ceil_days(days)))
    .ok_or(Error::DateOutOfRange { from: date })
}

/// `date` plus whole calendar years: same month and day, clamped to the last
/// day of the month when that day does not exist (29 February).
pub fn add_years(date: NaiveDate, years: u32) -> Result<NaiveDate> {
  date
    .checked_add_months(Months::new(years.saturating_mul(12)))
    .ok_or(Error::DateOutOfRange { from: date })
}

/// Fractional years to days on the mean-year basis.
pub fn years_to_days(years: f64) -> f64 { years * MEAN_YEAR_DAYS }

#[cfg(test)]
mod tests {
  use super::*;

  fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
  }

  #[test]
  fn leap_day_clamps_to_end_of_february() {
    assert_eq!(add_years(d(2000, 2, 29), 1).unwrap(), d(2001, 2, 28));
    assert_eq!(add_years(d(2000, 2, 29), 4).unwrap(), d(2004, 2, 29));
    assert_eq!(add_years(d(1990, 7, 14), 20).unwrap(), d(2010, 7, 14));
  }

  #[test]
  fn fractional_days_round_up() {
    assert_eq!(add_days_ceil(d(2020, 1, 1), 0.1).unwrap(), d(2020, 1, 2));
    assert_eq!(add_days_ceil(d(2020, 1, 1), 1.0).unwrap(), d(2020, 1, 2));
    assert_eq!(add_days_ceil(d(2020, 1, 1), 0.0).unwrap(), d(2020, 1, 1));
    // Drift just above a whole number does not add a day.
    assert_eq!(
      add_days_ceil(d(2020, 1, 1), 10.000_000_000_01).unwrap(),
      d(2020, 1, 11)
    );
  }

  #[test]
  fn overflow_is_an_error() {
    assert!(matches!(
      add_years(NaiveDate::MAX, 1),
      Err(Error::DateOutOfRange { .. })
    ));
    assert!(add_days_ceil(NaiveDate::MAX, 3.0).is_err());
  }
}
