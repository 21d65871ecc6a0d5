//! Birth balance and the Mahadasha sequence.

use chrono::{DateTime, NaiveDate, Utc};
use phala_core::{
  dasha::{DASHA_ROTATION, dasha_years, rotation_index},
  nakshatra::{ALL_NAKSHATRAS, NAKSHATRA_SPAN, Nakshatra},
  planet::Planet,
};
use tracing::trace;

use crate::{
  DashaPeriod, Error, MahadashaNode, Result, calendar, generate_sub_periods,
};

/// Positions this close below a nakshatra boundary count as on it.
const BOUNDARY_EPSILON: f64 = 1e-9;

// ─── Birth balance ───────────────────────────────────────────────────────────

/// Where the Moon sits in its nakshatra at birth, and how much of the first
/// ruler's period is left to run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BirthBalance {
  pub nakshatra:          Nakshatra,
  pub ruler:              Planet,
  /// Fraction of the nakshatra already traversed, in `[0, 1)`.
  pub traversed_fraction: f64,
  /// `1 - traversed_fraction`; never zero.
  pub balance_fraction:   f64,
}

impl BirthBalance {
  /// Length of the first (shortened) Mahadasha in fractional years.
  pub fn balance_years(&self) -> f64 {
    self.balance_fraction * f64::from(dasha_years(self.ruler))
  }
}

/// Compute the birth balance for a sidereal lunar longitude in degrees. Any
/// finite value is accepted and normalised into `[0, 360)`.
pub fn birth_balance(longitude: f64) -> Result<BirthBalance> {
  if !longitude.is_finite() {
    return Err(Error::NonFiniteLongitude(longitude));
  }

  let position = longitude.rem_euclid(360.0) / NAKSHATRA_SPAN;
  let mut whole = position.floor();
  let mut traversed = position - whole;
  if 1.0 - traversed < BOUNDARY_EPSILON {
    whole += 1.0;
    traversed = 0.0;
  }
  let nakshatra = ALL_NAKSHATRAS[(whole as usize) % ALL_NAKSHATRAS.len()];

  Ok(BirthBalance {
    nakshatra,
    ruler: nakshatra.lord(),
    traversed_fraction: traversed,
    balance_fraction: 1.0 - traversed,
  })
}

// ─── Mahadasha stream ────────────────────────────────────────────────────────

/// Unbounded, gapless sequence of Mahadashas starting on the birth date.
///
/// The first period runs for the birth balance converted to days on the mean
/// year and rounded up. Every later period lasts its ruler's full whole years
/// in calendar arithmetic. The rotation cycles without end. The iterator only
/// stops after yielding an error, which happens when the calendar runs out.
#[derive(Debug, Clone)]
pub struct Mahadashas {
  first:  Option<DashaPeriod>,
  cursor: NaiveDate,
  next:   usize,
  failed: bool,
}

impl Iterator for Mahadashas {
  type Item = Result<DashaPeriod>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.failed {
      return None;
    }
    if let Some(first) = self.first.take() {
      trace!(ruler = %first.ruler, from = %first.from, to = %first.to, "mahadasha");
      return Some(Ok(first));
    }

    let (ruler, years) = DASHA_ROTATION[self.next];
    let from = self.cursor;
    let to = match calendar::add_years(from, years) {
      Ok(to) => to,
      Err(e) => {
        self.failed = true;
        return Some(Err(e));
      }
    };
    self.cursor = to;
    self.next = (self.next + 1) % DASHA_ROTATION.len();

    trace!(ruler = %ruler, from = %from, to = %to, "mahadasha");
    Some(Ok(DashaPeriod { ruler, from, to }))
  }
}

/// Start the Mahadasha stream for a birth.
pub fn mahadashas(birth: DateTime<Utc>, longitude: f64) -> Result<Mahadashas> {
  let balance = birth_balance(longitude)?;
  let from = birth.date_naive();
  let to = calendar::add_days_ceil(
    from,
    calendar::years_to_days(balance.balance_years()),
  )?;

  Ok(Mahadashas {
    first: Some(DashaPeriod {
      ruler: balance.ruler,
      from,
      to,
    }),
    cursor: to,
    next: (rotation_index(balance.ruler) + 1) % DASHA_ROTATION.len(),
    failed: false,
  })
}

/// The first `count` Mahadashas.
pub fn generate_periods(
  birth: DateTime<Utc>,
  longitude: f64,
  count: usize,
) -> Result<Vec<DashaPeriod>> {
  mahadashas(birth, longitude)?.take(count).collect()
}

/// The first `count` Mahadashas, each with its Antardashas.
pub fn hierarchy(
  birth: DateTime<Utc>,
  longitude: f64,
  count: usize,
) -> Result<Vec<MahadashaNode>> {
  mahadashas(birth, longitude)?
    .take(count)
    .map(|period| {
      let period = period?;
      let antardashas =
        generate_sub_periods(period.ruler, period.from, period.to)?;
      Ok(MahadashaNode {
        period,
        antardashas,
      })
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  fn birth() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(1990, 7, 14, 5, 30, 0).unwrap()
  }

  #[test]
  fn balance_at_nakshatra_start_is_whole() {
    let b = birth_balance(0.0).unwrap();
    assert_eq!(b.nakshatra, Nakshatra::Ashwini);
    assert_eq!(b.ruler, Planet::Ketu);
    assert_eq!(b.traversed_fraction, 0.0);
    assert_eq!(b.balance_fraction, 1.0);

    // Second mansion starts exactly one span in.
    let b = birth_balance(NAKSHATRA_SPAN).unwrap();
    assert_eq!(b.nakshatra, Nakshatra::Bharani);
    assert_eq!(b.ruler, Planet::Venus);
    assert_eq!(b.balance_fraction, 1.0);
  }

  #[test]
  fn balance_at_midpoint_is_half() {
    let b = birth_balance(NAKSHATRA_SPAN * 3.5).unwrap();
    assert_eq!(b.nakshatra, Nakshatra::Rohini);
    assert_eq!(b.ruler, Planet::Moon);
    assert!((b.balance_fraction - 0.5).abs() < 1e-9);
    assert!((b.balance_years() - 5.0).abs() < 1e-9);
  }

  #[test]
  fn longitude_is_normalised() {
    assert_eq!(
      birth_balance(360.0 + 10.0).unwrap().nakshatra,
      Nakshatra::Ashwini
    );
    assert_eq!(birth_balance(-1.0).unwrap().nakshatra, Nakshatra::Revati);
    assert!(matches!(
      birth_balance(f64::NAN),
      Err(Error::NonFiniteLongitude(_))
    ));
    assert!(birth_balance(f64::INFINITY).is_err());
  }

  #[test]
  fn first_period_is_unshortened_on_a_boundary() {
    let periods = generate_periods(birth(), 0.0, 2).unwrap();
    let first = periods[0];
    assert_eq!(first.ruler, Planet::Ketu);
    assert_eq!(first.from, birth().date_naive());
    // 7 * 365.2425 = 2556.6975, rounded up.
    assert_eq!(first.duration_days(), 2557);
    assert_eq!(periods[1].ruler, Planet::Venus);
  }

  #[test]
  fn later_periods_step_whole_calendar_years() {
    let periods = generate_periods(birth(), 100.0, 4).unwrap();
    for w in periods.windows(2) {
      let next = w[1];
      assert_eq!(
        calendar::add_years(next.from, dasha_years(next.ruler)).unwrap(),
        next.to
      );
    }
  }

  #[test]
  fn rotation_wraps_past_nine() {
    let periods = generate_periods(birth(), 0.0, 12).unwrap();
    let rulers: Vec<_> = periods.iter().map(|p| p.ruler).collect();
    assert_eq!(rulers[0], Planet::Ketu);
    assert_eq!(rulers[8], Planet::Mercury);
    assert_eq!(rulers[9], Planet::Ketu);
    assert_eq!(rulers[10], Planet::Venus);
  }

  #[test]
  fn zero_count_is_empty() {
    assert!(generate_periods(birth(), 42.0, 0).unwrap().is_empty());
  }

  #[test]
  fn hierarchy_expands_each_mahadasha() {
    let nodes = hierarchy(birth(), 200.0, 3).unwrap();
    assert_eq!(nodes.len(), 3);
    for node in &nodes {
      assert_eq!(node.antardashas.len(), 9);
      assert_eq!(node.antardashas[0].ruler, node.period.ruler);
      assert_eq!(node.antardashas[0].from, node.period.from);
      assert_eq!(node.antardashas[8].to, node.period.to);
    }
  }
}
