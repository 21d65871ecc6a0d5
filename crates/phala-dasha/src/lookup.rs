//! Point lookup: which periods contain a given instant.

use chrono::{DateTime, Utc};
use tracing::trace;

use crate::{DashaPeriod, DashaState, Result, generate_sub_periods, mahadashas};

/// The Mahadasha, Antardasha and Pratyantardasha running at `at`.
///
/// Containment is by calendar date, half-open (`from <= date < to`), so a
/// boundary date belongs to the period that starts on it. Instants before
/// the birth date have no state and return `Ok(None)`.
pub fn state_at(
  birth: DateTime<Utc>,
  longitude: f64,
  at: DateTime<Utc>,
) -> Result<Option<DashaState>> {
  let date = at.date_naive();
  let mut stream = mahadashas(birth, longitude)?;
  if date < birth.date_naive() {
    return Ok(None);
  }

  let mahadasha = loop {
    match stream.next() {
      Some(period) => {
        let period = period?;
        if period.contains(date) {
          break period;
        }
      }
      None => return Ok(None),
    }
  };

  let Some(antardasha) = containing(&generate_sub_periods(
    mahadasha.ruler,
    mahadasha.from,
    mahadasha.to,
  )?, date) else {
    return Ok(None);
  };
  let Some(pratyantardasha) = containing(&generate_sub_periods(
    antardasha.ruler,
    antardasha.from,
    antardasha.to,
  )?, date) else {
    return Ok(None);
  };

  trace!(
    maha = %mahadasha.ruler,
    antar = %antardasha.ruler,
    pratyantar = %pratyantardasha.ruler,
    %date,
    "dasha state"
  );
  Ok(Some(DashaState {
    mahadasha,
    antardasha,
    pratyantardasha,
  }))
}

fn containing(
  periods: &[DashaPeriod],
  date: chrono::NaiveDate,
) -> Option<DashaPeriod> {
  periods.iter().find(|p| p.contains(date)).copied()
}
