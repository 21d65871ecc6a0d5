//! Proportional sub-period generation.
//!
//! A parent span is split into nine children, starting with the parent's own
//! ruler and following the rotation. Each child gets `years / 120` of the
//! parent's days. Boundaries are accumulated as fractional days and rounded
//! up to whole dates, and the last child always ends exactly on the parent's
//! end, so children re-partition the parent with no gap or overshoot.

use chrono::NaiveDate;
use phala_core::{
  dasha::{DASHA_CYCLE_YEARS, DASHA_ROTATION, rotation_index},
  planet::Planet,
};
use tracing::trace;

use crate::{DashaPeriod, Error, Result, calendar};

/// Split `from..to` into the nine sub-periods of `ruler`.
///
/// Very short parents can yield zero-length children; they are kept so the
/// sequence always has nine entries.
pub fn generate_sub_periods(
  ruler: Planet,
  from: NaiveDate,
  to: NaiveDate,
) -> Result<Vec<DashaPeriod>> {
  if to <= from {
    return Err(Error::InvalidRange { from, to });
  }

  let parent_days = (to - from).num_days() as f64;
  let start = rotation_index(ruler);
  let mut children = Vec::with_capacity(DASHA_ROTATION.len());
  let mut elapsed = 0.0;
  let mut cursor = from;

  for step in 0..DASHA_ROTATION.len() {
    let (child, years) = DASHA_ROTATION[(start + step) % DASHA_ROTATION.len()];
    elapsed += parent_days * f64::from(years) / f64::from(DASHA_CYCLE_YEARS);
    let end = calendar::add_days_ceil(from, elapsed)?.min(to);
    children.push(DashaPeriod {
      ruler: child,
      from:  cursor,
      to:    end,
    });
    cursor = end;
  }

  if let Some(last) = children.last_mut() {
    last.to = to;
  }

  trace!(%ruler, %from, %to, "generated sub-periods");
  Ok(children)
}
