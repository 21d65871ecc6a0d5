use chrono::NaiveDate;
use phala_core::{dasha::DashaLevel, planet::Planet};
use serde::{Deserialize, Serialize};

/// One period in the hierarchy. `from` is inclusive and `to` exclusive, so
/// consecutive periods share a boundary date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashaPeriod {
  pub ruler: Planet,
  pub from:  NaiveDate,
  pub to:    NaiveDate,
}

impl DashaPeriod {
  pub fn duration_days(&self) -> i64 { (self.to - self.from).num_days() }

  pub fn contains(&self, date: NaiveDate) -> bool {
    self.from <= date && date < self.to
  }
}

/// The three periods containing one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashaState {
  pub mahadasha:       DashaPeriod,
  pub antardasha:      DashaPeriod,
  pub pratyantardasha: DashaPeriod,
}

impl DashaState {
  pub fn period(&self, level: DashaLevel) -> &DashaPeriod {
    match level {
      DashaLevel::Mahadasha => &self.mahadasha,
      DashaLevel::Antardasha => &self.antardasha,
      DashaLevel::Pratyantardasha => &self.pratyantardasha,
    }
  }

  pub fn ruler(&self, level: DashaLevel) -> Planet { self.period(level).ruler }
}

/// A Mahadasha expanded one level down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MahadashaNode {
  pub period:      DashaPeriod,
  pub antardashas: Vec<DashaPeriod>,
}
