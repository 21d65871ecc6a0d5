//! Fixed tables of the 120-year planetary-period rotation.
//!
//! The rotation order and year lengths are a closed constant table shared by
//! the period calculator and the nakshatra lordship pattern.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::planet::Planet;

/// Ruler order and full period length in years.
pub const DASHA_ROTATION: [(Planet, u32); 9] = [
  (Planet::Ketu, 7),
  (Planet::Venus, 20),
  (Planet::Sun, 6),
  (Planet::Moon, 10),
  (Planet::Mars, 7),
  (Planet::Rahu, 18),
  (Planet::Jupiter, 16),
  (Planet::Saturn, 19),
  (Planet::Mercury, 17),
];

/// Sum of all rotation years.
pub const DASHA_CYCLE_YEARS: u32 = 120;

/// Position of `planet` in [`DASHA_ROTATION`]. Every planet has one.
pub fn rotation_index(planet: Planet) -> usize {
  match planet {
    Planet::Ketu => 0,
    Planet::Venus => 1,
    Planet::Sun => 2,
    Planet::Moon => 3,
    Planet::Mars => 4,
    Planet::Rahu => 5,
    Planet::Jupiter => 6,
    Planet::Saturn => 7,
    Planet::Mercury => 8,
  }
}

/// Full period length of `planet` in years.
pub fn dasha_years(planet: Planet) -> u32 { DASHA_ROTATION[rotation_index(planet)].1 }

// ─── Levels ──────────────────────────────────────────────────────────────────

/// The three nested levels of the period hierarchy.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DashaLevel {
  #[serde(alias = "maha", alias = "md")]
  Mahadasha,
  #[serde(alias = "antar", alias = "ad")]
  Antardasha,
  #[serde(alias = "pratyantar", alias = "pd")]
  Pratyantardasha,
}

impl DashaLevel {
  /// Next deeper level, if any.
  pub const fn child(self) -> Option<Self> {
    match self {
      Self::Mahadasha => Some(Self::Antardasha),
      Self::Antardasha => Some(Self::Pratyantardasha),
      Self::Pratyantardasha => None,
    }
  }

  /// Snapshot column holding the ruler currently running at this level.
  pub const fn raw_field(self) -> &'static str {
    match self {
      Self::Mahadasha => "current_mahadasha",
      Self::Antardasha => "current_antardasha",
      Self::Pratyantardasha => "current_pratyantardasha",
    }
  }
}

#[cfg(test)]
mod tests {
  use strum::IntoEnumIterator;

  use super::*;

  #[test]
  fn rotation_years_sum_to_cycle() {
    let total: u32 = DASHA_ROTATION.iter().map(|(_, y)| y).sum();
    assert_eq!(total, DASHA_CYCLE_YEARS);
  }

  #[test]
  fn rotation_index_matches_table() {
    for planet in Planet::iter() {
      assert_eq!(DASHA_ROTATION[rotation_index(planet)].0, planet);
    }
    assert_eq!(dasha_years(Planet::Venus), 20);
    assert_eq!(dasha_years(Planet::Sun), 6);
  }

  #[test]
  fn level_aliases_deserialize() {
    let l: DashaLevel = serde_json::from_str("\"maha\"").unwrap();
    assert_eq!(l, DashaLevel::Mahadasha);
    let l: DashaLevel = serde_json::from_str("\"pratyantardasha\"").unwrap();
    assert_eq!(l, DashaLevel::Pratyantardasha);
    assert_eq!(DashaLevel::Antardasha.to_string(), "antardasha");
  }

  #[test]
  fn level_children() {
    assert_eq!(DashaLevel::Mahadasha.child(), Some(DashaLevel::Antardasha));
    assert_eq!(DashaLevel::Pratyantardasha.child(), None);
  }
}
