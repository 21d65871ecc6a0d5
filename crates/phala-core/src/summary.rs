//! Theme and area summaries built from evaluated rules.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum::Display;

/// Coarse bucket for a summed score.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ScoreLevel {
  Low,
  Medium,
  High,
}

/// Score boundaries between levels. A score below `medium` is low, below
/// `high` is medium, anything else is high.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelThresholds {
  pub medium: f64,
  pub high:   f64,
}

impl Default for LevelThresholds {
  fn default() -> Self {
    Self {
      medium: 1.5,
      high:   3.0,
    }
  }
}

impl LevelThresholds {
  pub fn level(&self, score: f64) -> ScoreLevel {
    if score < self.medium {
      ScoreLevel::Low
    } else if score < self.high {
      ScoreLevel::Medium
    } else {
      ScoreLevel::High
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaSummary {
  pub area:        String,
  pub score:       f64,
  pub level:       ScoreLevel,
  /// Taken from the single highest-scoring contributor.
  pub trend:       String,
  pub tone:        String,
  pub rule_ids:    BTreeSet<String>,
  pub point_codes: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeSummary {
  pub theme:       String,
  pub total_score: f64,
  pub level:       ScoreLevel,
  /// 1 is the highest total.
  pub rank:        usize,
  /// Areas in first-encounter order.
  pub areas:       Vec<AreaSummary>,
}

impl ThemeSummary {
  pub fn area(&self, name: &str) -> Option<&AreaSummary> {
    self.areas.iter().find(|a| a.area == name)
  }
}
