//! Engine configuration.
//!
//! Loaded from an optional file plus `PHALA_`-prefixed environment variables
//! (nested keys separated by `__`, e.g. `PHALA_THRESHOLDS__HIGH=4.0`).
//! Everything has a default, so an empty configuration is valid.

use std::path::Path;

use phala_core::summary::LevelThresholds;
use serde::{Deserialize, Serialize};

use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
  /// Boundaries between low, medium and high summary levels.
  pub thresholds:          LevelThresholds,
  /// How many listed planets an `any`-mode leaf needs when the leaf does not
  /// say. Clamped to at least 1.
  pub default_min_planets: usize,
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self {
      thresholds:          LevelThresholds::default(),
      default_min_planets: 1,
    }
  }
}

impl EngineConfig {
  /// Layer the file at `path` (if given and present) under the environment.
  pub fn load(path: Option<&Path>) -> Result<Self> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
      builder = builder.add_source(config::File::from(path).required(false));
    }
    let settings = builder
      .add_source(
        config::Environment::with_prefix("PHALA")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()?;

    let config: Self = settings.try_deserialize()?;
    tracing::debug!(?config, "loaded engine config");
    Ok(config)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_without_sources() {
    let config = EngineConfig::load(None).unwrap();
    assert_eq!(config.thresholds.medium, 1.5);
    assert_eq!(config.thresholds.high, 3.0);
    assert_eq!(config.default_min_planets, 1);
  }

  #[test]
  fn missing_file_is_not_an_error() {
    let path = std::env::temp_dir().join("phala-no-such-config.toml");
    let config = EngineConfig::load(Some(&path)).unwrap();
    assert_eq!(config, EngineConfig::default());
  }

  #[test]
  fn file_overrides_defaults() {
    let path = std::env::temp_dir()
      .join(format!("phala-engine-{}.toml", std::process::id()));
    std::fs::write(
      &path,
      "default_min_planets = 2\n\n[thresholds]\nmedium = 2.0\nhigh = 5.0\n",
    )
    .unwrap();

    let config = EngineConfig::load(Some(&path)).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(config.default_min_planets, 2);
    assert_eq!(config.thresholds.medium, 2.0);
    assert_eq!(config.thresholds.high, 5.0);
  }
}
