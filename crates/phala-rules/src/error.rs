//! Error types for `phala-rules`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A recognised operator whose config does not have the expected shape.
  #[error("malformed `{operator}` predicate: {reason}")]
  MalformedPredicate { operator: String, reason: String },

  #[error("configuration error: {0}")]
  Config(#[from] config::ConfigError),

  #[error("dasha calculation failed: {0}")]
  Dasha(#[from] phala_dasha::Error),

  #[error("snapshot not found: {0}")]
  SnapshotNotFound(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
