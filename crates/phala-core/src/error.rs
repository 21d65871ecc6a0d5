//! Error types for `phala-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown planet: {0:?}")]
  UnknownPlanet(String),

  #[error("unknown sign: {0:?}")]
  UnknownSign(String),

  #[error("unknown nakshatra: {0:?}")]
  UnknownNakshatra(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
