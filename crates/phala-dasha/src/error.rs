//! Error types for `phala-dasha`.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum Error {
  #[error("lunar longitude must be finite, got {0}")]
  NonFiniteLongitude(f64),

  #[error("invalid period range: {from} .. {to}")]
  InvalidRange { from: NaiveDate, to: NaiveDate },

  #[error("date arithmetic left the supported calendar range from {from}")]
  DateOutOfRange { from: NaiveDate },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
