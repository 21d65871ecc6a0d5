//! Planets and zodiac signs.
//!
//! Planet identifiers are upper-case canonical names (`"JUPITER"`). Parsing
//! is case-insensitive and also accepts the common Sanskrit names, so
//! snapshots written by different producers land on the same key.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::{Error, Result};

// ─── Planet ──────────────────────────────────────────────────────────────────

/// The nine bodies that can rule a period and occupy a house.
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
#[serde(rename_all = "UPPERCASE", try_from = "String")]
#[strum(ascii_case_insensitive)]
pub enum Planet {
  #[strum(to_string = "SUN", serialize = "SURYA", serialize = "RAVI")]
  Sun,
  #[strum(to_string = "MOON", serialize = "CHANDRA", serialize = "SOMA")]
  Moon,
  #[strum(to_string = "MARS", serialize = "MANGAL", serialize = "MANGALA", serialize = "KUJA")]
  Mars,
  #[strum(to_string = "MERCURY", serialize = "BUDH", serialize = "BUDHA")]
  Mercury,
  #[strum(to_string = "JUPITER", serialize = "GURU", serialize = "BRIHASPATI")]
  Jupiter,
  #[strum(to_string = "VENUS", serialize = "SHUKRA", serialize = "SUKRA")]
  Venus,
  #[strum(to_string = "SATURN", serialize = "SHANI", serialize = "SANI")]
  Saturn,
  #[strum(to_string = "RAHU")]
  Rahu,
  #[strum(to_string = "KETU")]
  Ketu,
}

impl Planet {
  /// Lenient lookup used wherever authored or persisted data names a planet.
  /// Surrounding whitespace is ignored; anything unrecognised is `None`.
  pub fn lookup(name: &str) -> Option<Self> { Self::from_str(name.trim()).ok() }
}

impl TryFrom<String> for Planet {
  type Error = Error;

  fn try_from(value: String) -> Result<Self> {
    Self::lookup(&value).ok_or(Error::UnknownPlanet(value))
  }
}

// ─── Sign ────────────────────────────────────────────────────────────────────

/// The twelve zodiac signs, numbered 1 (Aries) to 12 (Pisces).
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
#[serde(rename_all = "lowercase", try_from = "String")]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum Sign {
  #[strum(to_string = "aries", serialize = "mesha")]
  Aries,
  #[strum(to_string = "taurus", serialize = "vrishabha")]
  Taurus,
  #[strum(to_string = "gemini", serialize = "mithuna")]
  Gemini,
  #[strum(to_string = "cancer", serialize = "karka", serialize = "kataka")]
  Cancer,
  #[strum(to_string = "leo", serialize = "simha")]
  Leo,
  #[strum(to_string = "virgo", serialize = "kanya")]
  Virgo,
  #[strum(to_string = "libra", serialize = "tula")]
  Libra,
  #[strum(to_string = "scorpio", serialize = "vrischika", serialize = "vrishchika")]
  Scorpio,
  #[strum(to_string = "sagittarius", serialize = "dhanu", serialize = "dhanus")]
  Sagittarius,
  #[strum(to_string = "capricorn", serialize = "makara")]
  Capricorn,
  #[strum(to_string = "aquarius", serialize = "kumbha")]
  Aquarius,
  #[strum(to_string = "pisces", serialize = "meena")]
  Pisces,
}

/// All signs in zodiacal order; `ALL_SIGNS[n - 1]` is sign number `n`.
pub const ALL_SIGNS: [Sign; 12] = [
  Sign::Aries,
  Sign::Taurus,
  Sign::Gemini,
  Sign::Cancer,
  Sign::Leo,
  Sign::Virgo,
  Sign::Libra,
  Sign::Scorpio,
  Sign::Sagittarius,
  Sign::Capricorn,
  Sign::Aquarius,
  Sign::Pisces,
];

impl Sign {
  /// Sign from its 1-based number.
  pub fn from_number(n: u64) -> Option<Self> {
    let idx = usize::try_from(n).ok()?.checked_sub(1)?;
    ALL_SIGNS.get(idx).copied()
  }

  /// 1-based sign number.
  pub const fn number(self) -> u8 { self as u8 + 1 }

  /// Sign containing a sidereal longitude in degrees.
  pub fn from_longitude(longitude: f64) -> Self {
    let idx = (longitude.rem_euclid(360.0) / 30.0).floor() as usize;
    ALL_SIGNS[idx.min(11)]
  }

  /// The traditional ruler of the sign; the "lord" of any house it occupies.
  pub const fn lord(self) -> Planet {
    match self {
      Self::Aries | Self::Scorpio => Planet::Mars,
      Self::Taurus | Self::Libra => Planet::Venus,
      Self::Gemini | Self::Virgo => Planet::Mercury,
      Self::Cancer => Planet::Moon,
      Self::Leo => Planet::Sun,
      Self::Sagittarius | Self::Pisces => Planet::Jupiter,
      Self::Capricorn | Self::Aquarius => Planet::Saturn,
    }
  }

  /// Lenient lookup from a name or a 1-based number written as text.
  pub fn lookup(name: &str) -> Option<Self> {
    let name = name.trim();
    match name.parse::<u64>() {
      Ok(n) => Self::from_number(n),
      Err(_) => Self::from_str(name).ok(),
    }
  }
}

impl TryFrom<String> for Sign {
  type Error = Error;

  fn try_from(value: String) -> Result<Self> {
    Self::lookup(&value).ok_or(Error::UnknownSign(value))
  }
}

#[cfg(test)]
mod tests {
  use strum::IntoEnumIterator;

  use super::*;

  #[test]
  fn planet_names_are_upper_case() {
    assert_eq!(Planet::Jupiter.to_string(), "JUPITER");
    assert_eq!(
      serde_json::to_value(Planet::Rahu).unwrap(),
      serde_json::json!("RAHU")
    );
  }

  #[test]
  fn planet_lookup_is_lenient() {
    assert_eq!(Planet::lookup("jupiter"), Some(Planet::Jupiter));
    assert_eq!(Planet::lookup(" Guru "), Some(Planet::Jupiter));
    assert_eq!(Planet::lookup("shani"), Some(Planet::Saturn));
    assert_eq!(Planet::lookup("URANUS"), None);
    assert_eq!(Planet::lookup(""), None);
  }

  #[test]
  fn planet_deserializes_from_alias() {
    let p: Planet = serde_json::from_str("\"chandra\"").unwrap();
    assert_eq!(p, Planet::Moon);
    assert!(serde_json::from_str::<Planet>("\"PLUTO\"").is_err());
  }

  #[test]
  fn sign_numbers_round_trip() {
    for sign in Sign::iter() {
      assert_eq!(Sign::from_number(u64::from(sign.number())), Some(sign));
    }
    assert_eq!(Sign::from_number(0), None);
    assert_eq!(Sign::from_number(13), None);
  }

  #[test]
  fn sign_lookup_accepts_names_and_numbers() {
    assert_eq!(Sign::lookup("Leo"), Some(Sign::Leo));
    assert_eq!(Sign::lookup("makara"), Some(Sign::Capricorn));
    assert_eq!(Sign::lookup("9"), Some(Sign::Sagittarius));
    assert_eq!(Sign::lookup("ophiuchus"), None);
  }

  #[test]
  fn sign_deserializes_from_alias() {
    let s: Sign = serde_json::from_str("\"Simha\"").unwrap();
    assert_eq!(s, Sign::Leo);
    assert_eq!(serde_json::to_value(Sign::Leo).unwrap(), serde_json::json!("leo"));
    assert!(serde_json::from_str::<Sign>("\"ophiuchus\"").is_err());
  }

  #[test]
  fn sign_lords() {
    assert_eq!(Sign::Aries.lord(), Planet::Mars);
    assert_eq!(Sign::Cancer.lord(), Planet::Moon);
    assert_eq!(Sign::Aquarius.lord(), Planet::Saturn);
    assert_eq!(Sign::Pisces.lord(), Planet::Jupiter);
  }

  #[test]
  fn sign_from_longitude_wraps() {
    assert_eq!(Sign::from_longitude(0.0), Sign::Aries);
    assert_eq!(Sign::from_longitude(45.0), Sign::Taurus);
    assert_eq!(Sign::from_longitude(-1.0), Sign::Pisces);
    assert_eq!(Sign::from_longitude(360.0), Sign::Aries);
  }
}
