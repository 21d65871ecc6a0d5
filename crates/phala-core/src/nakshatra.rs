//! The 27 lunar mansions and their canonical identifiers.
//!
//! Authored rules and persisted snapshots name a nakshatra in several ways:
//! a 1..27 index, the canonical name, or one of a handful of alternate
//! spellings. Everything funnels through [`canonicalize`] so the evaluator
//! only ever compares [`Nakshatra`] values. Lookup never fails loudly; an
//! unrecognised identifier is simply `None`.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result, dasha::DASHA_ROTATION, planet::Planet};

/// Arc of one nakshatra: 360/27 = 13°20′.
pub const NAKSHATRA_SPAN: f64 = 360.0 / 27.0;

/// Arc of one pada: 3°20′.
pub const PADA_SPAN: f64 = NAKSHATRA_SPAN / 4.0;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Nakshatra {
  Ashwini,
  Bharani,
  Krittika,
  Rohini,
  Mrigashira,
  Ardra,
  Punarvasu,
  Pushya,
  Ashlesha,
  Magha,
  PurvaPhalguni,
  UttaraPhalguni,
  Hasta,
  Chitra,
  Swati,
  Vishakha,
  Anuradha,
  Jyeshtha,
  Mula,
  PurvaAshadha,
  UttaraAshadha,
  Shravana,
  Dhanishtha,
  Shatabhisha,
  PurvaBhadrapada,
  UttaraBhadrapada,
  Revati,
}

/// All nakshatras in zodiacal order (index 0 = Ashwini).
pub const ALL_NAKSHATRAS: [Nakshatra; 27] = [
  Nakshatra::Ashwini,
  Nakshatra::Bharani,
  Nakshatra::Krittika,
  Nakshatra::Rohini,
  Nakshatra::Mrigashira,
  Nakshatra::Ardra,
  Nakshatra::Punarvasu,
  Nakshatra::Pushya,
  Nakshatra::Ashlesha,
  Nakshatra::Magha,
  Nakshatra::PurvaPhalguni,
  Nakshatra::UttaraPhalguni,
  Nakshatra::Hasta,
  Nakshatra::Chitra,
  Nakshatra::Swati,
  Nakshatra::Vishakha,
  Nakshatra::Anuradha,
  Nakshatra::Jyeshtha,
  Nakshatra::Mula,
  Nakshatra::PurvaAshadha,
  Nakshatra::UttaraAshadha,
  Nakshatra::Shravana,
  Nakshatra::Dhanishtha,
  Nakshatra::Shatabhisha,
  Nakshatra::PurvaBhadrapada,
  Nakshatra::UttaraBhadrapada,
  Nakshatra::Revati,
];

/// Alternate spellings, keyed by the folded form produced by [`fold`].
const ALIASES: &[(&str, Nakshatra)] = &[
  ("aswini", Nakshatra::Ashwini),
  ("ashvini", Nakshatra::Ashwini),
  ("asvini", Nakshatra::Ashwini),
  ("kritika", Nakshatra::Krittika),
  ("krithika", Nakshatra::Krittika),
  ("karthika", Nakshatra::Krittika),
  ("mrigasira", Nakshatra::Mrigashira),
  ("mrigashirsha", Nakshatra::Mrigashira),
  ("mrigasirsha", Nakshatra::Mrigashira),
  ("arudra", Nakshatra::Ardra),
  ("aardra", Nakshatra::Ardra),
  ("pushyami", Nakshatra::Pushya),
  ("pusya", Nakshatra::Pushya),
  ("aslesha", Nakshatra::Ashlesha),
  ("ashlesa", Nakshatra::Ashlesha),
  ("makha", Nakshatra::Magha),
  ("poorvaphalguni", Nakshatra::PurvaPhalguni),
  ("purvaphalgu", Nakshatra::PurvaPhalguni),
  ("pubba", Nakshatra::PurvaPhalguni),
  ("uttaraphalgu", Nakshatra::UttaraPhalguni),
  ("utraphalguni", Nakshatra::UttaraPhalguni),
  ("hastha", Nakshatra::Hasta),
  ("chitta", Nakshatra::Chitra),
  ("chithra", Nakshatra::Chitra),
  ("swathi", Nakshatra::Swati),
  ("svati", Nakshatra::Swati),
  ("visakha", Nakshatra::Vishakha),
  ("vishaka", Nakshatra::Vishakha),
  ("jyestha", Nakshatra::Jyeshtha),
  ("jyeshta", Nakshatra::Jyeshtha),
  ("moola", Nakshatra::Mula),
  ("purvashadha", Nakshatra::PurvaAshadha),
  ("poorvashadha", Nakshatra::PurvaAshadha),
  ("purvasadha", Nakshatra::PurvaAshadha),
  ("uttarashadha", Nakshatra::UttaraAshadha),
  ("uttarasadha", Nakshatra::UttaraAshadha),
  ("utharashada", Nakshatra::UttaraAshadha),
  ("sravana", Nakshatra::Shravana),
  ("shravan", Nakshatra::Shravana),
  ("dhanishta", Nakshatra::Dhanishtha),
  ("dhanista", Nakshatra::Dhanishtha),
  ("shravishtha", Nakshatra::Dhanishtha),
  ("satabhisha", Nakshatra::Shatabhisha),
  ("shatabhishak", Nakshatra::Shatabhisha),
  ("shatabhishaj", Nakshatra::Shatabhisha),
  ("poorvabhadrapada", Nakshatra::PurvaBhadrapada),
  ("purvabhadra", Nakshatra::PurvaBhadrapada),
  ("uttarabhadra", Nakshatra::UttaraBhadrapada),
  ("utharabhadra", Nakshatra::UttaraBhadrapada),
  ("revathi", Nakshatra::Revati),
];

impl Nakshatra {
  /// Canonical display name.
  pub const fn name(self) -> &'static str {
    match self {
      Self::Ashwini => "Ashwini",
      Self::Bharani => "Bharani",
      Self::Krittika => "Krittika",
      Self::Rohini => "Rohini",
      Self::Mrigashira => "Mrigashira",
      Self::Ardra => "Ardra",
      Self::Punarvasu => "Punarvasu",
      Self::Pushya => "Pushya",
      Self::Ashlesha => "Ashlesha",
      Self::Magha => "Magha",
      Self::PurvaPhalguni => "Purva Phalguni",
      Self::UttaraPhalguni => "Uttara Phalguni",
      Self::Hasta => "Hasta",
      Self::Chitra => "Chitra",
      Self::Swati => "Swati",
      Self::Vishakha => "Vishakha",
      Self::Anuradha => "Anuradha",
      Self::Jyeshtha => "Jyeshtha",
      Self::Mula => "Mula",
      Self::PurvaAshadha => "Purva Ashadha",
      Self::UttaraAshadha => "Uttara Ashadha",
      Self::Shravana => "Shravana",
      Self::Dhanishtha => "Dhanishtha",
      Self::Shatabhisha => "Shatabhisha",
      Self::PurvaBhadrapada => "Purva Bhadrapada",
      Self::UttaraBhadrapada => "Uttara Bhadrapada",
      Self::Revati => "Revati",
    }
  }

  /// 0-based position (Ashwini = 0, Revati = 26).
  pub const fn index(self) -> usize { self as usize }

  /// 1-based number as used in authored rules (Ashwini = 1, Revati = 27).
  pub const fn number(self) -> u8 { self as u8 + 1 }

  /// Nakshatra from its 1-based number.
  pub fn from_number(n: u64) -> Option<Self> {
    let idx = usize::try_from(n).ok()?.checked_sub(1)?;
    ALL_NAKSHATRAS.get(idx).copied()
  }

  /// Period ruler of this nakshatra: the rotation pattern repeated three
  /// times across the 27 slots, starting at Ketu.
  pub const fn lord(self) -> Planet { DASHA_ROTATION[self.index() % 9].0 }

  /// Nakshatra containing a sidereal longitude in degrees.
  pub fn from_longitude(longitude: f64) -> Self {
    let idx = (longitude.rem_euclid(360.0) / NAKSHATRA_SPAN).floor() as usize;
    ALL_NAKSHATRAS[idx.min(26)]
  }
}

/// Pada (1..=4) containing a sidereal longitude in degrees.
pub fn pada_from_longitude(longitude: f64) -> u8 {
  let within = longitude.rem_euclid(360.0) % NAKSHATRA_SPAN;
  ((within / PADA_SPAN).floor() as u8).min(3) + 1
}

impl fmt::Display for Nakshatra {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl From<Nakshatra> for &'static str {
  fn from(n: Nakshatra) -> Self { n.name() }
}

impl FromStr for Nakshatra {
  type Err = Error;

  /// Accepts a canonical name, a known alias, or a 1..27 number as text.
  /// Case, spaces, hyphens and underscores are ignored.
  fn from_str(s: &str) -> Result<Self> {
    let trimmed = s.trim();
    if let Ok(n) = trimmed.parse::<u64>() {
      return Self::from_number(n)
        .ok_or_else(|| Error::UnknownNakshatra(s.to_string()));
    }
    let key = fold(trimmed);
    ALL_NAKSHATRAS
      .iter()
      .copied()
      .find(|n| fold(n.name()) == key)
      .or_else(|| {
        ALIASES
          .iter()
          .find(|(alias, _)| *alias == key)
          .map(|(_, n)| *n)
      })
      .ok_or_else(|| Error::UnknownNakshatra(s.to_string()))
  }
}

impl TryFrom<String> for Nakshatra {
  type Error = Error;

  fn try_from(value: String) -> Result<Self> { value.parse() }
}

/// Lower-case and drop everything that is not a letter or digit.
fn fold(s: &str) -> String {
  s.chars()
    .filter(|c| c.is_ascii_alphanumeric())
    .map(|c| c.to_ascii_lowercase())
    .collect()
}

// ─── Canonicalisation of loosely-typed values ────────────────────────────────

/// Canonicalise a JSON identifier: an integer index 1..27, a numeric string,
/// a canonical name, or an alias. Anything else is `None`.
pub fn canonicalize(value: &Value) -> Option<Nakshatra> {
  match value {
    Value::Number(_) => Nakshatra::from_number(integral(value)?),
    Value::String(s) => s.parse().ok(),
    _ => None,
  }
}

/// Canonicalise a pada: an integer 1..4 or the same as text.
pub fn canonicalize_pada(value: &Value) -> Option<u8> {
  let n = match value {
    Value::Number(_) => integral(value)?,
    Value::String(s) => s.trim().parse().ok()?,
    _ => return None,
  };
  (1..=4).contains(&n).then_some(n as u8)
}

/// A JSON number that is a non-negative whole value (`3` or `3.0`).
fn integral(value: &Value) -> Option<u64> {
  if let Some(n) = value.as_u64() {
    return Some(n);
  }
  let f = value.as_f64()?;
  (f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64).then_some(f as u64)
}
