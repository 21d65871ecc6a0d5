//! Per-context classification of nakshatras.
//!
//! Each context (career, wealth, …) sorts mansions into four named lists.
//! The table is authored data. A mansion missing from every list, or any
//! mansion under a context the table does not know, is neutral.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::nakshatra::Nakshatra;

/// The class a nakshatra falls into for a given context.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum NakshatraClass {
  Supportive,
  Neutral,
  Sensitive,
  Obstructive,
}

struct ContextTable {
  context:     &'static str,
  supportive:  &'static [Nakshatra],
  neutral:     &'static [Nakshatra],
  sensitive:   &'static [Nakshatra],
  obstructive: &'static [Nakshatra],
}

use Nakshatra::*;

const CONTEXTS: &[ContextTable] = &[
  ContextTable {
    context:     "general",
    supportive:  &[
      Ashwini, Pushya, Hasta, Mrigashira, Chitra, Anuradha, Revati, Rohini,
      UttaraPhalguni, UttaraAshadha, UttaraBhadrapada,
    ],
    neutral:     &[
      Punarvasu, Swati, Shravana, Dhanishtha, Shatabhisha, Krittika, Vishakha,
    ],
    sensitive:   &[
      Bharani, Magha, PurvaPhalguni, PurvaAshadha, PurvaBhadrapada,
    ],
    obstructive: &[Ardra, Ashlesha, Jyeshtha, Mula],
  },
  ContextTable {
    context:     "career",
    supportive:  &[
      Rohini, UttaraPhalguni, UttaraAshadha, UttaraBhadrapada, Ashwini, Pushya,
      Hasta,
    ],
    neutral:     &[
      Punarvasu, Swati, Shravana, Dhanishtha, Shatabhisha, Mrigashira, Chitra,
      Anuradha, Revati,
    ],
    sensitive:   &[Krittika, Vishakha, Bharani, Magha, PurvaPhalguni],
    obstructive: &[
      Ardra, Ashlesha, Jyeshtha, Mula, PurvaAshadha, PurvaBhadrapada,
    ],
  },
  ContextTable {
    context:     "wealth",
    supportive:  &[
      Rohini, UttaraPhalguni, UttaraAshadha, UttaraBhadrapada, Pushya, Revati,
      Dhanishtha, Shravana,
    ],
    neutral:     &[
      Ashwini, Hasta, Mrigashira, Chitra, Anuradha, Punarvasu, Swati,
      Shatabhisha, Krittika, Vishakha,
    ],
    sensitive:   &[
      Bharani, Magha, PurvaPhalguni, PurvaAshadha, PurvaBhadrapada,
    ],
    obstructive: &[Ardra, Ashlesha, Jyeshtha, Mula],
  },
  ContextTable {
    context:     "relationships",
    supportive:  &[
      Mrigashira, Chitra, Anuradha, Revati, Rohini, UttaraPhalguni,
      UttaraBhadrapada, Hasta,
    ],
    neutral:     &[
      Ashwini, Pushya, Punarvasu, Shravana, Dhanishtha, Shatabhisha, Swati,
      UttaraAshadha,
    ],
    sensitive:   &[
      Bharani, Magha, PurvaPhalguni, PurvaAshadha, PurvaBhadrapada, Krittika,
      Vishakha,
    ],
    obstructive: &[Ardra, Ashlesha, Jyeshtha, Mula],
  },
  ContextTable {
    context:     "health",
    supportive:  &[Ashwini, Pushya, Hasta, Rohini, Anuradha, Revati, Shravana],
    neutral:     &[
      Mrigashira, Chitra, Punarvasu, Swati, Dhanishtha, Shatabhisha,
      UttaraPhalguni, UttaraAshadha, UttaraBhadrapada,
    ],
    sensitive:   &[
      Krittika, Vishakha, Bharani, Magha, PurvaPhalguni, PurvaAshadha,
      PurvaBhadrapada,
    ],
    obstructive: &[Ardra, Ashlesha, Jyeshtha, Mula],
  },
  ContextTable {
    context:     "travel",
    supportive:  &[
      Punarvasu, Swati, Shravana, Dhanishtha, Shatabhisha, Ashwini, Pushya,
      Hasta, Mrigashira, Revati, Anuradha,
    ],
    neutral:     &[Krittika, Vishakha],
    sensitive:   &[
      Rohini, UttaraPhalguni, UttaraAshadha, UttaraBhadrapada, Bharani, Magha,
    ],
    obstructive: &[
      Ardra, Ashlesha, Jyeshtha, Mula, PurvaPhalguni, PurvaAshadha,
      PurvaBhadrapada,
    ],
  },
];

/// Context keys the table knows about.
pub fn contexts() -> impl Iterator<Item = &'static str> {
  CONTEXTS.iter().map(|t| t.context)
}

impl ContextTable {
  fn members(&self, class: NakshatraClass) -> &'static [Nakshatra] {
    match class {
      NakshatraClass::Supportive => self.supportive,
      NakshatraClass::Neutral => self.neutral,
      NakshatraClass::Sensitive => self.sensitive,
      NakshatraClass::Obstructive => self.obstructive,
    }
  }
}

fn table(context: &str) -> Option<&'static ContextTable> {
  let context = context.trim();
  CONTEXTS
    .iter()
    .find(|t| t.context.eq_ignore_ascii_case(context))
}

/// Classify `nakshatra` under `context`. Context matching ignores case and
/// surrounding whitespace.
pub fn classify(context: &str, nakshatra: Nakshatra) -> NakshatraClass {
  let Some(table) = table(context) else {
    return NakshatraClass::Neutral;
  };
  NakshatraClass::iter()
    .find(|&class| table.members(class).contains(&nakshatra))
    .unwrap_or(NakshatraClass::Neutral)
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::nakshatra::{
    self,
    Nakshatra::{Chitra, Magha, Mula, Rohini, Swati},
  };

  #[test]
  fn lists_are_disjoint_within_each_context() {
    for table in CONTEXTS {
      let lists = [
        table.supportive,
        table.neutral,
        table.sensitive,
        table.obstructive,
      ];
      for n in nakshatra::ALL_NAKSHATRAS {
        let hits = lists.iter().filter(|l| l.contains(&n)).count();
        assert!(hits <= 1, "{n} listed {hits} times in {}", table.context);
      }
    }
  }

  #[test]
  fn known_context_classification() {
    assert_eq!(classify("career", Rohini), NakshatraClass::Supportive);
    assert_eq!(classify("career", Magha), NakshatraClass::Sensitive);
    assert_eq!(classify("career", Mula), NakshatraClass::Obstructive);
    assert_eq!(classify("career", Swati), NakshatraClass::Neutral);
    assert_eq!(classify(" Career ", Rohini), NakshatraClass::Supportive);
  }

  #[test]
  fn listed_members_classify_as_their_list() {
    for context in contexts() {
      let table = table(context).unwrap();
      for class in NakshatraClass::iter() {
        for n in table.members(class) {
          assert_eq!(classify(context, *n), class);
        }
      }
    }
    assert!(table("nowhere").is_none());
  }

  #[test]
  fn unknown_context_is_neutral() {
    assert_eq!(classify("astral-travel", Rohini), NakshatraClass::Neutral);
    assert_eq!(classify("", Mula), NakshatraClass::Neutral);
  }

  #[test]
  fn unlisted_and_unrecognised_are_neutral() {
    // Travel does not list Chitra at all.
    assert_eq!(classify("travel", Chitra), NakshatraClass::Neutral);
    assert_eq!(nakshatra::canonicalize(&json!("Abhijit")), None);
    assert_eq!(
      nakshatra::canonicalize(&json!(4)).map(|n| classify("career", n)),
      Some(NakshatraClass::Supportive)
    );
  }
}
