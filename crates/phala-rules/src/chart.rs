//! Chart state normalisation.
//!
//! Snapshots arrive with loosely-typed columns written by several producers:
//! planet lists as arrays of records or as name-keyed maps, houses nested or
//! flat, whole columns sometimes JSON-encoded into a string. [`ChartState`]
//! is the one canonical shape the evaluator reads. Anything that cannot be
//! understood is dropped here, entry by entry, and never reaches evaluation.

use std::collections::BTreeMap;

use phala_core::{
  condition::Chart,
  dasha::DashaLevel,
  nakshatra::{self, Nakshatra},
  planet::{Planet, Sign},
};
use phala_dasha::DashaState;
use serde::Serialize;
use serde_json::{Map, Value};

const PLANET_COLUMNS: &[&str] = &["planets_state", "planets"];
const TRANSIT_COLUMNS: &[&str] = &["transits_state", "transits"];
const HOUSE_COLUMNS: &[&str] = &["houses_state", "houses"];
const YOGA_COLUMNS: &[&str] = &["yogas_state", "yogas"];
const DOSHA_COLUMNS: &[&str] = &["doshas_state", "doshas"];

const PLANET_ID_KEYS: &[&str] = &["name", "planet", "id", "graha"];
const HOUSE_ID_KEYS: &[&str] = &["house", "number", "id"];

// ─── Types ───────────────────────────────────────────────────────────────────

/// What is known about one planet in one chart. Every field is optional;
/// predicates that need a missing field simply do not match.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlanetFact {
  pub house:     Option<u8>,
  pub sign:      Option<Sign>,
  pub longitude: Option<f64>,
  pub nakshatra: Option<Nakshatra>,
  pub pada:      Option<u8>,
  pub strength:  Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartState {
  pub planets:  BTreeMap<Planet, PlanetFact>,
  pub transits: BTreeMap<Planet, PlanetFact>,
  /// House number (1..=12) to the sign on its cusp.
  pub houses:   BTreeMap<u8, Sign>,
  pub yogas:    Vec<Value>,
  pub doshas:   Vec<Value>,
  /// Top-level scalar columns, untouched.
  pub raw:      Map<String, Value>,
}

impl ChartState {
  /// Normalise a raw snapshot record. Never fails; a non-object snapshot
  /// yields an empty state.
  pub fn from_snapshot(snapshot: &Value) -> Self {
    let Some(record) = snapshot.as_object() else {
      return Self::default();
    };

    let raw = record
      .iter()
      .filter(|(_, v)| !(v.is_object() || v.is_array() || v.is_null()))
      .filter(|(k, _)| !is_structured_column(k))
      .map(|(k, v)| (k.clone(), v.clone()))
      .collect();

    Self {
      planets: column(record, PLANET_COLUMNS)
        .map(|v| planet_facts(&v))
        .unwrap_or_default(),
      transits: column(record, TRANSIT_COLUMNS)
        .map(|v| planet_facts(&v))
        .unwrap_or_default(),
      houses: column(record, HOUSE_COLUMNS)
        .map(|v| house_signs(&v))
        .unwrap_or_default(),
      yogas: column(record, YOGA_COLUMNS)
        .map(pass_through)
        .unwrap_or_default(),
      doshas: column(record, DOSHA_COLUMNS)
        .map(pass_through)
        .unwrap_or_default(),
      raw,
    }
  }

  pub fn facts(&self, chart: Chart) -> &BTreeMap<Planet, PlanetFact> {
    match chart {
      Chart::Natal => &self.planets,
      Chart::Transit => &self.transits,
    }
  }

  pub fn fact(&self, chart: Chart, planet: Planet) -> Option<&PlanetFact> {
    self.facts(chart).get(&planet)
  }

  /// Ruler of the sign on `house`, from the natal houses.
  pub fn house_lord(&self, house: u8) -> Option<Planet> {
    self.houses.get(&house).map(|sign| sign.lord())
  }

  /// The ruler currently running at `level`, as recorded in the raw columns.
  pub fn current_ruler(&self, level: DashaLevel) -> Option<Planet> {
    self.raw.get(level.raw_field())?.as_str().and_then(Planet::lookup)
  }

  /// A raw column read as a number; numeric strings are accepted.
  pub fn raw_number(&self, key: &str) -> Option<f64> {
    number(self.raw.get(key)?)
  }

  /// Overwrite the `current_*` ruler columns from a computed dasha state, so
  /// the same snapshot can be evaluated at any instant.
  pub fn with_dasha_state(mut self, state: &DashaState) -> Self {
    for level in [
      DashaLevel::Mahadasha,
      DashaLevel::Antardasha,
      DashaLevel::Pratyantardasha,
    ] {
      self.raw.insert(
        level.raw_field().to_string(),
        Value::String(state.ruler(level).to_string()),
      );
    }
    self
  }
}

fn is_structured_column(key: &str) -> bool {
  [
    PLANET_COLUMNS,
    TRANSIT_COLUMNS,
    HOUSE_COLUMNS,
    YOGA_COLUMNS,
    DOSHA_COLUMNS,
  ]
  .iter()
  .any(|cols| cols.contains(&key))
}

// ─── Column decoding ─────────────────────────────────────────────────────────

/// The first present, decodable column among `names`. Columns stored as
/// JSON text are parsed; undecodable text counts as absent.
fn column(record: &Map<String, Value>, names: &[&str]) -> Option<Value> {
  names.iter().find_map(|name| match record.get(*name)? {
    Value::Null => None,
    Value::String(text) => serde_json::from_str(text).ok(),
    other => Some(other.clone()),
  })
}

fn pass_through(value: Value) -> Vec<Value> {
  match value {
    Value::Array(items) => items,
    Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
    _ => Vec::new(),
  }
}

/// Planet facts from an array of records or a name-keyed map. Entries
/// without a recognisable planet are skipped; the first entry for a planet
/// wins.
fn planet_facts(value: &Value) -> BTreeMap<Planet, PlanetFact> {
  let mut facts = BTreeMap::new();
  let entries: Vec<(Option<Planet>, &Value)> = match value {
    Value::Array(items) => items
      .iter()
      .map(|item| {
        let planet = first_key(item, PLANET_ID_KEYS)
          .and_then(Value::as_str)
          .and_then(Planet::lookup);
        (planet, item)
      })
      .collect(),
    Value::Object(map) => map
      .iter()
      .map(|(name, item)| (Planet::lookup(name), item))
      .collect(),
    _ => Vec::new(),
  };

  for (planet, item) in entries {
    let (Some(planet), Some(record)) = (planet, item.as_object()) else {
      continue;
    };
    facts.entry(planet).or_insert_with(|| planet_fact(record));
  }
  facts
}

fn planet_fact(record: &Map<String, Value>) -> PlanetFact {
  let longitude = field(record, &["longitude", "lon", "degree"])
    .and_then(number)
    .filter(|l| l.is_finite());

  PlanetFact {
    house: field(record, &["house"]).and_then(house_number),
    sign: field(record, &["sign", "rasi", "rashi"])
      .and_then(sign)
      .or_else(|| longitude.map(Sign::from_longitude)),
    nakshatra: field(record, &["nakshatra"])
      .and_then(nakshatra_value)
      .or_else(|| longitude.map(Nakshatra::from_longitude)),
    pada: field(record, &["pada", "nakshatra_pada"])
      .and_then(nakshatra::canonicalize_pada)
      .or_else(|| longitude.map(nakshatra::pada_from_longitude)),
    strength: field(record, &["strength", "strength_score"]).and_then(|v| match v {
      Value::Object(o) => o.get("score").and_then(number),
      other => number(other),
    }),
    longitude,
  }
}

/// House signs from `{house, sign}` records, a map of house to record, or a
/// map of house to bare sign.
fn house_signs(value: &Value) -> BTreeMap<u8, Sign> {
  let mut houses = BTreeMap::new();
  let mut put = |house: Option<u8>, sign: Option<Sign>| {
    if let (Some(house), Some(sign)) = (house, sign) {
      houses.entry(house).or_insert(sign);
    }
  };

  match value {
    Value::Array(items) => {
      for item in items {
        put(
          first_key(item, HOUSE_ID_KEYS).and_then(house_number),
          item.get("sign").and_then(sign),
        );
      }
    }
    Value::Object(map) => {
      for (key, item) in map {
        let house = house_number(&Value::String(key.clone()));
        let sign_value = match item {
          Value::Object(record) => record.get("sign"),
          bare => Some(bare),
        };
        put(house, sign_value.and_then(sign));
      }
    }
    _ => {}
  }
  houses
}

// ─── Scalar coercion ─────────────────────────────────────────────────────────

fn field<'a>(record: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
  keys.iter().find_map(|k| record.get(*k))
}

fn first_key<'a>(item: &'a Value, keys: &[&str]) -> Option<&'a Value> {
  keys.iter().find_map(|k| item.get(*k))
}

fn number(value: &Value) -> Option<f64> {
  match value {
    Value::Number(n) => n.as_f64(),
    Value::String(s) => s.trim().parse().ok(),
    _ => None,
  }
}

/// A house number 1..=12, possibly nested as `{number}`.
fn house_number(value: &Value) -> Option<u8> {
  if let Value::Object(record) = value {
    return record.get("number").and_then(house_number);
  }
  let n = number(value)?;
  (n.fract() == 0.0 && (1.0..=12.0).contains(&n)).then_some(n as u8)
}

fn sign(value: &Value) -> Option<Sign> {
  match value {
    Value::Number(_) => {
      let n = number(value)?;
      (n.fract() == 0.0 && n >= 0.0).then(|| Sign::from_number(n as u64))?
    }
    Value::String(s) => Sign::lookup(s),
    Value::Object(_) => first_key(value, &["number", "name"]).and_then(sign),
    _ => None,
  }
}

fn nakshatra_value(value: &Value) -> Option<Nakshatra> {
  match value {
    Value::Object(_) => {
      first_key(value, &["name", "number", "index"]).and_then(nakshatra::canonicalize)
    }
    other => nakshatra::canonicalize(other),
  }
}
