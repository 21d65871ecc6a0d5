//! Condition trees: the boolean expressions authored on each rule.
//!
//! Authors write trees as JSON: `{"all": [...]}`, `{"any": [...]}`, or a leaf
//! object with exactly one operator key mapped to its config. The JSON is
//! parsed once into [`ConditionNode`] so the evaluator matches exhaustively on
//! typed predicates instead of looking up operator strings.
//!
//! Parsing never fails. Input that cannot be a valid node (unknown operator,
//! multi-key leaf, missing config) becomes [`ConditionNode::Invalid`], which
//! evaluates false. A known operator whose config has the wrong shape becomes
//! [`ConditionNode::Malformed`], which the evaluator reports as an error.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{classify::NakshatraClass, dasha::DashaLevel};

// ─── Tree ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum ConditionNode {
  /// Conjunction; an empty list is vacuously true.
  All(Vec<ConditionNode>),
  /// Disjunction; an empty list is false.
  Any(Vec<ConditionNode>),
  Leaf(Predicate),
  /// Recognised operator, unusable config. Evaluating this is an error.
  Malformed {
    operator: String,
    reason:   String,
    config:   Value,
  },
  /// Not a valid node at all. Evaluates false.
  Invalid {
    kind: InvalidNode,
    raw:  Value,
  },
}

/// Why a node was rejected at parse time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidNode {
  NotAnObject,
  /// A leaf must carry exactly one operator key.
  KeyCount(usize),
  UnknownOperator(String),
  MissingConfig(String),
}

/// Which set of planet facts a predicate reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chart {
  Natal,
  Transit,
}

/// A typed leaf predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
  PlanetInHouse(Chart, PlanetInHouse),
  PlanetStrength(Chart, PlanetStrength),
  HouseLordInHouse(Chart, HouseLordInHouse),
  PlanetInNakshatra(Chart, PlanetInNakshatra),
  PlanetInNakshatraGroup(Chart, PlanetInNakshatraGroup),
  DashaRunning(DashaRunning),
  DashaLordInNakshatra(DashaLordInNakshatra),
  DashaLordInNakshatraGroup(DashaLordInNakshatraGroup),
  OverallBeneficScore(ScoreRange),
  OverallMaleficScore(ScoreRange),
  /// Always true; lets draft rules ship before their real condition exists.
  GenericCondition,
}

// ─── Leaf configs ────────────────────────────────────────────────────────────

/// How a planet-list leaf turns per-planet matches into a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
  /// At least `min_planets` of the listed planets must match.
  #[default]
  Any,
  /// Every listed planet must match.
  All,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetInHouse {
  #[serde(alias = "planets")]
  pub planet_in:   Vec<String>,
  #[serde(alias = "houses")]
  pub house_in:    Vec<u8>,
  #[serde(default)]
  pub match_mode:  MatchMode,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub min_planets: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetStrength {
  pub planet: String,
  #[serde(flatten)]
  pub range:  ScoreRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseLordInHouse {
  pub house:    u8,
  #[serde(alias = "houses")]
  pub house_in: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetInNakshatra {
  #[serde(alias = "planets")]
  pub planet_in:    Vec<String>,
  /// Names, aliases or 1..27 numbers; canonicalised at evaluation.
  #[serde(alias = "nakshatras")]
  pub nakshatra_in: Vec<Value>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub pada_in:      Option<Vec<Value>>,
  #[serde(default)]
  pub match_mode:   MatchMode,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub min_planets:  Option<usize>,
}

/// The classes a nakshatra-group leaf accepts, given as a list, a single
/// class, or both.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GroupSelector {
  pub context:  String,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub group_in: Vec<NakshatraClass>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub group:    Option<NakshatraClass>,
}

impl GroupSelector {
  pub fn accepts(&self, class: NakshatraClass) -> bool {
    self.group == Some(class) || self.group_in.contains(&class)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetInNakshatraGroup {
  #[serde(alias = "planets")]
  pub planet_in:   Vec<String>,
  #[serde(flatten)]
  pub selector:    GroupSelector,
  #[serde(default)]
  pub match_mode:  MatchMode,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub min_planets: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashaRunning {
  pub level:     DashaLevel,
  #[serde(alias = "planets", alias = "lords")]
  pub planet_in: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashaLordInNakshatra {
  pub level:        DashaLevel,
  #[serde(alias = "nakshatras")]
  pub nakshatra_in: Vec<Value>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub pada_in:      Option<Vec<Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashaLordInNakshatraGroup {
  pub level:    DashaLevel,
  #[serde(flatten)]
  pub selector: GroupSelector,
}

/// Inclusive numeric range; an absent bound is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreRange {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub min: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub max: Option<f64>,
}

impl ScoreRange {
  pub fn contains(&self, value: f64) -> bool {
    value.is_finite()
      && self.min.is_none_or(|min| value >= min)
      && self.max.is_none_or(|max| value <= max)
  }
}

// ─── Parsing ─────────────────────────────────────────────────────────────────

impl ConditionNode {
  /// Parse an authored JSON tree. Never fails; see the module docs.
  pub fn parse(value: &Value) -> Self {
    let Value::Object(map) = value else {
      return Self::invalid(InvalidNode::NotAnObject, value);
    };

    if let Some(Value::Array(children)) = map.get("all") {
      return Self::All(children.iter().map(Self::parse).collect());
    }
    if let Some(Value::Array(children)) = map.get("any") {
      return Self::Any(children.iter().map(Self::parse).collect());
    }

    if map.len() != 1 {
      return Self::invalid(InvalidNode::KeyCount(map.len()), value);
    }
    let Some((operator, config)) = map.iter().next() else {
      return Self::invalid(InvalidNode::KeyCount(0), value);
    };
    parse_leaf(operator, config, value)
  }

  fn invalid(kind: InvalidNode, raw: &Value) -> Self {
    Self::Invalid {
      kind,
      raw: raw.clone(),
    }
  }
}

fn parse_leaf(operator: &str, config: &Value, raw: &Value) -> ConditionNode {
  use Chart::{Natal, Transit};

  if !is_known_operator(operator) {
    return ConditionNode::invalid(
      InvalidNode::UnknownOperator(operator.to_string()),
      raw,
    );
  }
  if config.is_null() {
    return ConditionNode::invalid(
      InvalidNode::MissingConfig(operator.to_string()),
      raw,
    );
  }

  let parsed = match operator {
    "planet_in_house" => typed(config).map(|c| Predicate::PlanetInHouse(Natal, c)),
    "transit_planet_in_house" => {
      typed(config).map(|c| Predicate::PlanetInHouse(Transit, c))
    }
    "planet_strength" => typed(config).map(|c| Predicate::PlanetStrength(Natal, c)),
    "transit_planet_strength" => {
      typed(config).map(|c| Predicate::PlanetStrength(Transit, c))
    }
    "house_lord_in_house" => {
      typed(config).map(|c| Predicate::HouseLordInHouse(Natal, c))
    }
    "transit_house_lord_in_house" => {
      typed(config).map(|c| Predicate::HouseLordInHouse(Transit, c))
    }
    "planet_in_nakshatra" => {
      typed(config).map(|c| Predicate::PlanetInNakshatra(Natal, c))
    }
    "transit_planet_in_nakshatra" => {
      typed(config).map(|c| Predicate::PlanetInNakshatra(Transit, c))
    }
    "planet_in_nakshatra_group" => {
      typed(config).map(|c| Predicate::PlanetInNakshatraGroup(Natal, c))
    }
    "transit_planet_in_nakshatra_group" => {
      typed(config).map(|c| Predicate::PlanetInNakshatraGroup(Transit, c))
    }
    "dasha_running" => typed(config).map(Predicate::DashaRunning),
    "dasha_lord_in_nakshatra" => typed(config).map(Predicate::DashaLordInNakshatra),
    "dasha_lord_in_nakshatra_group" => {
      typed(config).map(Predicate::DashaLordInNakshatraGroup)
    }
    "overall_benefic_score" => typed(config).map(Predicate::OverallBeneficScore),
    "overall_malefic_score" => typed(config).map(Predicate::OverallMaleficScore),
    "generic_condition" => Ok(Predicate::GenericCondition),
    _ => {
      return ConditionNode::invalid(
        InvalidNode::UnknownOperator(operator.to_string()),
        raw,
      );
    }
  };

  match parsed {
    Ok(predicate) => ConditionNode::Leaf(predicate),
    Err(e) => ConditionNode::Malformed {
      operator: operator.to_string(),
      reason:   e.to_string(),
      config:   config.clone(),
    },
  }
}

fn typed<T: serde::de::DeserializeOwned>(config: &Value) -> serde_json::Result<T> {
  T::deserialize(config)
}

/// Every operator name the evaluator understands.
pub const OPERATORS: &[&str] = &[
  "planet_in_house",
  "transit_planet_in_house",
  "planet_strength",
  "transit_planet_strength",
  "house_lord_in_house",
  "transit_house_lord_in_house",
  "planet_in_nakshatra",
  "transit_planet_in_nakshatra",
  "planet_in_nakshatra_group",
  "transit_planet_in_nakshatra_group",
  "dasha_running",
  "dasha_lord_in_nakshatra",
  "dasha_lord_in_nakshatra_group",
  "overall_benefic_score",
  "overall_malefic_score",
  "generic_condition",
];

fn is_known_operator(operator: &str) -> bool { OPERATORS.contains(&operator) }

impl From<Value> for ConditionNode {
  fn from(value: Value) -> Self { Self::parse(&value) }
}

// ─── Serialisation back to authored JSON ─────────────────────────────────────

impl Predicate {
  /// The operator key this predicate is authored under.
  pub fn operator(&self) -> &'static str {
    use Chart::{Natal, Transit};
    match self {
      Self::PlanetInHouse(Natal, _) => "planet_in_house",
      Self::PlanetInHouse(Transit, _) => "transit_planet_in_house",
      Self::PlanetStrength(Natal, _) => "planet_strength",
      Self::PlanetStrength(Transit, _) => "transit_planet_strength",
      Self::HouseLordInHouse(Natal, _) => "house_lord_in_house",
      Self::HouseLordInHouse(Transit, _) => "transit_house_lord_in_house",
      Self::PlanetInNakshatra(Natal, _) => "planet_in_nakshatra",
      Self::PlanetInNakshatra(Transit, _) => "transit_planet_in_nakshatra",
      Self::PlanetInNakshatraGroup(Natal, _) => "planet_in_nakshatra_group",
      Self::PlanetInNakshatraGroup(Transit, _) => {
        "transit_planet_in_nakshatra_group"
      }
      Self::DashaRunning(_) => "dasha_running",
      Self::DashaLordInNakshatra(_) => "dasha_lord_in_nakshatra",
      Self::DashaLordInNakshatraGroup(_) => "dasha_lord_in_nakshatra_group",
      Self::OverallBeneficScore(_) => "overall_benefic_score",
      Self::OverallMaleficScore(_) => "overall_malefic_score",
      Self::GenericCondition => "generic_condition",
    }
  }

  fn config_json(&self) -> serde_json::Result<Value> {
    match self {
      Self::PlanetInHouse(_, c) => serde_json::to_value(c),
      Self::PlanetStrength(_, c) => serde_json::to_value(c),
      Self::HouseLordInHouse(_, c) => serde_json::to_value(c),
      Self::PlanetInNakshatra(_, c) => serde_json::to_value(c),
      Self::PlanetInNakshatraGroup(_, c) => serde_json::to_value(c),
      Self::DashaRunning(c) => serde_json::to_value(c),
      Self::DashaLordInNakshatra(c) => serde_json::to_value(c),
      Self::DashaLordInNakshatraGroup(c) => serde_json::to_value(c),
      Self::OverallBeneficScore(c) | Self::OverallMaleficScore(c) => {
        serde_json::to_value(c)
      }
      Self::GenericCondition => Ok(Value::Object(Map::new())),
    }
  }
}

impl ConditionNode {
  /// The authored JSON form of this tree. Invalid nodes give back their raw
  /// input and malformed leaves their original config.
  pub fn to_json(&self) -> serde_json::Result<Value> {
    let mut map = Map::new();
    match self {
      Self::All(children) => {
        map.insert("all".into(), Value::Array(to_json_all(children)?));
      }
      Self::Any(children) => {
        map.insert("any".into(), Value::Array(to_json_all(children)?));
      }
      Self::Leaf(predicate) => {
        map.insert(predicate.operator().into(), predicate.config_json()?);
      }
      Self::Malformed {
        operator, config, ..
      } => {
        map.insert(operator.clone(), config.clone());
      }
      Self::Invalid { raw, .. } => return Ok(raw.clone()),
    }
    Ok(Value::Object(map))
  }
}

fn to_json_all(children: &[ConditionNode]) -> serde_json::Result<Vec<Value>> {
  children.iter().map(ConditionNode::to_json).collect()
}

impl Serialize for ConditionNode {
  fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    self
      .to_json()
      .map_err(serde::ser::Error::custom)?
      .serialize(serializer)
  }
}
