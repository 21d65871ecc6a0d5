//! Condition-tree evaluation against a normalised chart.

use phala_core::{
  classify,
  condition::{
    Chart, ConditionNode, GroupSelector, MatchMode, Predicate, ScoreRange,
  },
  dasha::DashaLevel,
  nakshatra::{self, Nakshatra},
  planet::Planet,
};
use serde_json::Value;
use tracing::trace;

use crate::{ChartState, Error, PlanetFact, Result};

/// Evaluates condition trees. Holds the one tunable the leaves need: the
/// default `min_planets` for `any`-mode planet lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluator {
  default_min_planets: usize,
}

impl Default for Evaluator {
  fn default() -> Self { Self::new(1) }
}

/// Evaluate with default settings.
pub fn evaluate(node: &ConditionNode, state: &ChartState) -> Result<bool> {
  Evaluator::default().evaluate(node, state)
}

impl Evaluator {
  pub fn new(default_min_planets: usize) -> Self {
    Self {
      default_min_planets: default_min_planets.max(1),
    }
  }

  /// `all` short-circuits left to right and is true when empty; `any` is
  /// false when empty. Invalid nodes are false. Only a malformed leaf config
  /// is an error.
  pub fn evaluate(&self, node: &ConditionNode, state: &ChartState) -> Result<bool> {
    match node {
      ConditionNode::All(children) => {
        for child in children {
          if !self.evaluate(child, state)? {
            return Ok(false);
          }
        }
        Ok(true)
      }
      ConditionNode::Any(children) => {
        for child in children {
          if self.evaluate(child, state)? {
            return Ok(true);
          }
        }
        Ok(false)
      }
      ConditionNode::Leaf(predicate) => Ok(self.predicate(predicate, state)),
      ConditionNode::Malformed {
        operator, reason, ..
      } => Err(Error::MalformedPredicate {
        operator: operator.clone(),
        reason:   reason.clone(),
      }),
      ConditionNode::Invalid { kind, .. } => {
        trace!(?kind, "invalid condition node evaluates false");
        Ok(false)
      }
    }
  }

  fn predicate(&self, predicate: &Predicate, state: &ChartState) -> bool {
    match predicate {
      Predicate::PlanetInHouse(chart, c) => {
        self.count_planets(&c.planet_in, c.match_mode, c.min_planets, |p| {
          state
            .fact(*chart, p)
            .and_then(|f| f.house)
            .is_some_and(|h| c.house_in.contains(&h))
        })
      }
      Predicate::PlanetStrength(chart, c) => Planet::lookup(&c.planet)
        .and_then(|p| state.fact(*chart, p))
        .and_then(|f| f.strength)
        .is_some_and(|s| c.range.contains(s)),
      Predicate::HouseLordInHouse(chart, c) => state
        .house_lord(c.house)
        .and_then(|lord| state.fact(*chart, lord))
        .and_then(|f| f.house)
        .is_some_and(|h| c.house_in.contains(&h)),
      Predicate::PlanetInNakshatra(chart, c) => {
        let targets = NakshatraTargets::new(&c.nakshatra_in, c.pada_in.as_deref());
        self.count_planets(&c.planet_in, c.match_mode, c.min_planets, |p| {
          state.fact(*chart, p).is_some_and(|f| targets.matches(f))
        })
      }
      Predicate::PlanetInNakshatraGroup(chart, c) => {
        self.count_planets(&c.planet_in, c.match_mode, c.min_planets, |p| {
          state
            .fact(*chart, p)
            .is_some_and(|f| in_group(f, &c.selector))
        })
      }
      Predicate::DashaRunning(c) => {
        state.current_ruler(c.level).is_some_and(|ruler| {
          c.planet_in.iter().any(|p| Planet::lookup(p) == Some(ruler))
        })
      }
      Predicate::DashaLordInNakshatra(c) => {
        let targets = NakshatraTargets::new(&c.nakshatra_in, c.pada_in.as_deref());
        dasha_lord_fact(state, c.level).is_some_and(|f| targets.matches(f))
      }
      Predicate::DashaLordInNakshatraGroup(c) => {
        dasha_lord_fact(state, c.level).is_some_and(|f| in_group(f, &c.selector))
      }
      Predicate::OverallBeneficScore(range) => {
        raw_in_range(state, "overall_benefic_score", range)
      }
      Predicate::OverallMaleficScore(range) => {
        raw_in_range(state, "overall_malefic_score", range)
      }
      Predicate::GenericCondition => true,
    }
  }

  /// The threshold rule shared by every planet-list leaf. An empty list never
  /// matches. `all` needs every listed planet; `any` needs at least
  /// `min_planets` (at least 1, at most the list length). Unrecognised
  /// planet names count as non-matching.
  fn count_planets(
    &self,
    names: &[String],
    mode: MatchMode,
    min_planets: Option<usize>,
    matches: impl Fn(Planet) -> bool,
  ) -> bool {
    if names.is_empty() {
      return false;
    }
    let matched = names
      .iter()
      .filter(|name| Planet::lookup(name).is_some_and(&matches))
      .count();

    match mode {
      MatchMode::All => matched == names.len(),
      MatchMode::Any => {
        let needed = min_planets
          .unwrap_or(self.default_min_planets)
          .max(1)
          .min(names.len());
        matched >= needed
      }
    }
  }
}

// ─── Leaf helpers ────────────────────────────────────────────────────────────

/// Canonicalised nakshatra (and optional pada) targets of a leaf. Entries
/// that do not canonicalise are dropped.
struct NakshatraTargets {
  nakshatras: Vec<Nakshatra>,
  padas:      Option<Vec<u8>>,
}

impl NakshatraTargets {
  fn new(nakshatra_in: &[Value], pada_in: Option<&[Value]>) -> Self {
    Self {
      nakshatras: nakshatra_in
        .iter()
        .filter_map(nakshatra::canonicalize)
        .collect(),
      padas:      pada_in.map(|padas| {
        padas
          .iter()
          .filter_map(nakshatra::canonicalize_pada)
          .collect()
      }),
    }
  }

  fn matches(&self, fact: &PlanetFact) -> bool {
    let Some(n) = fact.nakshatra else {
      return false;
    };
    if !self.nakshatras.contains(&n) {
      return false;
    }
    match &self.padas {
      Some(padas) => fact.pada.is_some_and(|p| padas.contains(&p)),
      None => true,
    }
  }
}

fn in_group(fact: &PlanetFact, selector: &GroupSelector) -> bool {
  fact
    .nakshatra
    .is_some_and(|n| selector.accepts(classify::classify(&selector.context, n)))
}

/// Natal fact of the ruler currently running at `level`.
fn dasha_lord_fact(state: &ChartState, level: DashaLevel) -> Option<&PlanetFact> {
  state
    .current_ruler(level)
    .and_then(|ruler| state.fact(Chart::Natal, ruler))
}

fn raw_in_range(state: &ChartState, key: &str, range: &ScoreRange) -> bool {
  state.raw_number(key).is_some_and(|v| range.contains(v))
}
