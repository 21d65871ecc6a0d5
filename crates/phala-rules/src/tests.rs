//! End-to-end scenarios: snapshot in, summaries out.

use std::{collections::HashMap, future::Future};

use phala_core::{
  rule::{Rule, Scope},
  store::RuleStore,
  summary::ScoreLevel,
};
use serde_json::{Value, json};

use crate::{ChartState, Error, RuleEngine, evaluate_rule, evaluate_rules};

fn rule(value: Value) -> Rule { serde_json::from_value(value).unwrap() }

fn jupiter_rule() -> Rule {
  rule(json!({
    "id": "jupiter-wealth",
    "condition_tree": {
      "planet_in_house": { "planet_in": ["JUPITER"], "house_in": [2, 11] }
    },
    "effect": {
      "theme": "wealth", "area": "income",
      "trend": "rising", "tone": "positive", "intensity": 0.9
    },
    "applicable_scopes": ["yearly", "life"],
    "point_code": "WEALTH_JUP_2_11"
  }))
}

fn snapshot(jupiter_house: u8) -> Value {
  json!({
    "planets_state": [
      { "name": "JUPITER", "house": jupiter_house, "nakshatra": "Punarvasu" },
      { "name": "SATURN", "house": 10, "strength": 0.65 }
    ],
    "current_mahadasha": "JUPITER",
    "overall_benefic_score": 7.2
  })
}

// ─── Scenarios ───────────────────────────────────────────────────────────────

#[test]
fn jupiter_in_second_house_matches() {
  let hits = evaluate_rules(&[jupiter_rule()], &snapshot(2), Some(Scope::Yearly));
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].point_code.as_deref(), Some("WEALTH_JUP_2_11"));
  assert!((hits[0].score - 0.9).abs() < 1e-12);
}

#[test]
fn jupiter_in_fifth_house_does_not_match() {
  assert!(evaluate_rules(&[jupiter_rule()], &snapshot(5), Some(Scope::Yearly)).is_empty());
}

#[test]
fn scope_outside_rule_is_filtered() {
  assert!(evaluate_rules(&[jupiter_rule()], &snapshot(2), Some(Scope::Daily)).is_empty());
}

#[test]
fn evaluation_is_idempotent() {
  let state = ChartState::from_snapshot(&snapshot(11));
  let rule = jupiter_rule();
  let first = evaluate_rule(&rule, &state, Some(Scope::Life));
  let second = evaluate_rule(&rule, &state, Some(Scope::Life));
  assert!(first.is_some());
  assert_eq!(first, second);
}

#[test]
fn career_growth_aggregates_to_high() {
  let effect = |tone: &str, intensity: f64| {
    json!({
      "theme": "career", "area": "growth",
      "trend": "up", "tone": tone, "intensity": intensity
    })
  };
  let rules = vec![
    rule(json!({
      "id": "strong",
      "condition_tree": { "generic_condition": {} },
      "effect": effect("positive", 1.0),
      "base_weight": 2.0
    })),
    rule(json!({
      "id": "weak",
      "condition_tree": { "generic_condition": {} },
      "effect": effect("challenging", 1.0),
      "base_weight": 1.0
    })),
  ];

  let engine = RuleEngine::default();
  let summaries = engine.aggregate(&engine.evaluate(&rules, &json!({}), None));
  assert_eq!(summaries.len(), 1);
  assert_eq!(summaries[0].rank, 1);

  let growth = summaries[0].area("growth").unwrap();
  assert_eq!(growth.score, 3.0);
  assert_eq!(growth.level, ScoreLevel::High);
  assert_eq!(growth.tone, "positive");
}

#[test]
fn mixed_tree_over_a_full_snapshot() {
  let r = rule(json!({
    "id": "expansion",
    "condition_tree": {
      "all": [
        { "dasha_running": { "level": "mahadasha", "planet_in": ["GURU"] } },
        { "any": [
          { "planet_strength": { "planet": "SATURN", "min": 0.9 } },
          { "overall_benefic_score": { "min": 7.0 } }
        ]},
        { "planet_in_nakshatra_group": {
          "planet_in": ["JUPITER"], "context": "travel", "group": "supportive"
        }}
      ]
    },
    "effect": {
      "theme": "travel", "area": "abroad",
      "trend": "opening", "tone": "positive", "intensity": 0.7
    }
  }));
  assert_eq!(evaluate_rules(&[r], &snapshot(9), None).len(), 1);
}

// ─── Store-driven evaluation ─────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("backend offline")]
struct Offline;

#[derive(Default)]
struct MemoryStore {
  rules:     Vec<Rule>,
  snapshots: HashMap<String, Value>,
  offline:   bool,
}

impl RuleStore for MemoryStore {
  type Error = Offline;

  fn rules_for_scope(
    &self,
    scope: Option<Scope>,
  ) -> impl Future<Output = Result<Vec<Rule>, Self::Error>> + Send + '_ {
    async move {
      if self.offline {
        return Err(Offline);
      }
      Ok(
        self
          .rules
          .iter()
          .filter(|r| r.applies_to(scope))
          .cloned()
          .collect(),
      )
    }
  }

  fn snapshot<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Value>, Self::Error>> + Send + 'a {
    async move {
      if self.offline {
        return Err(Offline);
      }
      Ok(self.snapshots.get(id).cloned())
    }
  }
}

fn memory_store() -> MemoryStore {
  MemoryStore {
    rules: vec![jupiter_rule()],
    snapshots: HashMap::from([
      ("chart-2".to_string(), snapshot(2)),
      ("chart-5".to_string(), snapshot(5)),
    ]),
    offline: false,
  }
}

#[tokio::test]
async fn evaluates_rules_from_store() {
  let store = memory_store();
  let engine = RuleEngine::default();

  let hits = engine
    .evaluate_from_store(&store, "chart-2", Some(Scope::Life))
    .await
    .unwrap();
  assert_eq!(hits.len(), 1);

  let misses = engine
    .evaluate_from_store(&store, "chart-5", Some(Scope::Life))
    .await
    .unwrap();
  assert!(misses.is_empty());
}

#[tokio::test]
async fn missing_snapshot_is_an_error() {
  let err = RuleEngine::default()
    .evaluate_from_store(&memory_store(), "nope", None)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::SnapshotNotFound(id) if id == "nope"));
}

#[tokio::test]
async fn store_failure_propagates() {
  let store = MemoryStore {
    offline: true,
    ..MemoryStore::default()
  };
  let err = RuleEngine::default()
    .evaluate_from_store(&store, "chart-2", None)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Store(_)));
}
