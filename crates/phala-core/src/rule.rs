//! Authored rules and the records produced when one matches.
//!
//! Rules are supplied wholesale by the caller and treated as immutable for
//! the duration of an evaluation. An [`EvaluatedRule`] is created fresh for
//! each match and never mutated afterwards.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::condition::ConditionNode;

// ─── Scope & status ──────────────────────────────────────────────────────────

/// Time granularity a rule is written for.
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Scope {
  Daily,
  Weekly,
  Monthly,
  Yearly,
  Life,
  /// Any scope tag this engine does not know. Stored rules carrying one
  /// still load; requesting it only admits rules with no scopes.
  #[serde(other)]
  Other,
}

/// Whether the engine can score a rule yet.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EngineStatus {
  #[default]
  Ready,
  /// Authored against an operator the engine does not implement yet. Never
  /// scored.
  PendingOperator,
}

// ─── Rule ────────────────────────────────────────────────────────────────────

/// What a rule asserts when its condition holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleEffect {
  pub theme:     String,
  pub area:      String,
  pub trend:     String,
  pub tone:      String,
  /// Nominally in `[0, 1]`; clamped when scoring.
  #[serde(default)]
  pub intensity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
  pub id:                String,
  #[serde(default)]
  pub condition_tree:    Option<ConditionNode>,
  pub effect:            RuleEffect,
  /// Empty means the rule applies to every scope.
  #[serde(default)]
  pub applicable_scopes: BTreeSet<Scope>,
  #[serde(default = "default_true")]
  pub is_active:         bool,
  #[serde(default)]
  pub engine_status:     Option<EngineStatus>,
  #[serde(default = "default_weight")]
  pub base_weight:       f64,
  #[serde(default)]
  pub point_code:        Option<String>,
}

fn default_true() -> bool { true }

fn default_weight() -> f64 { 1.0 }

impl Rule {
  /// `clamp01(intensity) * max(0, base_weight)`. Non-finite inputs score 0.
  pub fn score(&self) -> f64 {
    let intensity = if self.effect.intensity.is_finite() {
      self.effect.intensity.clamp(0.0, 1.0)
    } else {
      0.0
    };
    let weight = if self.base_weight.is_finite() {
      self.base_weight.max(0.0)
    } else {
      0.0
    };
    intensity * weight
  }

  /// Whether the rule should be considered for `scope`. A `None` scope or an
  /// empty scope set admits everything. [`Scope::Other`] never matches a
  /// rule's own unknown tags.
  pub fn applies_to(&self, scope: Option<Scope>) -> bool {
    match scope {
      Some(Scope::Other) => self.applicable_scopes.is_empty(),
      Some(scope) => {
        self.applicable_scopes.is_empty()
          || self.applicable_scopes.contains(&scope)
      }
      None => true,
    }
  }

  pub fn is_pending(&self) -> bool {
    self.engine_status == Some(EngineStatus::PendingOperator)
  }
}

// ─── Evaluated ───────────────────────────────────────────────────────────────

/// A rule whose condition matched a chart state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedRule {
  pub rule_id:    String,
  pub point_code: Option<String>,
  pub theme:      String,
  pub area:       String,
  pub trend:      String,
  pub tone:       String,
  pub score:      f64,
  pub effect:     RuleEffect,
}

impl EvaluatedRule {
  pub fn from_rule(rule: &Rule) -> Self {
    Self {
      rule_id:    rule.id.clone(),
      point_code: rule.point_code.clone(),
      theme:      rule.effect.theme.clone(),
      area:       rule.effect.area.clone(),
      trend:      rule.effect.trend.clone(),
      tone:       rule.effect.tone.clone(),
      score:      rule.score(),
      effect:     rule.effect.clone(),
    }
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn rule(intensity: f64, base_weight: f64) -> Rule {
    Rule {
      id: "r1".into(),
      condition_tree: None,
      effect: RuleEffect {
        theme: "career".into(),
        area: "growth".into(),
        trend: "up".into(),
        tone: "positive".into(),
        intensity,
      },
      applicable_scopes: BTreeSet::new(),
      is_active: true,
      engine_status: None,
      base_weight,
      point_code: None,
    }
  }

  #[test]
  fn score_clamps_inputs() {
    assert_eq!(rule(0.5, 2.0).score(), 1.0);
    assert_eq!(rule(1.7, 2.0).score(), 2.0);
    assert_eq!(rule(-0.3, 2.0).score(), 0.0);
    assert_eq!(rule(0.5, -4.0).score(), 0.0);
    assert_eq!(rule(f64::NAN, 1.0).score(), 0.0);
    assert_eq!(rule(1.0, f64::INFINITY).score(), 0.0);
  }

  #[test]
  fn scope_filter() {
    let mut r = rule(1.0, 1.0);
    assert!(r.applies_to(Some(Scope::Daily)));
    r.applicable_scopes.insert(Scope::Yearly);
    assert!(!r.applies_to(Some(Scope::Daily)));
    assert!(r.applies_to(Some(Scope::Yearly)));
    assert!(r.applies_to(None));
  }

  #[test]
  fn deserializes_with_defaults() {
    let r: Rule = serde_json::from_value(json!({
      "id": "career-01",
      "condition_tree": { "generic_condition": {} },
      "effect": {
        "theme": "career", "area": "growth",
        "trend": "up", "tone": "positive", "intensity": 0.8
      },
      "applicable_scopes": ["daily", "yearly"],
      "engine_status": "PENDING_OPERATOR"
    }))
    .unwrap();
    assert!(r.is_active);
    assert_eq!(r.base_weight, 1.0);
    assert!(r.is_pending());
    assert_eq!(r.applicable_scopes.len(), 2);
    assert!(r.condition_tree.is_some());
  }

  #[test]
  fn unknown_scope_tags_still_load() {
    let rules: Vec<Rule> = serde_json::from_value(json!([
      {
        "id": "quarterly",
        "effect": { "theme": "t", "area": "a", "trend": "up", "tone": "positive" },
        "applicable_scopes": ["quarterly", "daily"]
      },
      {
        "id": "plain",
        "effect": { "theme": "t", "area": "a", "trend": "up", "tone": "positive" }
      }
    ]))
    .unwrap();
    assert_eq!(rules.len(), 2);

    let quarterly = &rules[0];
    assert!(quarterly.applicable_scopes.contains(&Scope::Other));
    assert!(quarterly.applies_to(Some(Scope::Daily)));
    assert!(!quarterly.applies_to(Some(Scope::Yearly)));
    assert!(!quarterly.applies_to(Some(Scope::Other)));
    assert!(rules[1].applies_to(Some(Scope::Other)));
  }
}
