//! The rule engine: filtering, scoring and aggregation around the evaluator.

use chrono::{DateTime, Utc};
use phala_core::{
  dasha::DashaLevel,
  rule::{EvaluatedRule, Rule, Scope},
  store::RuleStore,
  summary::ThemeSummary,
};
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::{ChartState, EngineConfig, Error, Evaluator, Result, aggregate};

#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
  config:    EngineConfig,
  evaluator: Evaluator,
}

impl RuleEngine {
  pub fn new(config: EngineConfig) -> Self {
    Self {
      evaluator: Evaluator::new(config.default_min_planets),
      config,
    }
  }

  pub fn config(&self) -> &EngineConfig { &self.config }

  /// Score one rule against a normalised state.
  ///
  /// `None` when the rule is inactive, outside `scope`, pending an operator,
  /// has no tree, does not match, or its tree fails to evaluate. A failing
  /// tree is logged and otherwise treated as a non-match.
  pub fn evaluate_rule(
    &self,
    rule: &Rule,
    state: &ChartState,
    scope: Option<Scope>,
  ) -> Option<EvaluatedRule> {
    if !rule.is_active {
      debug!(rule_id = %rule.id, "skipping inactive rule");
      return None;
    }
    if !rule.applies_to(scope) {
      debug!(rule_id = %rule.id, ?scope, "skipping out-of-scope rule");
      return None;
    }
    if rule.is_pending() {
      debug!(rule_id = %rule.id, "skipping rule pending an operator");
      return None;
    }
    let Some(tree) = &rule.condition_tree else {
      debug!(rule_id = %rule.id, "skipping rule without a condition tree");
      return None;
    };

    match self.evaluator.evaluate(tree, state) {
      Ok(true) => Some(EvaluatedRule::from_rule(rule)),
      Ok(false) => {
        trace!(rule_id = %rule.id, "condition did not match");
        None
      }
      Err(error) => {
        warn!(rule_id = %rule.id, %error, "rule evaluation failed; treating as no match");
        None
      }
    }
  }

  /// Score every rule against an already-normalised state, in input order.
  pub fn evaluate_state(
    &self,
    rules: &[Rule],
    state: &ChartState,
    scope: Option<Scope>,
  ) -> Vec<EvaluatedRule> {
    rules
      .iter()
      .filter_map(|rule| self.evaluate_rule(rule, state, scope))
      .collect()
  }

  /// Normalise `snapshot` and score every rule against it.
  pub fn evaluate(
    &self,
    rules: &[Rule],
    snapshot: &Value,
    scope: Option<Scope>,
  ) -> Vec<EvaluatedRule> {
    let state = ChartState::from_snapshot(snapshot);
    self.evaluate_state(rules, &state, scope)
  }

  /// Like [`evaluate`](Self::evaluate), but with the current dasha rulers
  /// computed for `at` from the birth data instead of read from the
  /// snapshot. Before the birth date no ruler is running. Dasha errors are
  /// fatal.
  pub fn evaluate_at(
    &self,
    rules: &[Rule],
    snapshot: &Value,
    birth: DateTime<Utc>,
    longitude: f64,
    at: DateTime<Utc>,
    scope: Option<Scope>,
  ) -> Result<Vec<EvaluatedRule>> {
    let mut state = ChartState::from_snapshot(snapshot);
    match phala_dasha::state_at(birth, longitude, at)? {
      Some(dasha) => state = state.with_dasha_state(&dasha),
      None => {
        for level in [
          DashaLevel::Mahadasha,
          DashaLevel::Antardasha,
          DashaLevel::Pratyantardasha,
        ] {
          state.raw.remove(level.raw_field());
        }
      }
    }
    Ok(self.evaluate_state(rules, &state, scope))
  }

  pub fn aggregate(&self, evaluated: &[EvaluatedRule]) -> Vec<ThemeSummary> {
    aggregate::aggregate(evaluated, &self.config.thresholds)
  }

  /// Fetch a snapshot and the rules for `scope` from `store`, then evaluate.
  /// Store failures and a missing snapshot are errors; rule failures are not.
  pub async fn evaluate_from_store<S: RuleStore>(
    &self,
    store: &S,
    snapshot_id: &str,
    scope: Option<Scope>,
  ) -> Result<Vec<EvaluatedRule>> {
    let snapshot = store
      .snapshot(snapshot_id)
      .await
      .map_err(|e| Error::Store(Box::new(e)))?
      .ok_or_else(|| Error::SnapshotNotFound(snapshot_id.to_string()))?;
    let rules = store
      .rules_for_scope(scope)
      .await
      .map_err(|e| Error::Store(Box::new(e)))?;

    debug!(snapshot_id, rules = rules.len(), ?scope, "evaluating stored rules");
    Ok(self.evaluate(&rules, &snapshot, scope))
  }
}

// ─── Free functions with default configuration ──────────────────────────────

pub fn evaluate_rule(
  rule: &Rule,
  state: &ChartState,
  scope: Option<Scope>,
) -> Option<EvaluatedRule> {
  RuleEngine::default().evaluate_rule(rule, state, scope)
}

pub fn evaluate_rules(
  rules: &[Rule],
  snapshot: &Value,
  scope: Option<Scope>,
) -> Vec<EvaluatedRule> {
  RuleEngine::default().evaluate(rules, snapshot, scope)
}
