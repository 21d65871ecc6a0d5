//! The `RuleStore` trait.
//!
//! Persistence of rules and chart snapshots lives outside this workspace.
//! Callers that want the engine to fetch its own inputs implement this trait
//! over whatever backend they have; the engine itself only ever sees plain
//! values.

use std::future::Future;

use serde_json::Value;

use crate::rule::{Rule, Scope};

/// Read-only source of rules and chart snapshots.
///
/// All methods return `Send` futures so the trait can be driven from a
/// multi-threaded tokio runtime.
pub trait RuleStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Rules relevant to `scope`. Backends may pre-filter; the engine applies
  /// its own scope filter regardless. `None` requests every rule.
  fn rules_for_scope(
    &self,
    scope: Option<Scope>,
  ) -> impl Future<Output = Result<Vec<Rule>, Self::Error>> + Send + '_;

  /// The raw snapshot record with the given id, or `None` if absent.
  fn snapshot<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Value>, Self::Error>> + Send + 'a;
}
