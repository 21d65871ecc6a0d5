//! Rule evaluation for Phala.
//!
//! Normalises raw chart snapshots into [`ChartState`], evaluates authored
//! condition trees against them, scores matching rules and rolls the matches
//! up into ranked theme summaries. Everything is synchronous and pure except
//! [`RuleEngine::evaluate_from_store`], which awaits a
//! [`RuleStore`](phala_core::store::RuleStore) for its inputs.

pub mod aggregate;
pub mod chart;
pub mod config;
pub mod engine;
pub mod error;
pub mod evaluate;

pub use aggregate::aggregate;
pub use chart::{ChartState, PlanetFact};
pub use config::EngineConfig;
pub use engine::{RuleEngine, evaluate_rule, evaluate_rules};
pub use error::{Error, Result};
pub use evaluate::{Evaluator, evaluate};

#[cfg(test)]
mod tests;
