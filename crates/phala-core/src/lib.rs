//! Core vocabulary for the Phala rule engine.
//!
//! Planets, signs, nakshatras, rules and their evaluated results. This crate
//! is pure data plus static lookup tables; it has no I/O, no async runtime,
//! and only a trait describing where rules and snapshots come from.

pub mod classify;
pub mod condition;
pub mod dasha;
pub mod error;
pub mod nakshatra;
pub mod planet;
pub mod rule;
pub mod store;
pub mod summary;

pub use error::{Error, Result};
