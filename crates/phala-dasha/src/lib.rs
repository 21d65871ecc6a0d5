//! Hierarchical planetary-period (Vimshottari dasha) calculator.
//!
//! Given a birth instant and the Moon's sidereal longitude at birth, this
//! crate partitions time into consecutive major periods (Mahadashas), splits
//! any period into nine proportional sub-periods on demand, and answers which
//! ruler is running at a given instant on each of the three levels.
//!
//! Everything here is pure and synchronous. Bad input (a non-finite
//! longitude, an empty range, a date past the calendar's end) is an error
//! rather than a silently wrong partition.

pub mod calendar;
pub mod error;
pub mod lookup;
pub mod period;
pub mod subperiod;
pub mod vimshottari;

pub use error::{Error, Result};
pub use lookup::state_at;
pub use period::{DashaPeriod, DashaState, MahadashaNode};
pub use phala_core::dasha::DashaLevel;
pub use subperiod::generate_sub_periods;
pub use vimshottari::{
  BirthBalance, Mahadashas, birth_balance, generate_periods, hierarchy,
  mahadashas,
};
