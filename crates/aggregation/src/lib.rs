//! Monthly revenue aggregation.
//!
//! Buckets billable events into (entity, calendar-month) cells for one year
//! and injects standing monthly fees with the mode-dependent semantics the
//! report screens rely on: fallback when viewing branches, rollup when
//! viewing customers. Every report and export path consumes this one module,
//! so yearly P&L, current-account sales, and unbilled-customer views stay
//! provably consistent with each other.

pub mod cell;
pub mod yearly;

pub use cell::{AggregationCell, EntityRef};
pub use yearly::{AggregationMode, EntityYear, PeriodAggregator, YearMatrix};
