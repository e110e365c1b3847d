//! Billable event collection over a validated snapshot.
//!
//! Two heterogeneous sources (completed visits and eligible material sales)
//! are normalized into one [`BillableEvent`] shape here. Everything downstream
//! (aggregation, invoice drafting, balances) consumes that one shape.

pub mod collector;
pub mod event;
pub mod snapshot;

pub use collector::EventCollector;
pub use event::{BillableEvent, BillableSource};
pub use snapshot::BillingSnapshot;
