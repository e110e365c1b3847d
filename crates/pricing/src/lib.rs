//! Pricing rules and their resolution.
//!
//! Fee resolution lives here exactly once, as named pure functions every
//! downstream consumer shares. Report screens must not carry inline copies of
//! these rules; subtle divergence between screens is how billing totals drift.

pub mod resolver;
pub mod rule;

pub use resolver::{
    has_monthly_contract, resolve_branch_monthly_fee, resolve_customer_monthly_fee,
    resolve_per_visit_fee,
};
pub use rule::{PricingRule, PricingScope};
