//! Fee resolution: the fallback, rollup and suppression rules.
//!
//! Three distinct rules govern how customer-level and branch-level pricing
//! combine, and they are intentionally asymmetric:
//!
//! - **per-visit fee**: branch rate wins; the customer rate applies only when
//!   the branch has no standing monthly contract (suppression).
//! - **branch monthly fee**: the branch's own price, else the customer's
//!   (fallback).
//! - **customer monthly fee**: the customer's own price plus the sum of its
//!   branches' own prices (rollup, no inheritance).
//!
//! Missing pricing resolves to 0, never an error: report generation stays
//! usable for incompletely configured customers, at the accepted risk of
//! unflagged under-billing.

use crate::rule::PricingRule;

/// Whether a scope is billed a flat standing monthly amount.
///
/// An unset or zero `monthly_price` means no contract.
pub fn has_monthly_contract(rule: Option<&PricingRule>) -> bool {
    rule.and_then(|r| r.monthly_price).is_some_and(|p| p > 0)
}

/// Effective fee for one completed visit under the given scopes.
///
/// Resolution order, deterministic, no ties:
/// 1. the branch's own `per_visit_price` when positive;
/// 2. else the customer's `per_visit_price`, but **only** when the branch has
///    no standing monthly contract: a branch already billed a flat monthly
///    amount must never additionally inherit the customer's per-visit rate,
///    or the same visits would be charged under two billing models;
/// 3. else 0.
pub fn resolve_per_visit_fee(
    customer: Option<&PricingRule>,
    branch: Option<&PricingRule>,
) -> i64 {
    if let Some(rate) = branch.and_then(|r| r.per_visit_price) {
        if rate > 0 {
            return rate;
        }
    }
    if has_monthly_contract(branch) {
        return 0;
    }
    customer.and_then(|r| r.per_visit_price).unwrap_or(0)
}

/// Standing monthly fee for a branch, viewed bottom-up.
///
/// The branch's own `monthly_price` when set (an explicit `Some(0)` counts as
/// set), else fallback to the parent customer's, else 0.
pub fn resolve_branch_monthly_fee(
    branch: Option<&PricingRule>,
    customer: Option<&PricingRule>,
) -> i64 {
    branch
        .and_then(|r| r.monthly_price)
        .or_else(|| customer.and_then(|r| r.monthly_price))
        .unwrap_or(0)
}

/// Standing monthly fee for a customer, viewed top-down.
///
/// Rollup: the customer's own `monthly_price` plus the sum of all its
/// branches' **own** values. Branches are not asked to inherit here; an
/// unpriced branch contributes 0, not the customer's price again.
pub fn resolve_customer_monthly_fee<'a>(
    customer: Option<&PricingRule>,
    branch_rules: impl IntoIterator<Item = &'a PricingRule>,
) -> i64 {
    let own = customer.and_then(|r| r.monthly_price).unwrap_or(0);
    let branches: i64 = branch_rules
        .into_iter()
        .filter_map(|r| r.monthly_price)
        .sum();
    own + branches
}
