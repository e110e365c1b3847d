use serde::{Deserialize, Serialize};

use pestops_core::{BranchId, CustomerId};

/// Scope a pricing rule attaches to. A rule is owned by a customer or by a
/// branch, never both.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingScope {
    Customer(CustomerId),
    Branch(BranchId),
}

/// Pricing configured for one scope.
///
/// `None` means "not set" and is distinct from `Some(0)`: a branch with an
/// explicit zero monthly price is priced, a branch with no rule is not.
///
/// Rules are mutated by administrators at any time and are read at resolution
/// time, never frozen onto past events. Re-running a report for a past period
/// therefore reflects the current rule set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingRule {
    pub scope: PricingScope,
    /// Standing monthly fee in smallest currency unit, if configured.
    pub monthly_price: Option<i64>,
    /// Per-completed-visit fee in smallest currency unit, if configured.
    pub per_visit_price: Option<i64>,
}

impl PricingRule {
    pub fn for_customer(
        customer_id: CustomerId,
        monthly_price: Option<i64>,
        per_visit_price: Option<i64>,
    ) -> Self {
        Self {
            scope: PricingScope::Customer(customer_id),
            monthly_price,
            per_visit_price,
        }
    }

    pub fn for_branch(
        branch_id: BranchId,
        monthly_price: Option<i64>,
        per_visit_price: Option<i64>,
    ) -> Self {
        Self {
            scope: PricingScope::Branch(branch_id),
            monthly_price,
            per_visit_price,
        }
    }
}
