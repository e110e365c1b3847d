use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pestops_core::{BranchId, CustomerId, Month};

/// Entity a matrix row belongs to: one customer or one branch.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityRef {
    Customer(CustomerId),
    Branch(BranchId),
}

impl EntityRef {
    /// Underlying UUID; used for deterministic row ordering.
    pub fn as_uuid(&self) -> Uuid {
        match self {
            EntityRef::Customer(id) => (*id).into(),
            EntityRef::Branch(id) => (*id).into(),
        }
    }
}

impl core::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            EntityRef::Customer(id) => write!(f, "customer {id}"),
            EntityRef::Branch(id) => write!(f, "branch {id}"),
        }
    }
}

/// One (entity, month) bucket of a yearly revenue matrix.
///
/// Derived, never persisted; recomputed per report request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationCell {
    pub entity: EntityRef,
    pub month: Month,
    /// Material-sale revenue in this bucket, smallest currency unit.
    pub material_sales: i64,
    /// Standing monthly fee; identical across all 12 cells of an entity.
    pub monthly_fee: i64,
    /// Per-visit revenue in this bucket.
    pub per_visit_fee: i64,
    pub visit_count: u32,
    /// Always `material_sales + monthly_fee + per_visit_fee`.
    pub total: i64,
}

impl AggregationCell {
    /// Fresh cell carrying only the standing monthly fee.
    pub(crate) fn seeded(entity: EntityRef, month: Month, monthly_fee: i64) -> Self {
        Self {
            entity,
            month,
            material_sales: 0,
            monthly_fee,
            per_visit_fee: 0,
            visit_count: 0,
            total: monthly_fee,
        }
    }

    pub(crate) fn add_visit(&mut self, amount: i64) {
        self.per_visit_fee += amount;
        self.visit_count += 1;
        self.total += amount;
    }

    pub(crate) fn add_material_sale(&mut self, amount: i64) {
        self.material_sales += amount;
        self.total += amount;
    }

    /// Sum of the three revenue components; equals `total` at all times.
    pub fn component_sum(&self) -> i64 {
        self.material_sales + self.monthly_fee + self.per_visit_fee
    }
}
