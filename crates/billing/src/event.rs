use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pestops_core::{BranchId, CustomerId, SaleId, VisitId};

/// Source record a billable event was derived from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillableSource {
    Visit(VisitId),
    MaterialSale(SaleId),
}

/// A single billable occurrence: a completed visit or an eligible material
/// sale, with its worth already resolved.
///
/// Immutable once produced by the collector; append-only for a given
/// snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillableEvent {
    pub source: BillableSource,
    pub customer_id: CustomerId,
    pub branch_id: Option<BranchId>,
    pub occurred_at: DateTime<Utc>,
    /// Worth of this event in smallest currency unit (e.g., cents).
    pub resolved_amount: i64,
    /// Field report reference, when the source visit carries one.
    pub report_ref: Option<String>,
}

impl BillableEvent {
    pub fn is_visit(&self) -> bool {
        matches!(self.source, BillableSource::Visit(_))
    }

    pub fn is_material_sale(&self) -> bool {
        matches!(self.source, BillableSource::MaterialSale(_))
    }
}
