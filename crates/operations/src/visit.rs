use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pestops_core::{BranchId, CustomerId, Entity, VisitId};

/// Visit status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisitStatus {
    Scheduled,
    Completed,
    Cancelled,
}

/// A pest-control service visit at a customer site.
///
/// `branch_id` is absent for visits billed at the customer level (single-site
/// customers without a branch structure).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    pub id: VisitId,
    pub customer_id: CustomerId,
    pub branch_id: Option<BranchId>,
    pub occurred_at: DateTime<Utc>,
    pub status: VisitStatus,
    /// Field report number; carried into invoice line descriptions.
    pub report_number: Option<String>,
}

impl Visit {
    /// Only completed visits are billable.
    pub fn is_completed(&self) -> bool {
        self.status == VisitStatus::Completed
    }
}

impl Entity for Visit {
    type Id = VisitId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
