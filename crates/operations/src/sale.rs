use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pestops_core::{BranchId, CustomerId, Entity, SaleId};

/// Material sale status lifecycle.
///
/// Which statuses count as billable differs per report, so the billing layer
/// takes the eligible set as a parameter instead of encoding it here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    Draft,
    Approved,
    Invoiced,
    Paid,
}

/// One line of a material sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLine {
    pub product: String,
    pub quantity: i64,
    /// Price in smallest currency unit (e.g., cents).
    pub unit_price: i64,
    /// VAT percentage; `None` when the product record carries no rate.
    pub vat_rate: Option<u32>,
}

/// Sale of pesticide or equipment material to a customer.
///
/// `total_amount` is resolved upstream when the sale is recorded; the billing
/// engine takes it as-is and never re-prices sale lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialSale {
    pub id: SaleId,
    pub customer_id: CustomerId,
    pub branch_id: Option<BranchId>,
    pub occurred_at: DateTime<Utc>,
    pub status: SaleStatus,
    /// Total in smallest currency unit (e.g., cents).
    pub total_amount: i64,
    pub lines: Vec<SaleLine>,
}

impl Entity for MaterialSale {
    type Id = SaleId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
