use serde::{Deserialize, Serialize};

use pestops_core::{BranchId, CustomerId, DomainError, DomainResult, Period};

/// VAT percentage applied when the source product record carries none.
pub const DEFAULT_VAT_RATE: u32 = 20;

/// Unit label for collapsed visit lines.
pub const UNIT_SERVICE: &str = "service";

/// Unit label for material lines.
pub const UNIT_PIECE: &str = "pcs";

/// One line of an invoice draft.
///
/// Field order mirrors the accounting-import spreadsheet column layout:
/// title, description, quantity, unit, unit price, discount, VAT rate. The
/// downstream import tool binds columns positionally, so this order is a
/// compatibility contract and must not be changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftLine {
    pub title: String,
    pub description: String,
    pub quantity: i64,
    pub unit: String,
    /// Price in smallest currency unit (e.g., cents).
    pub unit_price: i64,
    /// Absolute discount in smallest currency unit; currently always 0.
    pub discount: i64,
    /// VAT percentage.
    pub vat_rate: u32,
}

impl DraftLine {
    /// Net line amount: `quantity * unit_price - discount`.
    pub fn amount(&self) -> DomainResult<i64> {
        self.quantity
            .checked_mul(self.unit_price)
            .and_then(|gross| gross.checked_sub(self.discount))
            .ok_or_else(|| DomainError::invariant("invoice line amount overflow"))
    }
}

/// Invoice-ready grouping of billable events for one scope and period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDraft {
    pub customer_id: CustomerId,
    /// `None` for customer-level drafts (branchless events or combine mode).
    pub branch_id: Option<BranchId>,
    pub period: Period,
    pub lines: Vec<DraftLine>,
    /// Sum of line amounts, smallest currency unit.
    pub total: i64,
}
