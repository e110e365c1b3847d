use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pestops_core::{BranchId, CustomerId, Entity, ReceiptId};

/// Money collected from a customer against outstanding debt.
///
/// `checked_by_admin` is a one-way administrative acknowledgement: once an
/// administrator has checked a receipt there is no transition back. The field
/// is private so the only mutation is [`CollectionReceipt::acknowledge`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionReceipt {
    pub id: ReceiptId,
    pub customer_id: CustomerId,
    pub branch_id: Option<BranchId>,
    /// Amount in smallest currency unit (e.g., cents).
    pub amount: i64,
    pub received_at: DateTime<Utc>,
    pub receipt_no: String,
    checked_by_admin: bool,
}

impl CollectionReceipt {
    pub fn new(
        id: ReceiptId,
        customer_id: CustomerId,
        branch_id: Option<BranchId>,
        amount: i64,
        received_at: DateTime<Utc>,
        receipt_no: impl Into<String>,
        checked_by_admin: bool,
    ) -> Self {
        Self {
            id,
            customer_id,
            branch_id,
            amount,
            received_at,
            receipt_no: receipt_no.into(),
            checked_by_admin,
        }
    }

    /// Admin acknowledgement: unchecked → checked. Idempotent, irreversible.
    pub fn acknowledge(&mut self) {
        self.checked_by_admin = true;
    }

    pub fn is_checked(&self) -> bool {
        self.checked_by_admin
    }
}

impl Entity for CollectionReceipt {
    type Id = ReceiptId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_receipt(checked: bool) -> CollectionReceipt {
        CollectionReceipt::new(
            ReceiptId::new(),
            CustomerId::new(),
            None,
            15_000,
            Utc::now(),
            "RCP-0001",
            checked,
        )
    }

    #[test]
    fn acknowledge_moves_to_checked() {
        let mut receipt = test_receipt(false);
        assert!(!receipt.is_checked());
        receipt.acknowledge();
        assert!(receipt.is_checked());
    }

    #[test]
    fn acknowledge_is_idempotent() {
        let mut receipt = test_receipt(true);
        receipt.acknowledge();
        assert!(receipt.is_checked());
    }
}
