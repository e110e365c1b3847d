//! Net position per customer, with itemized audit detail.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pestops_billing::{BillableEvent, BillingSnapshot};
use pestops_core::{CustomerId, DomainError, DomainResult};
use pestops_operations::CollectionReceipt;

/// Net position of one customer: unbilled billable amounts against recorded
/// collections.
///
/// The scalar fields always equal the sums over the itemized lists; the
/// lists exist for UI drill-down and audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerBalance {
    pub customer_id: CustomerId,
    /// Σ resolved_amount of the contributing events.
    pub total_debt: i64,
    /// Σ amount of the contributing receipts.
    pub total_collections: i64,
    /// `total_debt - total_collections`; negative when overcollected.
    pub balance: i64,
    pub contributing_events: Vec<BillableEvent>,
    pub contributing_receipts: Vec<CollectionReceipt>,
}

/// Nets total debt against collections per customer.
///
/// The events passed in define what counts as "not yet billed": callers feed
/// the output of the event collector, run with the same status predicate the
/// report uses everywhere else.
#[derive(Debug, Clone, Copy)]
pub struct BalanceCalculator<'a> {
    snapshot: &'a BillingSnapshot,
}

impl<'a> BalanceCalculator<'a> {
    pub fn new(snapshot: &'a BillingSnapshot) -> Self {
        Self { snapshot }
    }

    /// Balance of one customer.
    pub fn balance_for(
        &self,
        customer_id: CustomerId,
        events: &[BillableEvent],
    ) -> DomainResult<CustomerBalance> {
        if self.snapshot.customer(customer_id).is_none() {
            return Err(DomainError::UnknownCustomer(customer_id));
        }

        let contributing_events: Vec<BillableEvent> = events
            .iter()
            .filter(|e| e.customer_id == customer_id)
            .cloned()
            .collect();
        let contributing_receipts: Vec<CollectionReceipt> = self
            .snapshot
            .receipts()
            .iter()
            .filter(|r| r.customer_id == customer_id)
            .cloned()
            .collect();

        let mut total_debt: i64 = 0;
        for event in &contributing_events {
            total_debt = total_debt
                .checked_add(event.resolved_amount)
                .ok_or_else(|| DomainError::invariant("customer debt overflow"))?;
        }
        let mut total_collections: i64 = 0;
        for receipt in &contributing_receipts {
            total_collections = total_collections
                .checked_add(receipt.amount)
                .ok_or_else(|| DomainError::invariant("customer collections overflow"))?;
        }
        let balance = total_debt
            .checked_sub(total_collections)
            .ok_or_else(|| DomainError::invariant("customer balance overflow"))?;

        Ok(CustomerBalance {
            customer_id,
            total_debt,
            total_collections,
            balance,
            contributing_events,
            contributing_receipts,
        })
    }

    /// Balances for every customer in the snapshot, sorted by customer UUID.
    pub fn balances(&self, events: &[BillableEvent]) -> DomainResult<Vec<CustomerBalance>> {
        let mut balances = Vec::with_capacity(self.snapshot.customers().len());
        for customer in self.snapshot.customers() {
            balances.push(self.balance_for(customer.id, events)?);
        }
        balances.sort_by_key(|b| Uuid::from(b.customer_id));
        Ok(balances)
    }
}
