//! Normalization of visits and material sales into billable events.

use pestops_operations::SaleStatus;
use tracing::debug;

use crate::event::{BillableEvent, BillableSource};
use crate::snapshot::BillingSnapshot;

/// Collects billable events from a snapshot.
///
/// Visits bill at the resolved per-visit rate; the standing monthly fee is
/// **not** attached to individual visit events, the period aggregator injects
/// it once per (entity, month). Material sales carry their own resolved
/// total, so the pricing resolver is never consulted for them.
#[derive(Debug, Clone, Copy)]
pub struct EventCollector<'a> {
    snapshot: &'a BillingSnapshot,
}

impl<'a> EventCollector<'a> {
    pub fn new(snapshot: &'a BillingSnapshot) -> Self {
        Self { snapshot }
    }

    /// Produce billable events: completed visits, then material sales whose
    /// status is in `billable_sale_statuses`.
    ///
    /// The eligible sale statuses differ per report (one excludes
    /// invoiced/paid sales, another requires approval), so the set is always
    /// caller-supplied. Output order is deterministic: visits in snapshot
    /// order, then sales in snapshot order.
    pub fn collect(&self, billable_sale_statuses: &[SaleStatus]) -> Vec<BillableEvent> {
        let mut events = Vec::new();

        for visit in self.snapshot.visits() {
            if !visit.is_completed() {
                continue;
            }
            let rate = self
                .snapshot
                .per_visit_fee(visit.customer_id, visit.branch_id);
            events.push(BillableEvent {
                source: BillableSource::Visit(visit.id),
                customer_id: visit.customer_id,
                branch_id: visit.branch_id,
                occurred_at: visit.occurred_at,
                resolved_amount: rate,
                report_ref: visit.report_number.clone(),
            });
        }
        let visit_count = events.len();

        for sale in self.snapshot.sales() {
            if !billable_sale_statuses.contains(&sale.status) {
                continue;
            }
            events.push(BillableEvent {
                source: BillableSource::MaterialSale(sale.id),
                customer_id: sale.customer_id,
                branch_id: sale.branch_id,
                occurred_at: sale.occurred_at,
                resolved_amount: sale.total_amount,
                report_ref: None,
            });
        }

        debug!(
            visits = visit_count,
            sales = events.len() - visit_count,
            "collected billable events"
        );
        events
    }
}
