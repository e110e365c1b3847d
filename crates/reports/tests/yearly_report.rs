//! End-to-end report flow: snapshot → collector → aggregator → projection.
//!
//! Exercises the full worked scenario from the billing rules: a customer with
//! one flat-monthly branch and one unpriced branch, where the customer view
//! and the branch view must tell one consistent story.

use chrono::{DateTime, TimeZone, Utc};
use pestops_aggregation::{AggregationMode, EntityRef, PeriodAggregator};
use pestops_billing::{BillingSnapshot, EventCollector};
use pestops_core::{BranchId, CustomerId, Month, SaleId, VisitId};
use pestops_operations::{Branch, Customer, MaterialSale, SaleStatus, Visit, VisitStatus};
use pestops_pricing::PricingRule;
use pestops_reports::project_rows;

const YEAR: i32 = 2025;

fn at(month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(YEAR, month, day, 10, 0, 0).unwrap()
}

struct World {
    snapshot: BillingSnapshot,
    customer: CustomerId,
    flat_branch: BranchId,
    open_branch: BranchId,
}

/// Customer with per-visit 50; branch "Flat" on a 500 monthly contract with
/// per-visit 0; branch "Open" with no pricing of its own. In March: three
/// visits at Flat, two visits and a 200 material sale at Open.
fn world() -> World {
    let customer = Customer {
        id: CustomerId::new(),
        display_name: "Seaside Hotels".to_string(),
    };
    let flat = Branch {
        id: BranchId::new(),
        customer_id: customer.id,
        display_name: "Flat".to_string(),
    };
    let open = Branch {
        id: BranchId::new(),
        customer_id: customer.id,
        display_name: "Open".to_string(),
    };

    let mut visits = Vec::new();
    for day in [2, 9, 23] {
        visits.push(Visit {
            id: VisitId::new(),
            customer_id: customer.id,
            branch_id: Some(flat.id),
            occurred_at: at(3, day),
            status: VisitStatus::Completed,
            report_number: None,
        });
    }
    for day in [4, 18] {
        visits.push(Visit {
            id: VisitId::new(),
            customer_id: customer.id,
            branch_id: Some(open.id),
            occurred_at: at(3, day),
            status: VisitStatus::Completed,
            report_number: None,
        });
    }
    let sales = vec![MaterialSale {
        id: SaleId::new(),
        customer_id: customer.id,
        branch_id: Some(open.id),
        occurred_at: at(3, 27),
        status: SaleStatus::Approved,
        total_amount: 200,
        lines: Vec::new(),
    }];

    let snapshot = BillingSnapshot::new(
        vec![customer.clone()],
        vec![flat.clone(), open.clone()],
        vec![
            PricingRule::for_customer(customer.id, None, Some(50)),
            PricingRule::for_branch(flat.id, Some(500), Some(0)),
        ],
        visits,
        sales,
        Vec::new(),
    )
    .unwrap();
    World {
        snapshot,
        customer: customer.id,
        flat_branch: flat.id,
        open_branch: open.id,
    }
}

#[test]
fn branch_and_customer_reports_agree() {
    let w = world();
    let events = EventCollector::new(&w.snapshot).collect(&[SaleStatus::Approved]);
    let aggregator = PeriodAggregator::new(&w.snapshot);

    let branch_report = project_rows(
        &aggregator
            .aggregate(AggregationMode::Branch, YEAR, &events)
            .unwrap(),
    );
    let customer_report = project_rows(
        &aggregator
            .aggregate(AggregationMode::Customer, YEAR, &events)
            .unwrap(),
    );

    let march = Month::new(3).unwrap().index();

    let flat_row = branch_report
        .rows
        .iter()
        .find(|r| r.entity == EntityRef::Branch(w.flat_branch))
        .unwrap();
    let open_row = branch_report
        .rows
        .iter()
        .find(|r| r.entity == EntityRef::Branch(w.open_branch))
        .unwrap();
    // Flat: standing fee only, its visits are suppressed to zero.
    assert_eq!(flat_row.monthly_totals[march], 500);
    // Open: 2 × 50 visits + 200 materials, no standing fee to fall back on.
    assert_eq!(open_row.monthly_totals[march], 300);

    let customer_row = customer_report
        .rows
        .iter()
        .find(|r| r.entity == EntityRef::Customer(w.customer))
        .unwrap();
    // Rollup puts the branch contract into the customer's standing fee.
    assert_eq!(customer_row.monthly_totals[march], 800);

    // The two views must reach the same grand total: the same events and the
    // same standing fees, just sliced differently.
    assert_eq!(branch_report.grand_total, customer_report.grand_total);
    assert_eq!(customer_report.grand_total, 12 * 500 + 100 + 200);
}

#[test]
fn report_rerun_is_reproducible_on_a_fixed_snapshot() {
    let w = world();
    let events = EventCollector::new(&w.snapshot).collect(&[SaleStatus::Approved]);
    let aggregator = PeriodAggregator::new(&w.snapshot);

    let first = project_rows(
        &aggregator
            .aggregate(AggregationMode::Customer, YEAR, &events)
            .unwrap(),
    );
    let second = project_rows(
        &aggregator
            .aggregate(AggregationMode::Customer, YEAR, &events)
            .unwrap(),
    );
    assert_eq!(first, second);
}
