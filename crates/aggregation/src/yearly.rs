//! The period aggregator: 12 cells per entity for one reporting year.

use std::collections::HashMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use pestops_billing::{BillableEvent, BillableSource, BillingSnapshot};
use pestops_core::{DomainError, DomainResult, Month};

use crate::cell::{AggregationCell, EntityRef};

/// Which kind of entity the matrix rows represent.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationMode {
    Customer,
    Branch,
}

/// One entity's full reporting year: 12 cells plus the year total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityYear {
    pub entity: EntityRef,
    pub display_name: String,
    /// Exactly 12 cells, January through December.
    pub months: Vec<AggregationCell>,
    pub year_total: i64,
}

impl EntityYear {
    fn seeded(entity: EntityRef, display_name: String, monthly_fee: i64) -> Self {
        let months = Month::ALL
            .iter()
            .map(|month| AggregationCell::seeded(entity, *month, monthly_fee))
            .collect();
        Self {
            entity,
            display_name,
            months,
            year_total: 0,
        }
    }

    pub fn cell(&self, month: Month) -> &AggregationCell {
        &self.months[month.index()]
    }
}

/// Entity-by-month revenue matrix for one year and one mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearMatrix {
    pub mode: AggregationMode,
    pub year: i32,
    /// Rows sorted by entity UUID; reruns over an unchanged snapshot are
    /// byte-identical.
    pub rows: Vec<EntityYear>,
    /// Entities with billable activity this year but no resolved pricing
    /// anywhere: surfaced as a visible category rather than folded silently
    /// into zero-revenue totals.
    pub unpriced: Vec<EntityRef>,
}

impl YearMatrix {
    pub fn row(&self, entity: EntityRef) -> Option<&EntityYear> {
        self.rows.iter().find(|r| r.entity == entity)
    }

    /// Final reduction across all rows.
    pub fn grand_total(&self) -> i64 {
        self.rows.iter().map(|r| r.year_total).sum()
    }
}

/// Buckets billable events into (entity, calendar-month) cells.
///
/// Standing monthly fees are injected here, once per (entity, month),
/// independent of whether any visit occurred; they are never attached to
/// individual events. The fee semantics differ by mode and the asymmetry is
/// deliberate:
///
/// - **branch mode**: a branch's fee is its own `monthly_price`, else the
///   parent customer's (fallback);
/// - **customer mode**: a customer's fee is its own `monthly_price` plus the
///   sum of its branches' own values (rollup, no inheritance).
#[derive(Debug, Clone, Copy)]
pub struct PeriodAggregator<'a> {
    snapshot: &'a BillingSnapshot,
}

impl<'a> PeriodAggregator<'a> {
    pub fn new(snapshot: &'a BillingSnapshot) -> Self {
        Self { snapshot }
    }

    /// Aggregate events into a yearly matrix.
    ///
    /// Every entity of the mode's kind gets exactly 12 cells, event-less ones
    /// included. Events outside `year` are ignored; events referencing ids
    /// that are not in the snapshot are a caller programming error and fail
    /// fast. In branch mode, events without a branch are skipped: they have
    /// no row to land in and belong to the customer view.
    pub fn aggregate(
        &self,
        mode: AggregationMode,
        year: i32,
        events: &[BillableEvent],
    ) -> DomainResult<YearMatrix> {
        let mut rows: Vec<EntityYear> = match mode {
            AggregationMode::Customer => self
                .snapshot
                .customers()
                .iter()
                .map(|c| {
                    EntityYear::seeded(
                        EntityRef::Customer(c.id),
                        c.display_name.clone(),
                        self.snapshot.customer_monthly_fee(c.id),
                    )
                })
                .collect(),
            AggregationMode::Branch => self
                .snapshot
                .branches()
                .iter()
                .map(|b| {
                    EntityYear::seeded(
                        EntityRef::Branch(b.id),
                        b.display_name.clone(),
                        self.snapshot.branch_monthly_fee(b),
                    )
                })
                .collect(),
        };

        let index: HashMap<EntityRef, usize> = rows
            .iter()
            .enumerate()
            .map(|(pos, row)| (row.entity, pos))
            .collect();
        let mut touched = vec![false; rows.len()];

        for event in events {
            if self.snapshot.customer(event.customer_id).is_none() {
                return Err(DomainError::UnknownCustomer(event.customer_id));
            }
            if let Some(branch_id) = event.branch_id {
                if self.snapshot.branch(branch_id).is_none() {
                    return Err(DomainError::UnknownBranch(branch_id));
                }
            }
            if event.occurred_at.year() != year {
                continue;
            }

            let entity = match mode {
                AggregationMode::Customer => EntityRef::Customer(event.customer_id),
                AggregationMode::Branch => match event.branch_id {
                    Some(branch_id) => EntityRef::Branch(branch_id),
                    None => continue,
                },
            };
            let Some(&pos) = index.get(&entity) else {
                return Err(DomainError::invariant(format!("no matrix row for {entity}")));
            };

            let month = Month::of(&event.occurred_at);
            let cell = &mut rows[pos].months[month.index()];
            match event.source {
                BillableSource::Visit(_) => cell.add_visit(event.resolved_amount),
                BillableSource::MaterialSale(_) => cell.add_material_sale(event.resolved_amount),
            }
            touched[pos] = true;
        }

        let mut unpriced = Vec::new();
        for (pos, row) in rows.iter_mut().enumerate() {
            row.year_total = row.months.iter().map(|cell| cell.total).sum();

            let monthly_fee = row.months[0].monthly_fee;
            let visit_revenue: i64 = row.months.iter().map(|cell| cell.per_visit_fee).sum();
            if touched[pos] && monthly_fee == 0 && visit_revenue == 0 {
                warn!(entity = %row.entity, year, "billable activity but no configured pricing");
                unpriced.push(row.entity);
            }
        }

        rows.sort_by_key(|row| row.entity.as_uuid());
        unpriced.sort_by_key(|entity| entity.as_uuid());

        debug!(
            ?mode,
            year,
            rows = rows.len(),
            unpriced = unpriced.len(),
            "aggregated yearly matrix"
        );
        Ok(YearMatrix {
            mode,
            year,
            rows,
            unpriced,
        })
    }
}
