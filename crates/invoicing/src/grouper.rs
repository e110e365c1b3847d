//! Grouping billable events into invoice drafts.

use std::collections::HashMap;

use pestops_billing::{BillableEvent, BillableSource, BillingSnapshot};
use pestops_core::{BranchId, CustomerId, DomainError, DomainResult, Period};
use uuid::Uuid;

use crate::draft::{DraftLine, InvoiceDraft, DEFAULT_VAT_RATE, UNIT_PIECE, UNIT_SERVICE};

type GroupKey = (CustomerId, Option<BranchId>, Period);

/// Per-group accumulator while walking the event stream.
#[derive(Debug, Default)]
struct Group {
    visit_count: i64,
    /// Rate of the first visit in the group. Rates are uniform within a group
    /// by assumption; a varying rate is a caller data-quality issue and is
    /// not detected here.
    visit_rate: i64,
    report_refs: Vec<String>,
    material_lines: Vec<DraftLine>,
}

/// Groups billable events into invoice drafts keyed by
/// `(customer, branch, calendar month)`.
#[derive(Debug, Clone, Copy)]
pub struct InvoiceGrouper<'a> {
    snapshot: &'a BillingSnapshot,
}

impl<'a> InvoiceGrouper<'a> {
    pub fn new(snapshot: &'a BillingSnapshot) -> Self {
        Self { snapshot }
    }

    /// One draft per `(customer, branch, month)` group.
    ///
    /// Material-sale events retain one line per original sale line; visit
    /// events in a group collapse into a single line whose quantity is the
    /// visit count and whose description concatenates the distinct report
    /// references. Drafts are sorted by customer, branch, period.
    pub fn group(&self, events: &[BillableEvent]) -> DomainResult<Vec<InvoiceDraft>> {
        let mut order: Vec<GroupKey> = Vec::new();
        let mut groups: HashMap<GroupKey, Group> = HashMap::new();

        for event in events {
            let key = (
                event.customer_id,
                event.branch_id,
                Period::of(&event.occurred_at),
            );
            let group = groups.entry(key).or_insert_with(|| {
                order.push(key);
                Group::default()
            });

            match event.source {
                BillableSource::Visit(_) => {
                    if group.visit_count == 0 {
                        group.visit_rate = event.resolved_amount;
                    }
                    group.visit_count += 1;
                    if let Some(report_ref) = &event.report_ref {
                        if !group.report_refs.iter().any(|r| r == report_ref) {
                            group.report_refs.push(report_ref.clone());
                        }
                    }
                }
                BillableSource::MaterialSale(sale_id) => {
                    let sale = self.snapshot.sale(sale_id).ok_or_else(|| {
                        DomainError::invariant(format!("sale {sale_id} missing from snapshot"))
                    })?;
                    if sale.lines.is_empty() {
                        // Keep the event billable even when the sale record
                        // carries no line detail.
                        group.material_lines.push(DraftLine {
                            title: "Materials".to_string(),
                            description: String::new(),
                            quantity: 1,
                            unit: UNIT_PIECE.to_string(),
                            unit_price: sale.total_amount,
                            discount: 0,
                            vat_rate: DEFAULT_VAT_RATE,
                        });
                    }
                    for line in &sale.lines {
                        group.material_lines.push(DraftLine {
                            title: line.product.clone(),
                            description: String::new(),
                            quantity: line.quantity,
                            unit: UNIT_PIECE.to_string(),
                            unit_price: line.unit_price,
                            discount: 0,
                            vat_rate: line.vat_rate.unwrap_or(DEFAULT_VAT_RATE),
                        });
                    }
                }
            }
        }

        let mut drafts = Vec::with_capacity(order.len());
        for key in order {
            let (customer_id, branch_id, period) = key;
            let group = groups.remove(&key).unwrap_or_default();

            let mut lines = Vec::new();
            if group.visit_count > 0 {
                lines.push(DraftLine {
                    title: "Pest control service".to_string(),
                    description: group.report_refs.join(", "),
                    quantity: group.visit_count,
                    unit: UNIT_SERVICE.to_string(),
                    unit_price: group.visit_rate,
                    discount: 0,
                    vat_rate: DEFAULT_VAT_RATE,
                });
            }
            lines.extend(group.material_lines);

            let total = sum_line_amounts(&lines)?;
            drafts.push(InvoiceDraft {
                customer_id,
                branch_id,
                period,
                lines,
                total,
            });
        }

        drafts.sort_by_key(|d| {
            (
                Uuid::from(d.customer_id),
                d.branch_id.map(Uuid::from),
                d.period,
            )
        });
        Ok(drafts)
    }

    /// Combine mode: merge per-branch drafts into per-customer drafts.
    ///
    /// Runs as a second pass over already-built drafts; branch grouping is
    /// never skipped. The grouping key drops only `branch_id`, never the
    /// month, and every moved line's description gets the branch name
    /// appended so provenance survives the merge.
    pub fn combine(&self, drafts: Vec<InvoiceDraft>) -> DomainResult<Vec<InvoiceDraft>> {
        let mut order: Vec<(CustomerId, Period)> = Vec::new();
        let mut merged: HashMap<(CustomerId, Period), InvoiceDraft> = HashMap::new();

        for draft in drafts {
            let branch_name = match draft.branch_id {
                Some(branch_id) => Some(
                    self.snapshot
                        .branch(branch_id)
                        .ok_or_else(|| {
                            DomainError::invariant(format!(
                                "branch {branch_id} missing from snapshot"
                            ))
                        })?
                        .display_name
                        .clone(),
                ),
                None => None,
            };

            let key = (draft.customer_id, draft.period);
            let target = merged.entry(key).or_insert_with(|| {
                order.push(key);
                InvoiceDraft {
                    customer_id: draft.customer_id,
                    branch_id: None,
                    period: draft.period,
                    lines: Vec::new(),
                    total: 0,
                }
            });

            for mut line in draft.lines {
                if let Some(name) = &branch_name {
                    line.description = if line.description.is_empty() {
                        name.clone()
                    } else {
                        format!("{} / {}", line.description, name)
                    };
                }
                target.lines.push(line);
            }
            target.total = target
                .total
                .checked_add(draft.total)
                .ok_or_else(|| DomainError::invariant("invoice draft total overflow"))?;
        }

        let mut combined: Vec<InvoiceDraft> = order
            .into_iter()
            .filter_map(|key| merged.remove(&key))
            .collect();
        combined.sort_by_key(|d| (Uuid::from(d.customer_id), d.period));
        Ok(combined)
    }
}

fn sum_line_amounts(lines: &[DraftLine]) -> DomainResult<i64> {
    let mut total: i64 = 0;
    for line in lines {
        total = total
            .checked_add(line.amount()?)
            .ok_or_else(|| DomainError::invariant("invoice draft total overflow"))?;
    }
    Ok(total)
}
