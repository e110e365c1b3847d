use serde::{Deserialize, Serialize};

use pestops_aggregation::{AggregationMode, EntityRef, YearMatrix};

/// One row of a tabular yearly report: an entity and its 12 monthly totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub entity: EntityRef,
    pub label: String,
    pub monthly_totals: [i64; 12],
    pub year_total: i64,
    /// The entity had billable activity but no configured pricing.
    pub unpriced: bool,
}

/// Tabular projection of a yearly matrix, plus the grand-total row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearReport {
    pub mode: AggregationMode,
    pub year: i32,
    pub rows: Vec<ReportRow>,
    pub grand_monthly_totals: [i64; 12],
    pub grand_total: i64,
}

/// Component series of one entity, for chart rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentBreakdown {
    pub entity: EntityRef,
    pub label: String,
    pub material_sales: [i64; 12],
    pub monthly_fees: [i64; 12],
    pub per_visit_fees: [i64; 12],
    pub visit_counts: [u32; 12],
}

/// Project a matrix into report rows with a grand-total row.
pub fn project_rows(matrix: &YearMatrix) -> YearReport {
    let mut grand_monthly_totals = [0i64; 12];
    let rows: Vec<ReportRow> = matrix
        .rows
        .iter()
        .map(|row| {
            let mut monthly_totals = [0i64; 12];
            for cell in &row.months {
                monthly_totals[cell.month.index()] = cell.total;
                grand_monthly_totals[cell.month.index()] += cell.total;
            }
            ReportRow {
                entity: row.entity,
                label: row.display_name.clone(),
                monthly_totals,
                year_total: row.year_total,
                unpriced: matrix.unpriced.contains(&row.entity),
            }
        })
        .collect();

    YearReport {
        mode: matrix.mode,
        year: matrix.year,
        rows,
        grand_monthly_totals,
        grand_total: matrix.grand_total(),
    }
}

/// Component series for one entity of the matrix, if present.
pub fn project_components(matrix: &YearMatrix, entity: EntityRef) -> Option<ComponentBreakdown> {
    let row = matrix.row(entity)?;
    let mut breakdown = ComponentBreakdown {
        entity,
        label: row.display_name.clone(),
        material_sales: [0; 12],
        monthly_fees: [0; 12],
        per_visit_fees: [0; 12],
        visit_counts: [0; 12],
    };
    for cell in &row.months {
        let i = cell.month.index();
        breakdown.material_sales[i] = cell.material_sales;
        breakdown.monthly_fees[i] = cell.monthly_fee;
        breakdown.per_visit_fees[i] = cell.per_visit_fee;
        breakdown.visit_counts[i] = cell.visit_count;
    }
    Some(breakdown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pestops_aggregation::PeriodAggregator;
    use pestops_billing::{BillingSnapshot, EventCollector};
    use pestops_core::{CustomerId, SaleId, VisitId};
    use pestops_operations::{Customer, MaterialSale, SaleStatus, Visit, VisitStatus};
    use pestops_pricing::PricingRule;

    const YEAR: i32 = 2025;

    fn snapshot() -> (BillingSnapshot, CustomerId, CustomerId) {
        let priced = Customer {
            id: CustomerId::new(),
            display_name: "Priced".to_string(),
        };
        let unpriced = Customer {
            id: CustomerId::new(),
            display_name: "Unpriced".to_string(),
        };
        let visits = vec![Visit {
            id: VisitId::new(),
            customer_id: priced.id,
            branch_id: None,
            occurred_at: Utc.with_ymd_and_hms(YEAR, 6, 6, 8, 0, 0).unwrap(),
            status: VisitStatus::Completed,
            report_number: None,
        }];
        let sales = vec![MaterialSale {
            id: SaleId::new(),
            customer_id: unpriced.id,
            branch_id: None,
            occurred_at: Utc.with_ymd_and_hms(YEAR, 6, 7, 8, 0, 0).unwrap(),
            status: SaleStatus::Approved,
            total_amount: 700,
            lines: Vec::new(),
        }];
        let s = BillingSnapshot::new(
            vec![priced.clone(), unpriced.clone()],
            Vec::new(),
            vec![PricingRule::for_customer(priced.id, Some(1_000), Some(250))],
            visits,
            sales,
            Vec::new(),
        )
        .unwrap();
        (s, priced.id, unpriced.id)
    }

    fn matrix() -> (YearMatrix, CustomerId, CustomerId) {
        let (snapshot, priced, unpriced) = snapshot();
        let events = EventCollector::new(&snapshot).collect(&[SaleStatus::Approved]);
        let matrix = PeriodAggregator::new(&snapshot)
            .aggregate(AggregationMode::Customer, YEAR, &events)
            .unwrap();
        (matrix, priced, unpriced)
    }

    #[test]
    fn rows_carry_monthly_and_year_totals() {
        let (matrix, priced, _) = matrix();
        let report = project_rows(&matrix);

        assert_eq!(report.rows.len(), 2);
        let row = report
            .rows
            .iter()
            .find(|r| r.entity == EntityRef::Customer(priced))
            .unwrap();
        // Standing fee 1000 every month, plus the 250 visit in June.
        assert_eq!(row.monthly_totals[5], 1_250);
        assert_eq!(row.monthly_totals[0], 1_000);
        assert_eq!(row.year_total, 12 * 1_000 + 250);
    }

    #[test]
    fn grand_totals_reduce_across_rows() {
        let (matrix, _, _) = matrix();
        let report = project_rows(&matrix);
        assert_eq!(report.grand_total, matrix.grand_total());
        assert_eq!(
            report.grand_monthly_totals.iter().sum::<i64>(),
            report.grand_total
        );
        // June holds both customers' revenue.
        assert_eq!(report.grand_monthly_totals[5], 1_250 + 700);
    }

    #[test]
    fn unpriced_entities_are_flagged_in_rows() {
        let (matrix, priced, unpriced) = matrix();
        let report = project_rows(&matrix);
        let flagged: Vec<bool> = report
            .rows
            .iter()
            .map(|r| r.unpriced)
            .collect();
        assert_eq!(flagged.iter().filter(|f| **f).count(), 1);
        let unpriced_row = report
            .rows
            .iter()
            .find(|r| r.entity == EntityRef::Customer(unpriced))
            .unwrap();
        assert!(unpriced_row.unpriced);
        let priced_row = report
            .rows
            .iter()
            .find(|r| r.entity == EntityRef::Customer(priced))
            .unwrap();
        assert!(!priced_row.unpriced);
    }

    #[test]
    fn components_mirror_the_cells() {
        let (matrix, priced, _) = matrix();
        let breakdown =
            project_components(&matrix, EntityRef::Customer(priced)).unwrap();
        assert_eq!(breakdown.monthly_fees, [1_000; 12]);
        assert_eq!(breakdown.per_visit_fees[5], 250);
        assert_eq!(breakdown.visit_counts[5], 1);
        assert_eq!(breakdown.material_sales, [0; 12]);

        assert!(project_components(&matrix, EntityRef::Customer(CustomerId::new())).is_none());
    }
}
