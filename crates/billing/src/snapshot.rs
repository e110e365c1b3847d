//! The validated, immutable input universe for one report run.

use std::collections::HashMap;

use pestops_core::{BranchId, CustomerId, DomainError, DomainResult, Entity, SaleId};
use pestops_operations::{Branch, CollectionReceipt, Customer, MaterialSale, Visit};
use pestops_pricing::{
    resolve_branch_monthly_fee, resolve_customer_monthly_fee, resolve_per_visit_fee, PricingRule,
    PricingScope,
};

/// Everything the engine reads during one report run, validated once at
/// construction so downstream components never meet a dangling reference.
///
/// The engine's contract is "resolve against current rules": pricing in this
/// snapshot is whatever the administrators have configured *now*, not what was
/// in force when a visit happened. Re-running a report for a past period over
/// a freshly fetched snapshot reflects the current rule set.
#[derive(Debug, Clone)]
pub struct BillingSnapshot {
    customers: Vec<Customer>,
    branches: Vec<Branch>,
    visits: Vec<Visit>,
    sales: Vec<MaterialSale>,
    receipts: Vec<CollectionReceipt>,
    customer_index: HashMap<CustomerId, usize>,
    branch_index: HashMap<BranchId, usize>,
    sale_index: HashMap<SaleId, usize>,
    customer_pricing: HashMap<CustomerId, PricingRule>,
    branch_pricing: HashMap<BranchId, PricingRule>,
}

/// Index a slice of entities by id, rejecting duplicates.
fn index_entities<E: Entity>(items: &[E], kind: &str) -> DomainResult<HashMap<E::Id, usize>> {
    let mut index = HashMap::with_capacity(items.len());
    for (pos, item) in items.iter().enumerate() {
        if index.insert(item.id().clone(), pos).is_some() {
            return Err(DomainError::validation(format!(
                "duplicate {kind} id: {:?}",
                item.id()
            )));
        }
    }
    Ok(index)
}

impl BillingSnapshot {
    /// Assemble and validate a snapshot.
    ///
    /// Fails fast on structural problems (caller programming errors, not
    /// reporting gaps): duplicate ids, a branch under an unknown
    /// customer, a record referencing an unknown customer or branch, a record
    /// whose branch belongs to a different customer, or a second pricing rule
    /// for a scope that already has one.
    pub fn new(
        customers: Vec<Customer>,
        branches: Vec<Branch>,
        pricing_rules: Vec<PricingRule>,
        visits: Vec<Visit>,
        sales: Vec<MaterialSale>,
        receipts: Vec<CollectionReceipt>,
    ) -> DomainResult<Self> {
        let customer_index = index_entities(&customers, "customer")?;
        let branch_index = index_entities(&branches, "branch")?;
        let sale_index = index_entities(&sales, "sale")?;
        index_entities(&visits, "visit")?;
        index_entities(&receipts, "receipt")?;

        for branch in &branches {
            if !customer_index.contains_key(&branch.customer_id) {
                return Err(DomainError::UnknownCustomer(branch.customer_id));
            }
        }

        let check_scope = |customer_id: CustomerId, branch_id: Option<BranchId>| {
            if !customer_index.contains_key(&customer_id) {
                return Err(DomainError::UnknownCustomer(customer_id));
            }
            if let Some(branch_id) = branch_id {
                let pos = branch_index
                    .get(&branch_id)
                    .ok_or(DomainError::UnknownBranch(branch_id))?;
                let branch = &branches[*pos];
                if branch.customer_id != customer_id {
                    return Err(DomainError::validation(format!(
                        "branch {branch_id} does not belong to customer {customer_id}"
                    )));
                }
            }
            Ok(())
        };

        for visit in &visits {
            check_scope(visit.customer_id, visit.branch_id)?;
        }
        for sale in &sales {
            check_scope(sale.customer_id, sale.branch_id)?;
        }
        for receipt in &receipts {
            check_scope(receipt.customer_id, receipt.branch_id)?;
        }

        let mut customer_pricing = HashMap::new();
        let mut branch_pricing = HashMap::new();
        for rule in pricing_rules {
            match rule.scope {
                PricingScope::Customer(customer_id) => {
                    if !customer_index.contains_key(&customer_id) {
                        return Err(DomainError::UnknownCustomer(customer_id));
                    }
                    if customer_pricing.insert(customer_id, rule).is_some() {
                        return Err(DomainError::validation(format!(
                            "more than one pricing rule for customer {customer_id}"
                        )));
                    }
                }
                PricingScope::Branch(branch_id) => {
                    if !branch_index.contains_key(&branch_id) {
                        return Err(DomainError::UnknownBranch(branch_id));
                    }
                    if branch_pricing.insert(branch_id, rule).is_some() {
                        return Err(DomainError::validation(format!(
                            "more than one pricing rule for branch {branch_id}"
                        )));
                    }
                }
            }
        }

        Ok(Self {
            customers,
            branches,
            visits,
            sales,
            receipts,
            customer_index,
            branch_index,
            sale_index,
            customer_pricing,
            branch_pricing,
        })
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn visits(&self) -> &[Visit] {
        &self.visits
    }

    pub fn sales(&self) -> &[MaterialSale] {
        &self.sales
    }

    pub fn receipts(&self) -> &[CollectionReceipt] {
        &self.receipts
    }

    pub fn customer(&self, id: CustomerId) -> Option<&Customer> {
        self.customer_index.get(&id).map(|pos| &self.customers[*pos])
    }

    pub fn branch(&self, id: BranchId) -> Option<&Branch> {
        self.branch_index.get(&id).map(|pos| &self.branches[*pos])
    }

    pub fn sale(&self, id: SaleId) -> Option<&MaterialSale> {
        self.sale_index.get(&id).map(|pos| &self.sales[*pos])
    }

    pub fn customer_pricing(&self, id: CustomerId) -> Option<&PricingRule> {
        self.customer_pricing.get(&id)
    }

    pub fn branch_pricing(&self, id: BranchId) -> Option<&PricingRule> {
        self.branch_pricing.get(&id)
    }

    /// Branches of one customer, in snapshot order.
    pub fn branches_of(&self, customer_id: CustomerId) -> impl Iterator<Item = &Branch> {
        self.branches
            .iter()
            .filter(move |b| b.customer_id == customer_id)
    }

    /// Effective fee for one completed visit under the given scopes.
    ///
    /// See [`resolve_per_visit_fee`] for the suppression rule.
    pub fn per_visit_fee(&self, customer_id: CustomerId, branch_id: Option<BranchId>) -> i64 {
        resolve_per_visit_fee(
            self.customer_pricing(customer_id),
            branch_id.and_then(|id| self.branch_pricing(id)),
        )
    }

    /// Standing monthly fee of a branch (own price, else parent fallback).
    pub fn branch_monthly_fee(&self, branch: &Branch) -> i64 {
        resolve_branch_monthly_fee(
            self.branch_pricing(branch.id),
            self.customer_pricing(branch.customer_id),
        )
    }

    /// Standing monthly fee of a customer (own price plus branch rollup).
    pub fn customer_monthly_fee(&self, customer_id: CustomerId) -> i64 {
        resolve_customer_monthly_fee(
            self.customer_pricing(customer_id),
            self.branches_of(customer_id)
                .filter_map(|b| self.branch_pricing(b.id)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pestops_core::{ReceiptId, VisitId};
    use pestops_operations::{SaleStatus, VisitStatus};

    fn customer(name: &str) -> Customer {
        Customer {
            id: CustomerId::new(),
            display_name: name.to_string(),
        }
    }

    fn branch(customer_id: CustomerId, name: &str) -> Branch {
        Branch {
            id: BranchId::new(),
            customer_id,
            display_name: name.to_string(),
        }
    }

    fn completed_visit(customer_id: CustomerId, branch_id: Option<BranchId>) -> Visit {
        Visit {
            id: VisitId::new(),
            customer_id,
            branch_id,
            occurred_at: Utc::now(),
            status: VisitStatus::Completed,
            report_number: None,
        }
    }

    #[test]
    fn valid_snapshot_builds() {
        let c = customer("Acme Foods");
        let b = branch(c.id, "Acme Depot");
        let visit = completed_visit(c.id, Some(b.id));
        let snapshot = BillingSnapshot::new(
            vec![c.clone()],
            vec![b.clone()],
            vec![PricingRule::for_branch(b.id, Some(40_000), None)],
            vec![visit],
            Vec::new(),
            Vec::new(),
        )
        .unwrap();

        assert_eq!(snapshot.customers().len(), 1);
        assert_eq!(snapshot.branch(b.id).unwrap().display_name, "Acme Depot");
        assert_eq!(snapshot.branch_monthly_fee(&b), 40_000);
    }

    #[test]
    fn branch_under_unknown_customer_is_rejected() {
        let orphan = branch(CustomerId::new(), "Orphan");
        let err =
            BillingSnapshot::new(Vec::new(), vec![orphan], Vec::new(), Vec::new(), Vec::new(), Vec::new())
                .unwrap_err();
        assert!(matches!(err, DomainError::UnknownCustomer(_)));
    }

    #[test]
    fn visit_at_foreign_branch_is_rejected() {
        let c1 = customer("One");
        let c2 = customer("Two");
        let b2 = branch(c2.id, "Two / Central");
        // Visit claims customer One but points at a branch of Two.
        let visit = completed_visit(c1.id, Some(b2.id));
        let err = BillingSnapshot::new(
            vec![c1, c2],
            vec![b2],
            Vec::new(),
            vec![visit],
            Vec::new(),
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn visit_for_unknown_customer_is_rejected() {
        let visit = completed_visit(CustomerId::new(), None);
        let err = BillingSnapshot::new(
            Vec::new(),
            Vec::new(),
            Vec::new(),
            vec![visit],
            Vec::new(),
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::UnknownCustomer(_)));
    }

    #[test]
    fn duplicate_customer_id_is_rejected() {
        let c = customer("Dup");
        let err = BillingSnapshot::new(
            vec![c.clone(), c],
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn second_pricing_rule_for_same_scope_is_rejected() {
        let c = customer("Twice priced");
        let err = BillingSnapshot::new(
            vec![c.clone()],
            Vec::new(),
            vec![
                PricingRule::for_customer(c.id, Some(10_000), None),
                PricingRule::for_customer(c.id, None, Some(500)),
            ],
            Vec::new(),
            Vec::new(),
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn receipt_scope_is_validated_like_any_record() {
        let c = customer("Payer");
        let receipt = CollectionReceipt::new(
            ReceiptId::new(),
            c.id,
            Some(BranchId::new()),
            5_000,
            Utc::now(),
            "RCP-1",
            false,
        );
        let err = BillingSnapshot::new(
            vec![c],
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            vec![receipt],
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::UnknownBranch(_)));
    }

    #[test]
    fn sale_status_is_not_validated_here() {
        // Status eligibility is a per-report concern, not a structural one.
        let c = customer("Buyer");
        let sale = MaterialSale {
            id: SaleId::new(),
            customer_id: c.id,
            branch_id: None,
            occurred_at: Utc::now(),
            status: SaleStatus::Draft,
            total_amount: 100,
            lines: Vec::new(),
        };
        assert!(BillingSnapshot::new(
            vec![c],
            Vec::new(),
            Vec::new(),
            Vec::new(),
            vec![sale],
            Vec::new(),
        )
        .is_ok());
    }
}
