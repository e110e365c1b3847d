//! Operational records of the pest-control service company.
//!
//! Plain snapshot records consumed by the billing engine: customers and their
//! branches, service visits, material sales, and collection receipts. All
//! types here are inert data; the billing semantics live downstream.

pub mod customer;
pub mod receipt;
pub mod sale;
pub mod visit;

pub use customer::{Branch, Customer};
pub use receipt::CollectionReceipt;
pub use sale::{MaterialSale, SaleLine, SaleStatus};
pub use visit::{Visit, VisitStatus};
