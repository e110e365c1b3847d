//! Invoice draft grouping.
//!
//! Billable events become invoice-ready drafts keyed by customer, branch and
//! calendar month, with an optional customer-level combine pass. The line
//! layout matches the accounting-import spreadsheet downstream.

pub mod draft;
pub mod grouper;

pub use draft::{DraftLine, InvoiceDraft, DEFAULT_VAT_RATE, UNIT_PIECE, UNIT_SERVICE};
pub use grouper::InvoiceGrouper;
