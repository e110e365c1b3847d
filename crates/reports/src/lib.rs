//! Report projections.
//!
//! Thin formatting layer over aggregation matrices: the row/column shapes the
//! report screens and chart widgets consume. No billing semantics live here.

pub mod projector;

pub use projector::{
    project_components, project_rows, ComponentBreakdown, ReportRow, YearReport,
};
