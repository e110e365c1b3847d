//! Tracing/logging setup shared by the report and export binaries.
//!
//! The engine crates only *emit* via `tracing` (unpriced-entity warnings,
//! aggregation run summaries); installing a subscriber is the embedding
//! application's call and happens here.

/// Tracing configuration (filters, layers).
pub mod tracing;

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}
