// ── Core error types ──
//
// Run-level failures only. Missing observations, stale category rows,
// and malformed override rows are valid states handled inline with a
// logged diagnostic — they never appear here.

use thiserror::Error;

use crate::store::StoreError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration errors ─────────────────────────────────────────
    #[error("invalid severity rules: {reason}")]
    InvalidRules { reason: String },

    // ── Run-level errors ─────────────────────────────────────────────
    #[error("backing store failure: {0}")]
    Repository(#[from] StoreError),
}
