//! Comparison and severity classification engine for maintenance-window
//! cutovers.
//!
//! The surrounding dashboard records the state of every tracked client
//! endpoint before and after a data-center cutover; this crate is the
//! part that decides what broke. Given two observation snapshots per
//! endpoint it computes field-level differences, assigns a severity,
//! and rolls results up into per-category and global statistics:
//!
//! - **[`diff`](diff())** — pure field-by-field comparison of two
//!   optional [`Observation`]s, including the synthetic `_status`
//!   transition when an endpoint appears or disappears.
//! - **[`classify`](classify())** — ordered precedence table
//!   (override → empty diff → status transition → field sets) mapping
//!   a difference map to a [`Severity`] plus reproducible notes.
//! - **[`ComparisonBuilder`]** — orchestrates the above across a full
//!   roster with batched store reads (one fetch per phase, never per
//!   endpoint).
//! - **[`aggregate`](aggregate())** — per-category buckets plus the
//!   deduplicated-union ALL bucket and the UNCATEGORIZED bucket.
//! - **[`store`]** — the collaborator boundary: async repository
//!   traits and the DashMap-backed [`MemoryStore`] reference
//!   implementation.
//!
//! Everything outside the two batch fetches is pure and synchronous;
//! two runs over identical inputs produce byte-identical output.

pub mod aggregate;
pub mod classify;
pub mod compare;
pub mod diff;
pub mod error;
pub mod model;
pub mod rules;
pub mod run;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use aggregate::aggregate;
pub use classify::{Classification, classify};
pub use compare::ComparisonBuilder;
pub use diff::diff;
pub use error::CoreError;
pub use rules::{DEFAULT_LATENCY_TOLERANCE_MS, SeverityRuleSet};
pub use run::{ComparisonOutput, run};
pub use store::{
    CategoryIndex, MaintenanceId, MemoryStore, OverrideStore, SnapshotRepository, StoreError,
};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    BucketId,
    Category,
    CategoryMembership,
    ComparisonResult,
    DetectionState,
    DiffField,
    DifferenceMap,
    FieldValue,
    MacAddress,
    Observation,
    OverrideRow,
    Phase,
    Severity,
    SeverityOverride,
    SeveritySource,
    StatsBucket,
    ValueChange,
};
