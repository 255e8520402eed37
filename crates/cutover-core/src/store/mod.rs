// ── Collaborator boundary ──
//
// The engine never talks to a database directly. These traits are the
// whole contract with the persistence layer: batch reads only, absence
// expressed as a missing key (never an error), and a single run-level
// error type for genuine store failures.

mod memory;

pub use memory::MemoryStore;

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{Category, CategoryMembership, MacAddress, Observation, OverrideRow, Phase};

/// Identifier of one maintenance window.
pub type MaintenanceId = i64;

/// Failure of the backing store itself.
///
/// Missing data is not a store error; a repository that cannot find an
/// observation simply omits the key.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("query failed: {message}")]
    Query { message: String },
}

/// Read access to collected observations.
pub trait SnapshotRepository {
    /// The single most-recent observation at or before `as_of` for each
    /// requested endpoint, for one phase. Endpoints with no qualifying
    /// observation are absent from the returned map.
    fn observations_at(
        &self,
        macs: &BTreeSet<MacAddress>,
        phase: Phase,
        as_of: DateTime<Utc>,
    ) -> impl Future<Output = Result<HashMap<MacAddress, Observation>, StoreError>> + Send;
}

/// Read access to manual severity overrides.
pub trait OverrideStore {
    /// All override rows for one maintenance window (at most one per
    /// endpoint). Rows are raw; the builder parses severities per-row.
    fn overrides(
        &self,
        maintenance_id: MaintenanceId,
    ) -> impl Future<Output = Result<Vec<OverrideRow>, StoreError>> + Send;
}

/// Read access to the endpoint roster and category relation.
pub trait CategoryIndex {
    /// The authoritative set of endpoints in scope for a window.
    fn roster(
        &self,
        maintenance_id: MaintenanceId,
    ) -> impl Future<Output = Result<BTreeSet<MacAddress>, StoreError>> + Send;

    /// Active (non-soft-deleted) categories for a window.
    fn active_categories(
        &self,
        maintenance_id: MaintenanceId,
    ) -> impl Future<Output = Result<Vec<Category>, StoreError>> + Send;

    /// Every membership row for a window, including rows referencing
    /// inactive categories (the aggregator filters those).
    fn memberships(
        &self,
        maintenance_id: MaintenanceId,
    ) -> impl Future<Output = Result<Vec<CategoryMembership>, StoreError>> + Send;
}
