// ── One-call comparison run ──

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::aggregate::aggregate;
use crate::compare::ComparisonBuilder;
use crate::error::CoreError;
use crate::model::{ComparisonResult, StatsBucket};
use crate::rules::SeverityRuleSet;
use crate::store::{CategoryIndex, MaintenanceId, OverrideStore, SnapshotRepository};

/// Combined output of a full comparison run.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonOutput {
    pub results: Vec<ComparisonResult>,
    pub buckets: Vec<StatsBucket>,
}

/// Build comparisons and aggregate statistics in one all-or-nothing
/// call.
///
/// Roster, categories, memberships, and overrides are each read once
/// at the start of the run, so a concurrent edit is never partially
/// visible. Any store failure aborts the run before either output is
/// produced — there is no partial-success shape.
pub async fn run<S, O, C>(
    snapshots: &S,
    overrides: &O,
    index: &C,
    rules: SeverityRuleSet,
    maintenance_id: MaintenanceId,
    before_at: DateTime<Utc>,
    after_at: DateTime<Utc>,
) -> Result<ComparisonOutput, CoreError>
where
    S: SnapshotRepository + Sync,
    O: OverrideStore + Sync,
    C: CategoryIndex + Sync,
{
    let builder = ComparisonBuilder::new(snapshots, overrides, rules)?;

    let roster = index.roster(maintenance_id).await?;
    let categories = index.active_categories(maintenance_id).await?;
    let memberships = index.memberships(maintenance_id).await?;

    debug!(
        maintenance_id,
        roster = roster.len(),
        categories = categories.len(),
        "comparison run starting"
    );

    let results = builder
        .build(maintenance_id, &roster, before_at, after_at)
        .await?;
    let buckets = aggregate(&results, &categories, &memberships);

    Ok(ComparisonOutput { results, buckets })
}
