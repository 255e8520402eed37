// ── Comparison orchestration ──
//
// One builder call processes one (before_at, after_at, roster) tuple
// to completion: two batched observation fetches (one per phase, never
// per endpoint), one override fetch, then pure per-endpoint work. The
// store fetches are the only suspension points; everything that
// follows is synchronous and shares no mutable state across endpoints.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::classify::classify;
use crate::diff::diff;
use crate::error::CoreError;
use crate::model::{ComparisonResult, MacAddress, Phase, SeverityOverride};
use crate::rules::SeverityRuleSet;
use crate::store::{MaintenanceId, OverrideStore, SnapshotRepository};

/// Orchestrates diff + classification across a full endpoint roster.
///
/// Holds its rule set by value: each builder is a self-contained
/// request-scoped snapshot of configuration, so a concurrent rules
/// edit can never be partially visible mid-run.
pub struct ComparisonBuilder<'a, S, O> {
    snapshots: &'a S,
    overrides: &'a O,
    rules: SeverityRuleSet,
}

impl<'a, S, O> ComparisonBuilder<'a, S, O>
where
    S: SnapshotRepository + Sync,
    O: OverrideStore + Sync,
{
    /// Create a builder, validating the rule set up front.
    ///
    /// An invalid rule set is rejected here, before any endpoint is
    /// touched.
    pub fn new(
        snapshots: &'a S,
        overrides: &'a O,
        rules: SeverityRuleSet,
    ) -> Result<Self, CoreError> {
        rules.validate()?;
        Ok(Self {
            snapshots,
            overrides,
            rules,
        })
    }

    /// Compare every roster endpoint between the two as-of points.
    ///
    /// Every roster endpoint yields exactly one result, including fully
    /// undetected ones. Observations for endpoints outside the roster
    /// are silently dropped. A store failure aborts the whole run; no
    /// partial result list is ever returned.
    pub async fn build(
        &self,
        maintenance_id: MaintenanceId,
        roster: &BTreeSet<MacAddress>,
        before_at: DateTime<Utc>,
        after_at: DateTime<Utc>,
    ) -> Result<Vec<ComparisonResult>, CoreError> {
        let before_obs = self
            .snapshots
            .observations_at(roster, Phase::Before, before_at)
            .await?;
        let after_obs = self
            .snapshots
            .observations_at(roster, Phase::After, after_at)
            .await?;
        let override_rows = self.overrides.overrides(maintenance_id).await?;

        debug!(
            maintenance_id,
            roster = roster.len(),
            before = before_obs.len(),
            after = after_obs.len(),
            overrides = override_rows.len(),
            "comparison batch fetched"
        );

        // Parse override rows once. A malformed row degrades that one
        // endpoint to automatic classification; it never aborts the batch.
        let mut parsed_overrides: HashMap<MacAddress, SeverityOverride> = HashMap::new();
        for row in &override_rows {
            match SeverityOverride::try_from(row) {
                Ok(ov) => {
                    parsed_overrides.insert(row.mac.clone(), ov);
                }
                Err(err) => {
                    warn!(
                        mac = %row.mac,
                        severity = %row.severity,
                        %err,
                        "malformed override row, falling back to automatic classification"
                    );
                }
            }
        }

        // BTreeSet iteration is ordered, so the output order (and the
        // whole result list) is deterministic for fixed inputs.
        let results = roster
            .iter()
            .map(|mac| {
                let before = before_obs.get(mac);
                let after = after_obs.get(mac);
                let differences = diff(before, after, &self.rules);
                let classification =
                    classify(&differences, parsed_overrides.get(mac), &self.rules);
                ComparisonResult {
                    mac: mac.clone(),
                    is_changed: !differences.is_empty(),
                    differences,
                    severity: classification.severity,
                    severity_source: classification.source,
                    undetected: after.is_none(),
                    notes: classification.notes,
                    before_at,
                    after_at,
                }
            })
            .collect();

        Ok(results)
    }
}
