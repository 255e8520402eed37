// ── In-memory collaborator implementation ──
//
// Reference implementation of all three boundary traits, backed by
// DashMap. Used by the integration tests and by embedders that load
// snapshot data from elsewhere (e.g. a CSV import) before running a
// comparison. Observation history is supersede-not-overwrite: every
// recorded observation is kept, and queries pick the newest one
// at-or-before the requested time.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use super::{CategoryIndex, MaintenanceId, OverrideStore, SnapshotRepository, StoreError};
use crate::model::{Category, CategoryMembership, MacAddress, Observation, OverrideRow, Phase};

/// DashMap-backed store implementing every collaborator trait.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Full observation history per endpoint/phase.
    observations: DashMap<(MacAddress, Phase), Vec<Observation>>,
    overrides: DashMap<MaintenanceId, HashMap<MacAddress, OverrideRow>>,
    rosters: DashMap<MaintenanceId, BTreeSet<MacAddress>>,
    categories: DashMap<MaintenanceId, Vec<Category>>,
    memberships: DashMap<MaintenanceId, Vec<CategoryMembership>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an observation. Earlier observations of the same
    /// endpoint/phase are superseded, never overwritten.
    pub fn record_observation(&self, obs: Observation) {
        self.observations
            .entry((obs.mac.clone(), obs.phase))
            .or_default()
            .push(obs);
    }

    /// Insert or replace the override row for one endpoint.
    pub fn upsert_override(&self, maintenance_id: MaintenanceId, row: OverrideRow) {
        self.overrides
            .entry(maintenance_id)
            .or_default()
            .insert(row.mac.clone(), row);
    }

    /// Delete an endpoint's override, reverting it to automatic
    /// classification. Returns the removed row if one existed.
    pub fn clear_override(
        &self,
        maintenance_id: MaintenanceId,
        mac: &MacAddress,
    ) -> Option<OverrideRow> {
        self.overrides
            .get_mut(&maintenance_id)
            .and_then(|mut rows| rows.remove(mac))
    }

    pub fn set_roster(&self, maintenance_id: MaintenanceId, roster: BTreeSet<MacAddress>) {
        self.rosters.insert(maintenance_id, roster);
    }

    pub fn set_categories(&self, maintenance_id: MaintenanceId, categories: Vec<Category>) {
        self.categories.insert(maintenance_id, categories);
    }

    pub fn add_membership(&self, maintenance_id: MaintenanceId, membership: CategoryMembership) {
        self.memberships
            .entry(maintenance_id)
            .or_default()
            .push(membership);
    }
}

impl SnapshotRepository for MemoryStore {
    async fn observations_at(
        &self,
        macs: &BTreeSet<MacAddress>,
        phase: Phase,
        as_of: DateTime<Utc>,
    ) -> Result<HashMap<MacAddress, Observation>, StoreError> {
        let mut found = HashMap::new();
        for mac in macs {
            let Some(history) = self.observations.get(&(mac.clone(), phase)) else {
                continue;
            };
            let newest = history
                .iter()
                .filter(|obs| obs.collected_at <= as_of)
                .max_by_key(|obs| obs.collected_at);
            if let Some(obs) = newest {
                found.insert(mac.clone(), obs.clone());
            }
        }
        Ok(found)
    }
}

impl OverrideStore for MemoryStore {
    async fn overrides(&self, maintenance_id: MaintenanceId) -> Result<Vec<OverrideRow>, StoreError> {
        let mut rows: Vec<OverrideRow> = self
            .overrides
            .get(&maintenance_id)
            .map(|m| m.value().values().cloned().collect())
            .unwrap_or_default();
        rows.sort_by(|a, b| a.mac.cmp(&b.mac));
        Ok(rows)
    }
}

impl CategoryIndex for MemoryStore {
    async fn roster(&self, maintenance_id: MaintenanceId) -> Result<BTreeSet<MacAddress>, StoreError> {
        Ok(self
            .rosters
            .get(&maintenance_id)
            .map(|r| r.value().clone())
            .unwrap_or_default())
    }

    async fn active_categories(
        &self,
        maintenance_id: MaintenanceId,
    ) -> Result<Vec<Category>, StoreError> {
        Ok(self
            .categories
            .get(&maintenance_id)
            .map(|c| c.value().iter().filter(|cat| cat.active).cloned().collect())
            .unwrap_or_default())
    }

    async fn memberships(
        &self,
        maintenance_id: MaintenanceId,
    ) -> Result<Vec<CategoryMembership>, StoreError> {
        Ok(self
            .memberships
            .get(&maintenance_id)
            .map(|m| m.value().clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, hour, 0, 0).unwrap()
    }

    fn obs_at(mac: &MacAddress, hour: u32, vlan: u16) -> Observation {
        Observation {
            vlan_id: Some(vlan),
            ..Observation::empty(mac.clone(), Phase::Before, at(hour))
        }
    }

    #[tokio::test]
    async fn newest_at_or_before_wins() {
        let store = MemoryStore::new();
        let mac = MacAddress::new("aa:bb:cc:00:00:01");
        store.record_observation(obs_at(&mac, 8, 10));
        store.record_observation(obs_at(&mac, 10, 20));
        store.record_observation(obs_at(&mac, 12, 30));

        let roster: BTreeSet<_> = [mac.clone()].into();
        let found = store
            .observations_at(&roster, Phase::Before, at(11))
            .await
            .unwrap();
        assert_eq!(found[&mac].vlan_id, Some(20));
    }

    #[tokio::test]
    async fn observation_after_as_of_is_invisible() {
        let store = MemoryStore::new();
        let mac = MacAddress::new("aa:bb:cc:00:00:02");
        store.record_observation(obs_at(&mac, 12, 30));

        let roster: BTreeSet<_> = [mac.clone()].into();
        let found = store
            .observations_at(&roster, Phase::Before, at(11))
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn clear_override_reverts_to_automatic() {
        let store = MemoryStore::new();
        let mac = MacAddress::new("aa:bb:cc:00:00:03");
        store.upsert_override(
            1,
            OverrideRow {
                mac: mac.clone(),
                severity: "info".into(),
                original_severity: "critical".into(),
                note: None,
                created_at: at(9),
                updated_at: at(9),
            },
        );
        assert_eq!(store.overrides(1).await.unwrap().len(), 1);
        assert!(store.clear_override(1, &mac).is_some());
        assert!(store.overrides(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn inactive_categories_are_filtered() {
        let store = MemoryStore::new();
        store.set_categories(
            1,
            vec![
                Category {
                    id: 1,
                    name: "Servers".into(),
                    color: "#ff0000".into(),
                    sort_order: 0,
                    active: true,
                },
                Category {
                    id: 2,
                    name: "Retired".into(),
                    color: "#888888".into(),
                    sort_order: 1,
                    active: false,
                },
            ],
        );
        let active = store.active_categories(1).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, 1);
    }
}
