// ── Observation domain type ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use super::endpoint::{MacAddress, Phase};

/// A single immutable snapshot of an endpoint's network-visible state.
///
/// Produced by the external collectors, never mutated. A later
/// observation of the same endpoint/phase supersedes (not overwrites)
/// an earlier one; the repository picks the newest at-or-before the
/// requested as-of time.
///
/// Every comparable field is optional — a collector may fail to learn
/// any individual attribute, and a missing field simply isn't compared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub mac: MacAddress,
    pub phase: Phase,
    pub collected_at: DateTime<Utc>,

    // Switch-side facts
    pub switch_hostname: Option<String>,
    pub interface_name: Option<String>,
    pub vlan_id: Option<u16>,
    pub link_speed: Option<String>,
    pub duplex: Option<String>,
    pub link_status: Option<String>,

    // Reachability probes
    pub ping_ok: Option<bool>,
    pub ping_latency_ms: Option<f64>,
    pub acl_pass: Option<bool>,

    // Endpoint-side facts
    pub ip_address: Option<IpAddr>,
    pub hostname: Option<String>,
    pub topology_role: Option<String>,
}

impl Observation {
    /// An observation with every comparable field unset.
    pub fn empty(mac: MacAddress, phase: Phase, collected_at: DateTime<Utc>) -> Self {
        Self {
            mac,
            phase,
            collected_at,
            switch_hostname: None,
            interface_name: None,
            vlan_id: None,
            link_speed: None,
            duplex: None,
            link_status: None,
            ping_ok: None,
            ping_latency_ms: None,
            acl_pass: None,
            ip_address: None,
            hostname: None,
            topology_role: None,
        }
    }
}
