// ── Diff and comparison result types ──
//
// The difference map is strongly typed end to end: field names are a
// closed enum (typos fail at compile time, unknown wire names fail at
// deserialize time) and values are a small typed union rather than a
// stringly bag.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::endpoint::MacAddress;
use super::severity::{Severity, SeveritySource};

/// Name of a comparable observation field, plus the reserved `_status`
/// pseudo-field representing a detection-status transition.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DiffField {
    SwitchHostname,
    InterfaceName,
    VlanId,
    LinkSpeed,
    Duplex,
    LinkStatus,
    PingOk,
    PingLatencyMs,
    AclPass,
    IpAddress,
    Hostname,
    TopologyRole,
    /// Reserved pseudo-field: endpoint appeared or disappeared between
    /// phases. Never a real observation attribute.
    #[serde(rename = "_status")]
    #[strum(serialize = "_status")]
    Status,
}

impl DiffField {
    /// Every real comparable field, in declaration order.
    ///
    /// Diff output and note rendering both follow this order, which is
    /// what makes results reproducible byte for byte.
    pub const COMPARABLE: [DiffField; 12] = [
        DiffField::SwitchHostname,
        DiffField::InterfaceName,
        DiffField::VlanId,
        DiffField::LinkSpeed,
        DiffField::Duplex,
        DiffField::LinkStatus,
        DiffField::PingOk,
        DiffField::PingLatencyMs,
        DiffField::AclPass,
        DiffField::IpAddress,
        DiffField::Hostname,
        DiffField::TopologyRole,
    ];
}

/// Detection status of an endpoint in one phase.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DetectionState {
    Undetected,
    Detected,
}

/// A single observed value in the diff.
///
/// Variant order matters for untagged deserialization: strings first,
/// then bools, then integers before floats so `3` comes back `Int`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<DetectionState> for FieldValue {
    fn from(state: DetectionState) -> Self {
        Self::Text(state.to_string())
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
        }
    }
}

/// Before/after pair for one changed field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueChange {
    pub before: FieldValue,
    pub after: FieldValue,
}

impl ValueChange {
    pub fn new(before: impl Into<FieldValue>, after: impl Into<FieldValue>) -> Self {
        Self {
            before: before.into(),
            after: after.into(),
        }
    }
}

/// Field-level differences for one endpoint, keyed by field name.
///
/// Insertion order follows [`DiffField::COMPARABLE`] declaration order
/// (with `_status` alone when present), so serialization is stable.
pub type DifferenceMap = IndexMap<DiffField, ValueChange>;

/// The per-endpoint output of a comparison run.
///
/// Derived, never persisted as authoritative state. A pure function of
/// its inputs: two runs over identical snapshots, overrides, and rules
/// produce byte-identical results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub mac: MacAddress,
    pub is_changed: bool,
    pub differences: DifferenceMap,
    pub severity: Severity,
    pub severity_source: SeveritySource,
    /// True when the endpoint had no observation in the after phase.
    pub undetected: bool,
    pub notes: String,
    /// The as-of pair the run was computed against (requested times,
    /// not observation collection times).
    pub before_at: DateTime<Utc>,
    pub after_at: DateTime<Utc>,
}
