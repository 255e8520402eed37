// ── Severity and override types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::endpoint::MacAddress;

/// Classification outcome for one endpoint's comparison.
///
/// Ordered so `Critical` compares greatest; the wire form is the
/// lowercase name.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// Whether a result's severity was computed or manually pinned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeveritySource {
    Automatic,
    Override,
}

/// Raw override row as the backing store hands it over.
///
/// Severities arrive as strings and are parsed per-row by the
/// comparison builder; a row that fails to parse degrades that one
/// endpoint to automatic classification instead of aborting the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideRow {
    pub mac: MacAddress,
    pub severity: String,
    /// The automatically-computed severity at the time the operator
    /// created the override, kept for audit/undo.
    pub original_severity: String,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A parsed, validated manual override.
///
/// While present for an endpoint it unconditionally outranks the
/// automatic classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityOverride {
    pub severity: Severity,
    pub original_severity: Severity,
    pub note: Option<String>,
}

impl TryFrom<&OverrideRow> for SeverityOverride {
    type Error = strum::ParseError;

    fn try_from(row: &OverrideRow) -> Result<Self, Self::Error> {
        Ok(Self {
            severity: row.severity.parse()?,
            original_severity: row.original_severity.parse()?,
            note: row.note.clone(),
        })
    }
}
