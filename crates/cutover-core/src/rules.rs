// ── Severity rule configuration ──
//
// Which fields escalate to critical, which to warning, and the latency
// tolerance for near-equal ping times. Constructed by the caller
// (usually via cutover-config), validated once up front, then shared
// immutably by a whole run — the engine never reads config from disk.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::DiffField;

/// Default latency tolerance in milliseconds.
pub const DEFAULT_LATENCY_TOLERANCE_MS: f64 = 5.0;

/// Static severity configuration for one comparison run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeverityRuleSet {
    /// A diff touching any of these fields classifies as critical.
    pub critical_fields: HashSet<DiffField>,
    /// A diff touching any of these (and no critical field) classifies
    /// as warning.
    pub warning_fields: HashSet<DiffField>,
    /// Ping latency deltas at or below this are treated as equal.
    pub latency_tolerance_ms: f64,
}

impl Default for SeverityRuleSet {
    fn default() -> Self {
        Self {
            critical_fields: [
                DiffField::SwitchHostname,
                DiffField::InterfaceName,
                DiffField::VlanId,
                DiffField::LinkStatus,
                DiffField::AclPass,
            ]
            .into_iter()
            .collect(),
            warning_fields: [
                DiffField::LinkSpeed,
                DiffField::Duplex,
                DiffField::PingOk,
                DiffField::PingLatencyMs,
                DiffField::IpAddress,
            ]
            .into_iter()
            .collect(),
            latency_tolerance_ms: DEFAULT_LATENCY_TOLERANCE_MS,
        }
    }
}

impl SeverityRuleSet {
    /// Fail-fast structural validation.
    ///
    /// Runs before any endpoint is processed so a bad rule file never
    /// surfaces as a mystery deep inside a per-endpoint loop.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.latency_tolerance_ms.is_finite() || self.latency_tolerance_ms < 0.0 {
            return Err(CoreError::InvalidRules {
                reason: format!(
                    "latency_tolerance_ms must be finite and non-negative, got {}",
                    self.latency_tolerance_ms
                ),
            });
        }

        if self.critical_fields.contains(&DiffField::Status)
            || self.warning_fields.contains(&DiffField::Status)
        {
            return Err(CoreError::InvalidRules {
                reason: "the _status pseudo-field has fixed transition severities \
                         and cannot appear in a rule set"
                    .into(),
            });
        }

        if let Some(dup) = self.critical_fields.intersection(&self.warning_fields).next() {
            return Err(CoreError::InvalidRules {
                reason: format!("field '{dup}' is listed as both critical and warning"),
            });
        }

        Ok(())
    }
}
