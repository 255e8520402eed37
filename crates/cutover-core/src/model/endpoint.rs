// ── Core identity types ──
//
// MacAddress is the primary key for everything in the engine: roster
// entries, observations, override rows, and category memberships all
// hang off it. Collectors report hardware addresses in whatever format
// the device CLI emits, so the constructor normalizes aggressively.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── MacAddress ──────────────────────────────────────────────────────

/// Hardware address, normalized to uppercase colon-separated format
/// (`AA:BB:CC:DD:EE:FF`).
///
/// Accepts colon-separated, dash-separated, Cisco dot-separated
/// (`aabb.ccdd.eeff`), or bare hex on input. `Ord` so rosters and
/// result lists iterate in a deterministic order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MacAddress(String);

impl MacAddress {
    /// Create a normalized MAC address from any common format.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let hex: String = raw
            .as_ref()
            .chars()
            .filter(|c| !matches!(c, ':' | '-' | '.'))
            .collect::<String>()
            .to_uppercase();

        if hex.len() == 12 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            let grouped = hex
                .as_bytes()
                .chunks(2)
                .map(|pair| std::str::from_utf8(pair).unwrap_or_default())
                .collect::<Vec<_>>()
                .join(":");
            Self(grouped)
        } else {
            // Not a recognizable MAC; keep the uppercased input so the
            // value is still usable as a lookup key.
            Self(raw.as_ref().to_uppercase().replace(['-', '.'], ":"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MacAddress {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for MacAddress {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// ── Phase ───────────────────────────────────────────────────────────

/// Which side of the cutover an observation belongs to.
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    Before,
    After,
}
