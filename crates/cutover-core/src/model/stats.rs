// ── Aggregated statistics types ──

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identity of one statistics bucket.
///
/// Wire form is the category id for real categories and the sentinel
/// strings `"ALL"` / `"UNCATEGORIZED"` for the two synthetic buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BucketId {
    Category(i64),
    /// Deduplicated union across every category plus the uncategorized
    /// set — never a sum of per-category buckets.
    All,
    /// Roster endpoints with no active category membership.
    Uncategorized,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum BucketIdWire {
    Id(i64),
    Sentinel(String),
}

impl Serialize for BucketId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Category(id) => serializer.serialize_i64(*id),
            Self::All => serializer.serialize_str("ALL"),
            Self::Uncategorized => serializer.serialize_str("UNCATEGORIZED"),
        }
    }
}

impl<'de> Deserialize<'de> for BucketId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match BucketIdWire::deserialize(deserializer)? {
            BucketIdWire::Id(id) => Ok(Self::Category(id)),
            BucketIdWire::Sentinel(s) => match s.as_str() {
                "ALL" => Ok(Self::All),
                "UNCATEGORIZED" => Ok(Self::Uncategorized),
                other => Err(D::Error::custom(format!("unknown bucket id: {other}"))),
            },
        }
    }
}

/// Rolled-up counts for one category (or synthetic bucket).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsBucket {
    #[serde(rename = "category_id")]
    pub bucket: BucketId,
    #[serde(rename = "category_name")]
    pub name: String,
    pub color: String,
    pub total_count: usize,
    pub issue_count: usize,
    pub critical_count: usize,
    pub warning_count: usize,
    pub undetected_count: usize,
}

impl StatsBucket {
    /// A zeroed bucket.
    pub fn new(bucket: BucketId, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            bucket,
            name: name.into(),
            color: color.into(),
            total_count: 0,
            issue_count: 0,
            critical_count: 0,
            warning_count: 0,
            undetected_count: 0,
        }
    }
}
