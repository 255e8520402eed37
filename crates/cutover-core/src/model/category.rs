// ── Category domain types ──

use serde::{Deserialize, Serialize};

use super::endpoint::MacAddress;

/// A logical grouping of endpoints within one maintenance window.
///
/// Small bounded set (the dashboard caps it at 5 per window).
/// Soft-deletable: `active = false` keeps membership rows for audit
/// but excludes the category from aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub sort_order: i32,
    pub active: bool,
}

/// One endpoint-to-category membership row (many-to-many).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMembership {
    pub category_id: i64,
    pub mac: MacAddress,
    pub note: Option<String>,
}
