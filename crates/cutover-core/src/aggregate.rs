// ── Category statistics aggregation ──
//
// Rolls per-endpoint comparison results up into per-category buckets
// plus the two synthetic buckets. ALL is a deduplicated union tracked
// as per-metric mac sets — an endpoint in three categories counts once
// there, but once in each of its category buckets.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::model::{
    BucketId, Category, CategoryMembership, ComparisonResult, MacAddress, Severity,
    SeveritySource, StatsBucket,
};

/// Whether a result counts as an issue.
///
/// An override at warning-or-worse always counts, even on an unchanged
/// endpoint. Without an override, only a changed endpoint whose
/// computed severity rose above info counts — unreviewed info-level
/// changes are not issues.
fn is_issue(result: &ComparisonResult) -> bool {
    match result.severity_source {
        SeveritySource::Override => result.severity >= Severity::Warning,
        SeveritySource::Automatic => result.is_changed && result.severity != Severity::Info,
    }
}

/// Union membership sets backing the ALL bucket. Counts are taken as
/// cardinalities after every result is processed, never by summing
/// category buckets.
#[derive(Default)]
struct UnionSets<'a> {
    total: HashSet<&'a MacAddress>,
    issue: HashSet<&'a MacAddress>,
    critical: HashSet<&'a MacAddress>,
    warning: HashSet<&'a MacAddress>,
    undetected: HashSet<&'a MacAddress>,
}

fn tally(bucket: &mut StatsBucket, result: &ComparisonResult, issue: bool) {
    bucket.total_count += 1;
    if issue {
        bucket.issue_count += 1;
    }
    match result.severity {
        Severity::Critical => bucket.critical_count += 1,
        Severity::Warning => bucket.warning_count += 1,
        Severity::Info => {}
    }
    if result.undetected {
        bucket.undetected_count += 1;
    }
}

/// Aggregate comparison results into category, UNCATEGORIZED, and ALL
/// buckets.
///
/// Output order: active categories by (sort_order, id), then
/// UNCATEGORIZED, then ALL. Membership rows pointing at a category
/// missing from `categories` are dropped with a diagnostic; their
/// endpoints still land in UNCATEGORIZED when no active membership
/// remains.
pub fn aggregate(
    results: &[ComparisonResult],
    categories: &[Category],
    memberships: &[CategoryMembership],
) -> Vec<StatsBucket> {
    let mut ordered: Vec<&Category> = categories.iter().filter(|c| c.active).collect();
    ordered.sort_by_key(|c| (c.sort_order, c.id));

    let active_ids: HashSet<i64> = ordered.iter().map(|c| c.id).collect();

    let mut category_buckets: HashMap<i64, StatsBucket> = ordered
        .iter()
        .map(|c| {
            (
                c.id,
                StatsBucket::new(BucketId::Category(c.id), c.name.clone(), c.color.clone()),
            )
        })
        .collect();

    // Endpoint -> active category ids, deduplicated (a duplicated
    // membership row must not double-count).
    let mut by_mac: HashMap<&MacAddress, Vec<i64>> = HashMap::new();
    let mut seen: HashSet<(&MacAddress, i64)> = HashSet::new();
    for row in memberships {
        if !active_ids.contains(&row.category_id) {
            warn!(
                mac = %row.mac,
                category_id = row.category_id,
                "membership row references an inactive or unknown category, skipping"
            );
            continue;
        }
        if seen.insert((&row.mac, row.category_id)) {
            by_mac.entry(&row.mac).or_default().push(row.category_id);
        }
    }

    let mut uncategorized =
        StatsBucket::new(BucketId::Uncategorized, "Uncategorized", String::new());
    let mut union = UnionSets::default();

    for result in results {
        let issue = is_issue(result);

        match by_mac.get(&result.mac) {
            Some(category_ids) => {
                for id in category_ids {
                    if let Some(bucket) = category_buckets.get_mut(id) {
                        tally(bucket, result, issue);
                    }
                }
            }
            None => tally(&mut uncategorized, result, issue),
        }

        union.total.insert(&result.mac);
        if issue {
            union.issue.insert(&result.mac);
        }
        match result.severity {
            Severity::Critical => {
                union.critical.insert(&result.mac);
            }
            Severity::Warning => {
                union.warning.insert(&result.mac);
            }
            Severity::Info => {}
        }
        if result.undetected {
            union.undetected.insert(&result.mac);
        }
    }

    let mut all = StatsBucket::new(BucketId::All, "All", String::new());
    all.total_count = union.total.len();
    all.issue_count = union.issue.len();
    all.critical_count = union.critical.len();
    all.warning_count = union.warning.len();
    all.undetected_count = union.undetected.len();

    let mut buckets: Vec<StatsBucket> = ordered
        .iter()
        .filter_map(|c| category_buckets.remove(&c.id))
        .collect();
    buckets.push(uncategorized);
    buckets.push(all);
    buckets
}
