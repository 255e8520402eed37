// ── Field-level diff engine ──
//
// Pure function from two optional observations to a difference map.
// Never fails: a malformed or missing individual field is simply not
// comparable and produces no entry.

use crate::model::{
    DetectionState, DiffField, DifferenceMap, FieldValue, Observation, ValueChange,
};
use crate::rules::SeverityRuleSet;

/// Compute field-level differences between two phases of one endpoint.
///
/// - Both absent: empty map (nothing to compare).
/// - Exactly one absent: a single synthetic `_status` entry carrying
///   the detection-state transition; no field comparison happens.
/// - Both present: each comparable field is visited in
///   [`DiffField::COMPARABLE`] declaration order.
///
/// A field is only reported when *both* sides carry a value. A
/// populated-to-null transition on two present observations is
/// deliberately invisible — this mirrors the dashboard's established
/// behavior and is pending product-owner clarification, so do not
/// "fix" it here.
pub fn diff(
    before: Option<&Observation>,
    after: Option<&Observation>,
    rules: &SeverityRuleSet,
) -> DifferenceMap {
    let mut map = DifferenceMap::new();

    let (before, after) = match (before, after) {
        (None, None) => return map,
        (Some(_), None) => {
            map.insert(
                DiffField::Status,
                ValueChange::new(DetectionState::Detected, DetectionState::Undetected),
            );
            return map;
        }
        (None, Some(_)) => {
            map.insert(
                DiffField::Status,
                ValueChange::new(DetectionState::Undetected, DetectionState::Detected),
            );
            return map;
        }
        (Some(b), Some(a)) => (b, a),
    };

    for field in DiffField::COMPARABLE {
        let change = match field {
            DiffField::SwitchHostname => text_change(&before.switch_hostname, &after.switch_hostname),
            DiffField::InterfaceName => text_change(&before.interface_name, &after.interface_name),
            DiffField::VlanId => int_change(before.vlan_id, after.vlan_id),
            DiffField::LinkSpeed => text_change(&before.link_speed, &after.link_speed),
            DiffField::Duplex => text_change(&before.duplex, &after.duplex),
            DiffField::LinkStatus => text_change(&before.link_status, &after.link_status),
            DiffField::PingOk => bool_change(before.ping_ok, after.ping_ok),
            DiffField::PingLatencyMs => float_change(
                before.ping_latency_ms,
                after.ping_latency_ms,
                rules.latency_tolerance_ms,
            ),
            DiffField::AclPass => bool_change(before.acl_pass, after.acl_pass),
            DiffField::IpAddress => display_change(before.ip_address, after.ip_address),
            DiffField::Hostname => text_change(&before.hostname, &after.hostname),
            DiffField::TopologyRole => text_change(&before.topology_role, &after.topology_role),
            DiffField::Status => None,
        };
        if let Some(change) = change {
            map.insert(field, change);
        }
    }

    map
}

/// Exact string equality, both sides required.
fn text_change(before: &Option<String>, after: &Option<String>) -> Option<ValueChange> {
    match (before, after) {
        (Some(b), Some(a)) if b != a => Some(ValueChange::new(b.as_str(), a.as_str())),
        _ => None,
    }
}

fn bool_change(before: Option<bool>, after: Option<bool>) -> Option<ValueChange> {
    match (before, after) {
        (Some(b), Some(a)) if b != a => {
            Some(ValueChange::new(FieldValue::Bool(b), FieldValue::Bool(a)))
        }
        _ => None,
    }
}

fn int_change(before: Option<u16>, after: Option<u16>) -> Option<ValueChange> {
    match (before, after) {
        (Some(b), Some(a)) if b != a => Some(ValueChange::new(
            FieldValue::Int(i64::from(b)),
            FieldValue::Int(i64::from(a)),
        )),
        _ => None,
    }
}

/// Numeric comparison with tolerance: deltas at or below the tolerance
/// are treated as equal.
fn float_change(before: Option<f64>, after: Option<f64>, tolerance: f64) -> Option<ValueChange> {
    match (before, after) {
        (Some(b), Some(a)) if (b - a).abs() > tolerance => {
            Some(ValueChange::new(FieldValue::Float(b), FieldValue::Float(a)))
        }
        _ => None,
    }
}

fn display_change<T: std::fmt::Display + PartialEq>(
    before: Option<T>,
    after: Option<T>,
) -> Option<ValueChange> {
    match (before, after) {
        (Some(b), Some(a)) if b != a => {
            Some(ValueChange::new(b.to_string().as_str(), a.to_string().as_str()))
        }
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{MacAddress, Phase};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn base_obs(phase: Phase) -> Observation {
        let collected = Utc.with_ymd_and_hms(2026, 3, 14, 2, 0, 0).unwrap();
        Observation {
            switch_hostname: Some("SW1".into()),
            interface_name: Some("Gi0/1".into()),
            vlan_id: Some(100),
            link_speed: Some("1G".into()),
            duplex: Some("full".into()),
            link_status: Some("up".into()),
            ping_ok: Some(true),
            ping_latency_ms: Some(10.0),
            acl_pass: Some(true),
            ip_address: Some("10.0.0.5".parse().unwrap()),
            hostname: Some("db-01".into()),
            topology_role: Some("access".into()),
            ..Observation::empty(
                MacAddress::new("aa:bb:cc:dd:ee:01"),
                phase,
                collected,
            )
        }
    }

    #[test]
    fn both_absent_yields_empty_map() {
        let map = diff(None, None, &SeverityRuleSet::default());
        assert!(map.is_empty());
    }

    #[test]
    fn disappearance_yields_only_status() {
        let before = base_obs(Phase::Before);
        let map = diff(Some(&before), None, &SeverityRuleSet::default());
        assert_eq!(map.len(), 1);
        let change = &map[&DiffField::Status];
        assert_eq!(change.before, FieldValue::Text("detected".into()));
        assert_eq!(change.after, FieldValue::Text("undetected".into()));
    }

    #[test]
    fn appearance_yields_only_status() {
        let after = base_obs(Phase::After);
        let map = diff(None, Some(&after), &SeverityRuleSet::default());
        assert_eq!(map.len(), 1);
        let change = &map[&DiffField::Status];
        assert_eq!(change.before, FieldValue::Text("undetected".into()));
        assert_eq!(change.after, FieldValue::Text("detected".into()));
    }

    #[test]
    fn identical_observations_yield_empty_map() {
        let before = base_obs(Phase::Before);
        let after = base_obs(Phase::After);
        let map = diff(Some(&before), Some(&after), &SeverityRuleSet::default());
        assert!(map.is_empty());
    }

    #[test]
    fn interface_move_is_reported() {
        let before = base_obs(Phase::Before);
        let mut after = base_obs(Phase::After);
        after.interface_name = Some("Gi0/2".into());
        let map = diff(Some(&before), Some(&after), &SeverityRuleSet::default());
        assert_eq!(map.len(), 1);
        assert_eq!(
            map[&DiffField::InterfaceName],
            ValueChange::new("Gi0/1", "Gi0/2")
        );
    }

    #[test]
    fn latency_within_tolerance_is_not_reported() {
        let before = base_obs(Phase::Before);
        let mut after = base_obs(Phase::After);
        after.ping_latency_ms = Some(15.0); // delta == default tolerance of 5.0
        let map = diff(Some(&before), Some(&after), &SeverityRuleSet::default());
        assert!(map.is_empty());
    }

    #[test]
    fn latency_beyond_tolerance_is_reported() {
        let before = base_obs(Phase::Before);
        let mut after = base_obs(Phase::After);
        after.ping_latency_ms = Some(15.1);
        let map = diff(Some(&before), Some(&after), &SeverityRuleSet::default());
        assert_eq!(
            map[&DiffField::PingLatencyMs],
            ValueChange::new(FieldValue::Float(10.0), FieldValue::Float(15.1))
        );
    }

    #[test]
    fn null_transition_is_not_reported() {
        // Established behavior: populated -> null on two present
        // observations is invisible to the diff.
        let before = base_obs(Phase::Before);
        let mut after = base_obs(Phase::After);
        after.vlan_id = None;
        after.hostname = None;
        let map = diff(Some(&before), Some(&after), &SeverityRuleSet::default());
        assert!(map.is_empty());
    }

    #[test]
    fn fields_appear_in_declaration_order() {
        let before = base_obs(Phase::Before);
        let mut after = base_obs(Phase::After);
        after.topology_role = Some("core".into());
        after.switch_hostname = Some("SW9".into());
        after.vlan_id = Some(200);
        let map = diff(Some(&before), Some(&after), &SeverityRuleSet::default());
        let order: Vec<DiffField> = map.keys().copied().collect();
        assert_eq!(
            order,
            vec![
                DiffField::SwitchHostname,
                DiffField::VlanId,
                DiffField::TopologyRole,
            ]
        );
    }

    #[test]
    fn bool_flip_is_reported() {
        let before = base_obs(Phase::Before);
        let mut after = base_obs(Phase::After);
        after.acl_pass = Some(false);
        let map = diff(Some(&before), Some(&after), &SeverityRuleSet::default());
        assert_eq!(
            map[&DiffField::AclPass],
            ValueChange::new(FieldValue::Bool(true), FieldValue::Bool(false))
        );
    }
}
