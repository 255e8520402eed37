// ── Severity classification ──
//
// Precedence is data, not scattered branches: an ordered rule table
// evaluated top to bottom, first match wins. The order itself
// (override → empty diff → status transition → field sets) is the
// artifact the tests pin down.

use crate::model::{
    DetectionState, DiffField, DifferenceMap, FieldValue, Severity, SeverityOverride,
    SeveritySource, ValueChange,
};
use crate::rules::SeverityRuleSet;

/// Output of the classifier: final severity plus reproducible notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub severity: Severity,
    pub source: SeveritySource,
    pub notes: String,
}

struct ClassifyInput<'a> {
    diff: &'a DifferenceMap,
    override_: Option<&'a SeverityOverride>,
    rules: &'a SeverityRuleSet,
}

type ClassifyRule = fn(&ClassifyInput<'_>) -> Option<Classification>;

/// The precedence order, highest first. `rule_field_sets` is total for
/// any non-empty diff, so the table always produces a classification.
const PRECEDENCE: [(&str, ClassifyRule); 4] = [
    ("override", rule_override),
    ("no-change", rule_no_change),
    ("status-transition", rule_status_transition),
    ("field-sets", rule_field_sets),
];

/// Classify one endpoint's difference map.
///
/// A manual override, when present, unconditionally wins — no other
/// rule runs, even for an empty diff.
pub fn classify(
    diff: &DifferenceMap,
    override_: Option<&SeverityOverride>,
    rules: &SeverityRuleSet,
) -> Classification {
    let input = ClassifyInput {
        diff,
        override_,
        rules,
    };
    PRECEDENCE
        .iter()
        .find_map(|(_, rule)| rule(&input))
        .unwrap_or_else(|| Classification {
            severity: Severity::Info,
            source: SeveritySource::Automatic,
            notes: "no change detected".into(),
        })
}

fn rule_override(input: &ClassifyInput<'_>) -> Option<Classification> {
    let ov = input.override_?;
    let mut notes = format!(
        "manual override in effect: {} (automatic: {})",
        ov.severity, ov.original_severity
    );
    if let Some(note) = &ov.note {
        notes.push_str(" - ");
        notes.push_str(note);
    }
    Some(Classification {
        severity: ov.severity,
        source: SeveritySource::Override,
        notes,
    })
}

fn rule_no_change(input: &ClassifyInput<'_>) -> Option<Classification> {
    input.diff.is_empty().then(|| Classification {
        severity: Severity::Info,
        source: SeveritySource::Automatic,
        notes: "no change detected".into(),
    })
}

fn rule_status_transition(input: &ClassifyInput<'_>) -> Option<Classification> {
    let change = input.diff.get(&DiffField::Status)?;
    let undetected_after =
        change.after == FieldValue::from(DetectionState::Undetected);
    // Loss of visibility is the worst case; a reappearance comes back
    // under unverified conditions and still warrants review.
    let (severity, notes) = if undetected_after {
        (
            Severity::Critical,
            "endpoint detected before cutover but undetected after",
        )
    } else {
        (
            Severity::Warning,
            "endpoint undetected before cutover but detected after",
        )
    };
    Some(Classification {
        severity,
        source: SeveritySource::Automatic,
        notes: notes.into(),
    })
}

fn rule_field_sets(input: &ClassifyInput<'_>) -> Option<Classification> {
    if input.diff.is_empty() {
        return None;
    }

    let mut severity = Severity::Info;
    for field in input.diff.keys() {
        if input.rules.critical_fields.contains(field) {
            severity = Severity::Critical;
            break;
        }
        if input.rules.warning_fields.contains(field) {
            severity = Severity::Warning;
        }
    }

    Some(Classification {
        severity,
        source: SeveritySource::Automatic,
        notes: render_field_notes(input.diff),
    })
}

/// One clause per changed field, in the diff's (declaration) order.
/// Latency clauses carry a signed delta so the magnitude of a
/// regression is visible without re-deriving it.
fn render_field_notes(diff: &DifferenceMap) -> String {
    let clauses: Vec<String> = diff
        .iter()
        .map(|(field, change)| render_clause(*field, change))
        .collect();
    clauses.join("; ")
}

fn render_clause(field: DiffField, change: &ValueChange) -> String {
    if field == DiffField::PingLatencyMs {
        if let (FieldValue::Float(b), FieldValue::Float(a)) = (&change.before, &change.after) {
            return format!("{field}: {b} -> {a} ({:+}ms)", a - b);
        }
    }
    format!("{field}: {} -> {}", change.before, change.after)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rules() -> SeverityRuleSet {
        SeverityRuleSet::default()
    }

    fn status_diff(before: DetectionState, after: DetectionState) -> DifferenceMap {
        let mut map = DifferenceMap::new();
        map.insert(DiffField::Status, ValueChange::new(before, after));
        map
    }

    #[test]
    fn precedence_order_is_fixed() {
        let names: Vec<&str> = PRECEDENCE.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            vec!["override", "no-change", "status-transition", "field-sets"]
        );
    }

    #[test]
    fn empty_diff_is_info() {
        let out = classify(&DifferenceMap::new(), None, &rules());
        assert_eq!(out.severity, Severity::Info);
        assert_eq!(out.notes, "no change detected");
    }

    #[test]
    fn override_wins_over_everything() {
        let ov = SeverityOverride {
            severity: Severity::Info,
            original_severity: Severity::Critical,
            note: Some("cable swap was planned".into()),
        };
        // Even a detected->undetected transition loses to the override.
        let diff = status_diff(DetectionState::Detected, DetectionState::Undetected);
        let out = classify(&diff, Some(&ov), &rules());
        assert_eq!(out.severity, Severity::Info);
        assert_eq!(out.source, SeveritySource::Override);
        assert_eq!(
            out.notes,
            "manual override in effect: info (automatic: critical) - cable swap was planned"
        );
    }

    #[test]
    fn override_wins_over_empty_diff() {
        let ov = SeverityOverride {
            severity: Severity::Warning,
            original_severity: Severity::Info,
            note: None,
        };
        let out = classify(&DifferenceMap::new(), Some(&ov), &rules());
        assert_eq!(out.severity, Severity::Warning);
        assert_eq!(out.source, SeveritySource::Override);
    }

    #[test]
    fn disappearance_defaults_to_critical() {
        let diff = status_diff(DetectionState::Detected, DetectionState::Undetected);
        let out = classify(&diff, None, &rules());
        assert_eq!(out.severity, Severity::Critical);
    }

    #[test]
    fn appearance_defaults_to_warning() {
        let diff = status_diff(DetectionState::Undetected, DetectionState::Detected);
        let out = classify(&diff, None, &rules());
        assert_eq!(out.severity, Severity::Warning);
    }

    #[test]
    fn critical_field_outranks_warning_field() {
        let mut diff = DifferenceMap::new();
        diff.insert(DiffField::LinkSpeed, ValueChange::new("1G", "100M"));
        diff.insert(DiffField::LinkStatus, ValueChange::new("up", "down"));
        let out = classify(&diff, None, &rules());
        assert_eq!(out.severity, Severity::Critical);
    }

    #[test]
    fn warning_only_fields_classify_as_warning() {
        let mut diff = DifferenceMap::new();
        diff.insert(DiffField::Duplex, ValueChange::new("full", "half"));
        let out = classify(&diff, None, &rules());
        assert_eq!(out.severity, Severity::Warning);
    }

    #[test]
    fn unclassified_fields_fall_through_to_info() {
        let mut diff = DifferenceMap::new();
        diff.insert(DiffField::Hostname, ValueChange::new("db-01", "db-01new"));
        let out = classify(&diff, None, &rules());
        assert_eq!(out.severity, Severity::Info);
        assert_eq!(out.notes, "hostname: db-01 -> db-01new");
    }

    #[test]
    fn latency_notes_carry_signed_delta() {
        let mut diff = DifferenceMap::new();
        diff.insert(
            DiffField::PingLatencyMs,
            ValueChange::new(FieldValue::Float(10.0), FieldValue::Float(25.5)),
        );
        let out = classify(&diff, None, &rules());
        assert_eq!(out.notes, "ping_latency_ms: 10 -> 25.5 (+15.5ms)");
    }

    #[test]
    fn notes_follow_diff_order() {
        let mut diff = DifferenceMap::new();
        diff.insert(DiffField::SwitchHostname, ValueChange::new("SW1", "SW2"));
        diff.insert(DiffField::VlanId, ValueChange::new(FieldValue::Int(10), FieldValue::Int(20)));
        let out = classify(&diff, None, &rules());
        assert_eq!(out.notes, "switch_hostname: SW1 -> SW2; vlan_id: 10 -> 20");
    }
}
