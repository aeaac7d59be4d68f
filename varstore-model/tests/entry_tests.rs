use pretty_assertions::assert_eq;
use serde_json::json;
use varstore_model::{EntryState, UpdatePatch, Variable, VariableEntry};
use varstore_types::{DeletedAt, VariableId};

fn red() -> VariableEntry {
    VariableEntry::new("global-color-variable", "Red", "#ff0000")
}

// ── State ────────────────────────────────────────────────────────

#[test]
fn new_entry_is_live() {
    let e = red();
    assert!(e.is_live());
    assert_eq!(e.deleted_at(), None);
    assert_eq!(e.state, EntryState::Live);
}

#[test]
fn mark_deleted_sets_stamp() {
    let mut e = red();
    let at = DeletedAt::from_unix_seconds(1_000).unwrap();
    e.mark_deleted(at);
    assert!(!e.is_live());
    assert_eq!(e.deleted_at(), Some(at));
}

#[test]
fn mark_deleted_twice_restamps() {
    let mut e = red();
    e.mark_deleted(DeletedAt::from_unix_seconds(1_000).unwrap());
    let later = DeletedAt::from_unix_seconds(2_000).unwrap();
    e.mark_deleted(later);
    assert_eq!(e.deleted_at(), Some(later));
}

#[test]
fn restored_drops_deleted_state() {
    let mut e = red();
    e.mark_deleted(DeletedAt::now());
    let restored = e.restored();
    assert!(restored.is_live());
    assert_eq!(restored.kind, e.kind);
    assert_eq!(restored.label, e.label);
    assert_eq!(restored.value, e.value);
}

// ── Patching ─────────────────────────────────────────────────────

#[test]
fn apply_only_touches_supplied_fields() {
    let mut e = red();
    e.apply(&UpdatePatch::new().value("#f00"));
    assert_eq!(e.label(), Some("Red"));
    assert_eq!(e.value, "#f00");
    assert_eq!(e.kind, "global-color-variable");
}

#[test]
fn apply_empty_string_is_applied() {
    let mut e = red();
    e.apply(&UpdatePatch::new().label(""));
    assert_eq!(e.label(), Some(""));
}

#[test]
fn apply_keeps_deleted_state() {
    let mut e = red();
    let at = DeletedAt::from_unix_seconds(5).unwrap();
    e.mark_deleted(at);
    e.apply(&UpdatePatch::new().label("Crimson"));
    assert_eq!(e.label(), Some("Crimson"));
    assert_eq!(e.deleted_at(), Some(at));
}

#[test]
fn label_matches_ignores_case() {
    let e = red();
    assert!(e.label_matches("red"));
    assert!(e.label_matches("RED"));
    assert!(!e.label_matches("reds"));
}

#[test]
fn entry_without_label_matches_nothing() {
    let mut e = red();
    e.label = None;
    assert!(!e.label_matches(""));
    assert!(!e.label_matches("red"));
}

#[test]
fn label_matches_non_ascii() {
    let e = VariableEntry::new("color", "Äpfel", "#0f0");
    assert!(e.label_matches("äPFEL"));
}

// ── Wire format ──────────────────────────────────────────────────

#[test]
fn live_entry_serializes_without_deleted_keys() {
    let json = serde_json::to_value(red()).unwrap();
    assert_eq!(
        json,
        json!({"type": "global-color-variable", "label": "Red", "value": "#ff0000"})
    );
}

#[test]
fn deleted_entry_serializes_flag_and_stamp() {
    let mut e = red();
    e.mark_deleted(DeletedAt::from_unix_seconds(0).unwrap());
    let json = serde_json::to_value(e).unwrap();
    assert_eq!(json["deleted"], true);
    assert_eq!(json["deleted_at"], "1970-01-01 00:00:00");
}

#[test]
fn deleted_without_stamp_decodes_at_epoch() {
    let e: VariableEntry =
        serde_json::from_value(json!({"type": "c", "label": "x", "value": "y", "deleted": true}))
            .unwrap();
    assert_eq!(e.deleted_at(), Some(DeletedAt::default()));
}

#[test]
fn unparsable_stamp_decodes_at_epoch() {
    let e: VariableEntry = serde_json::from_value(
        json!({"type": "c", "label": "x", "value": "y", "deleted": true, "deleted_at": 17}),
    )
    .unwrap();
    assert_eq!(e.deleted_at(), Some(DeletedAt::default()));
}

#[test]
fn stray_stamp_on_live_entry_is_ignored() {
    let e: VariableEntry = serde_json::from_value(json!({
        "type": "c", "label": "x", "value": "y",
        "deleted": false, "deleted_at": "2024-01-01 00:00:00"
    }))
    .unwrap();
    assert!(e.is_live());
}

#[test]
fn null_or_missing_label_decodes_as_none() {
    let e: VariableEntry =
        serde_json::from_value(json!({"type": "c", "label": null, "value": "y"})).unwrap();
    assert_eq!(e.label(), None);

    let e: VariableEntry = serde_json::from_value(json!({"type": "c", "value": "y"})).unwrap();
    assert_eq!(e.label(), None);
}

#[test]
fn labelless_entry_serializes_without_label() {
    let e: VariableEntry =
        serde_json::from_value(json!({"type": "c", "label": null, "value": "y"})).unwrap();
    assert_eq!(serde_json::to_value(e).unwrap(), json!({"type": "c", "value": "y"}));
}

#[test]
fn scalar_fields_of_other_types_become_text() {
    let e: VariableEntry =
        serde_json::from_value(json!({"type": "c", "label": 12, "value": 1.5})).unwrap();
    assert_eq!(e.label(), Some("12"));
    assert_eq!(e.value, "1.5");

    let e: VariableEntry =
        serde_json::from_value(json!({"type": null, "label": true, "value": null})).unwrap();
    assert_eq!(e.kind, "");
    assert_eq!(e.label(), Some("true"));
    assert_eq!(e.value, "");
}

#[test]
fn deleted_flag_follows_truthiness() {
    let decode = |flag: serde_json::Value| -> VariableEntry {
        serde_json::from_value(json!({
            "type": "c", "label": "x", "value": "y",
            "deleted": flag, "deleted_at": "2024-03-01 10:00:00"
        }))
        .unwrap()
    };

    for truthy in [json!(true), json!(1), json!(-2), json!("1"), json!("yes"), json!([0])] {
        let e = decode(truthy.clone());
        assert!(!e.is_live(), "{truthy} should mark deleted");
        assert_eq!(e.deleted_at(), Some(DeletedAt::parse("2024-03-01 10:00:00").unwrap()));
    }
    let falsy_flags = [
        json!(false),
        json!(0),
        json!(0.0),
        json!(""),
        json!("0"),
        json!(null),
        json!([]),
        json!({}),
    ];
    for falsy in falsy_flags {
        assert!(decode(falsy.clone()).is_live(), "{falsy} should stay live");
    }
}

#[test]
fn non_object_entry_is_rejected() {
    assert!(serde_json::from_value::<VariableEntry>(json!("red")).is_err());
    assert!(serde_json::from_value::<VariableEntry>(json!(3)).is_err());
}

#[test]
fn variable_flattens_entry_with_id() {
    let v = Variable::new(VariableId::parse("e-gv-1234567").unwrap(), red());
    let json = serde_json::to_value(&v).unwrap();
    assert_eq!(
        json,
        json!({
            "id": "e-gv-1234567",
            "type": "global-color-variable",
            "label": "Red",
            "value": "#ff0000"
        })
    );
    let back: Variable = serde_json::from_value(json).unwrap();
    assert_eq!(back, v);
}
