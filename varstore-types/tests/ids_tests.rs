use std::collections::HashSet;
use std::str::FromStr;
use varstore_types::{Error, VariableId};

// ── Generation ────────────────────────────────────────────────────

#[test]
fn generated_id_carries_prefix() {
    let id = VariableId::generate("e-gv-", |_| false);
    assert!(id.has_prefix("e-gv-"));
    assert_eq!(id.as_str().len(), "e-gv-".len() + 7);
}

#[test]
fn generated_suffix_is_lowercase_hex() {
    let id = VariableId::generate("e-gv-", |_| false);
    let suffix = &id.as_str()["e-gv-".len()..];
    assert!(suffix.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

#[test]
fn generate_skips_taken_candidates() {
    let mut rejected = Vec::new();
    let id = VariableId::generate("x-", |candidate| {
        if rejected.len() < 3 {
            rejected.push(candidate.clone());
            true
        } else {
            false
        }
    });
    assert_eq!(rejected.len(), 3);
    assert!(!rejected.contains(&id));
}

#[test]
fn generate_falls_back_to_long_suffix_after_repeated_collisions() {
    // Every short candidate is reported taken.
    let id = VariableId::generate("x-", |candidate| candidate.as_str().len() < 10);
    assert_eq!(id.as_str().len(), "x-".len() + 32);
}

#[test]
fn generate_never_returns_existing_id() {
    let mut existing = HashSet::new();
    for _ in 0..500 {
        let id = VariableId::generate("e-gv-", |c| existing.contains(c));
        assert!(existing.insert(id));
    }
}

// ── Parsing ───────────────────────────────────────────────────────

#[test]
fn parse_accepts_foreign_prefix() {
    let id = VariableId::parse("legacy-123").unwrap();
    assert_eq!(id.as_str(), "legacy-123");
    assert!(!id.has_prefix("e-gv-"));
}

#[test]
fn parse_rejects_empty() {
    assert!(matches!(VariableId::parse(""), Err(Error::InvalidId(_))));
}

#[test]
fn parse_rejects_whitespace() {
    assert!(VariableId::parse("e-gv- 1").is_err());
    assert!(VariableId::parse("e-gv-1\n").is_err());
}

#[test]
fn from_str_matches_parse() {
    let id = VariableId::from_str("e-gv-abc1234").unwrap();
    assert_eq!(id, VariableId::parse("e-gv-abc1234").unwrap());
}

#[test]
fn display_is_raw_string() {
    let id = VariableId::parse("e-gv-abc1234").unwrap();
    assert_eq!(id.to_string(), "e-gv-abc1234");
}

#[test]
fn serializes_as_plain_string() {
    let id = VariableId::parse("e-gv-abc1234").unwrap();
    assert_eq!(serde_json::to_string(&id).unwrap(), r#""e-gv-abc1234""#);
    let parsed: VariableId = serde_json::from_str(r#""e-gv-abc1234""#).unwrap();
    assert_eq!(parsed, id);
}
