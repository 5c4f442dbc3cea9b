// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::collections::HashMap;

crate::define_id! {
    /// Test ID type for macro verification.
    pub struct TestId("tst-");
}

#[test]
fn define_id_hash_map_lookup() {
    let mut map = HashMap::new();
    map.insert(TestId::new("k"), 42);
    assert_eq!(map.get("k"), Some(&42));
}

#[test]
fn generated_ids_carry_prefix_and_differ() {
    let a = TestId::generate();
    let b = TestId::generate();
    assert!(a.as_str().starts_with("tst-"));
    assert_eq!(a.suffix().len(), 16);
    assert_ne!(a, b);
}

#[test]
fn suffix_of_foreign_id_is_whole_id() {
    let id = TestId::new("loaded-from-disk");
    assert_eq!(id.suffix(), "loaded-from-disk");
}

#[test]
fn serde_is_transparent() {
    let id = TestId::new("tst-abc");
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"tst-abc\"");
    let parsed: TestId = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, id);
}
