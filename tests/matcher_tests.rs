// tests/matcher_tests.rs

use regex::Regex;
use serde_json::{Value as Json, json};
use treepath::{CompiledPattern, Key, RawToken, RegexFlags, SegmentMatcher, Tree, Value};

fn data() -> Json {
    json!({
        "key1": {
            "key1a": ["foo", "bar", "foobar", {"findme": "thing"}],
            "key1b": "findme"
        },
        "findme": [123, 456, {"findme": 123456}],
        "key2": "foobar",
        "key3": {"key3a": ["val1", "val2", "val3"]}
    })
}

fn matcher(key: Option<&str>, value: Option<&str>, recursive: bool) -> SegmentMatcher {
    SegmentMatcher::new(key.map(RawToken::from), value.map(RawToken::from), None)
        .unwrap()
        .recursive(recursive)
}

fn path(keys: &[&str]) -> Vec<Key> {
    keys.iter()
        .map(|k| match k.parse::<usize>() {
            Ok(i) => Key::Index(i),
            Err(_) => Key::from(*k),
        })
        .collect()
}

fn paths(matches: &[treepath::Match]) -> Vec<Vec<Key>> {
    matches.iter().map(|m| m.path().to_vec()).collect()
}

// ============================================================================
// Construction and enumeration
// ============================================================================

#[test]
fn test_new() {
    let m = matcher(Some("foo*"), Some("*bar*"), false);
    assert_eq!(m.key().unwrap().regex_source(), Some(r"\A(?:foo(.*))\z"));
    assert_eq!(m.value().unwrap().regex_source(), Some(r"\A(?:(.*)bar(.*))\z"));
    assert!(!m.is_recursive());
}

#[test]
fn test_new_with_flags() {
    let m = SegmentMatcher::new(Some("a|b(c|d)".into()), None, Some(RegexFlags::IGNORE_CASE)).unwrap();
    match m.key() {
        Some(CompiledPattern::Regex { flags, .. }) => assert_eq!(*flags, RegexFlags::IGNORE_CASE),
        other => panic!("expected regex, got {:?}", other),
    }
}

#[test]
fn test_each_data_item_hash() {
    let hash = json!({"a": 1, "b": 2, "c": 3});
    let entries = hash.entries();
    let keys: Vec<Key> = entries.iter().map(|(k, _)| k.clone()).collect();
    let values: Vec<&Json> = entries.iter().map(|(_, v)| *v).collect();

    assert_eq!(keys, path(&["a", "b", "c"]));
    assert_eq!(values, vec![&json!(1), &json!(2), &json!(3)]);
}

#[test]
fn test_each_data_item_array() {
    let ary = Value::from(json!(["a", "b", "c"]));
    let entries = ary.entries();
    let keys: Vec<Key> = entries.iter().map(|(k, _)| k.clone()).collect();
    let values: Vec<Value> = entries.iter().map(|(_, v)| (*v).clone()).collect();

    assert_eq!(keys, vec![Key::Index(2), Key::Index(1), Key::Index(0)]);
    assert_eq!(
        values,
        vec![
            Value::String("c".into()),
            Value::String("b".into()),
            Value::String("a".into()),
        ]
    );
}

// ============================================================================
// find_in
// ============================================================================

#[test]
fn test_find_in_precompiled_pattern() {
    let data = data();
    let pattern = CompiledPattern::Regex {
        regex: Regex::new("key").unwrap(),
        flags: RegexFlags::empty(),
    };
    let m = SegmentMatcher::new(Some(RawToken::Pattern(pattern)), None, None).unwrap();

    let mut keys = Vec::new();
    m.find_in_each(&data, |container, key, _| {
        keys.push(key.to_string());
        assert_eq!(container, &data);
    });

    keys.sort();
    assert_eq!(keys, vec!["key1", "key2", "key3"]);
}

#[test]
fn test_find_in_recursive() {
    let data = data();
    let m = SegmentMatcher::new(Some(RawToken::Atom(Key::from("findme"))), None, None)
        .unwrap()
        .recursive(true);

    let mut keys = Vec::new();
    let mut data_points = Vec::new();
    let matches = m.find_in_each(&data, |container, key, _| {
        keys.push(key.to_string());
        data_points.push(container);
    });

    assert!(matches.iter().any(|pm| pm.splats().len() == 1
        && pm.splats()[0].path == path(&["key1", "key1a", "3"])));
    assert_eq!(keys, vec!["findme"; 3]);

    assert_eq!(data_points.len(), 3);
    assert!(data_points.contains(&&data));
    assert!(data_points.contains(&&json!({"findme": "thing"})));
    assert!(data_points.contains(&&json!({"findme": 123456})));
}

#[test]
fn test_find_in_value() {
    let data = data();

    let m = matcher(Some("*"), Some("findme"), false);
    let mut keys = Vec::new();
    m.find_in_each(&data, |_, key, _| keys.push(key.to_string()));
    assert!(keys.is_empty());

    let m = matcher(Some("*"), Some("findme"), true);
    let mut data_points = Vec::new();
    let found = m.find_in_each(&data, |container, key, _| {
        keys.push(key.to_string());
        data_points.push(container);
    });

    assert_eq!(keys, vec!["key1b"]);
    assert_eq!(data_points, vec![&data["key1"]]);
    assert!(found[0].captures().is_empty());
}

#[test]
fn test_find_in_match() {
    let found = matcher(Some("find*"), Some("th*g"), true).find_in(&data());
    assert_eq!(paths(&found), vec![path(&["key1", "key1a", "3", "findme"])]);
    assert_eq!(found[0].captures(), ["me", "in"]);
}

#[test]
fn test_find_in_match_one() {
    let found = matcher(Some("findme|foo"), None, true).find_in(&data());

    assert_eq!(
        paths(&found),
        vec![
            path(&["key1", "key1a", "3", "findme"]),
            path(&["findme"]),
            path(&["findme", "2", "findme"]),
        ]
    );
    assert!(found.iter().all(|m| m.captures().is_empty()));
}

#[test]
fn test_find_in_match_one_value() {
    let found = matcher(Some("findme|foo"), Some("th*g"), true).find_in(&data());
    assert_eq!(paths(&found), vec![path(&["key1", "key1a", "3", "findme"])]);
    assert_eq!(found[0].captures(), ["in"]);
}

#[test]
fn test_find_in_match_any() {
    let found = matcher(Some("*"), None, false).find_in(&data());

    for m in &found {
        assert!(m.splats().is_empty(), "Expected empty splat for {:?}", m);
    }
    assert_eq!(
        paths(&found),
        vec![path(&["key1"]), path(&["findme"]), path(&["key2"]), path(&["key3"])]
    );
}

#[test]
fn test_find_in_match_value_only() {
    for key in [None, Some("")] {
        let found = matcher(key, Some("th*g"), true).find_in(&data());
        assert_eq!(paths(&found), vec![path(&["key1", "key1a", "3", "findme"])]);
        assert_eq!(found[0].captures(), ["in"]);
    }
}

#[test]
fn test_find_in_match_key_only() {
    for value in [None, Some("")] {
        let found = matcher(Some("*3a"), value, true).find_in(&data());
        assert_eq!(paths(&found), vec![path(&["key3", "key3a"])]);
        assert_eq!(found[0].captures(), ["key"]);
    }
}

#[test]
fn test_find_in_match_splat() {
    let found = matcher(Some("findme"), None, true).find_in(&data());

    let splat_of = |target: Vec<Key>| {
        let m = found.iter().find(|m| **m == target).unwrap();
        m.splats()[0].path.clone()
    };

    assert_eq!(splat_of(path(&["key1", "key1a", "3", "findme"])), path(&["key1", "key1a", "3"]));
    assert_eq!(splat_of(path(&["findme"])), Vec::<Key>::new());
    assert_eq!(splat_of(path(&["findme", "2", "findme"])), path(&["findme", "2"]));
}

#[test]
fn test_find_in_match_splat_value() {
    let found = matcher(None, Some("foobar"), true).find_in(&data());

    let foobar = found.iter().find(|m| **m == path(&["key1", "key1a", "2"])).unwrap();
    assert_eq!(foobar.splats()[0].path, path(&["key1", "key1a", "2"]));

    let key2 = found.iter().find(|m| **m == path(&["key2"])).unwrap();
    assert_eq!(key2.splats()[0].path, path(&["key2"]));
}

#[test]
fn test_find_in_ranges() {
    let data = json!(["a", "b", "c", "d", "e"]);

    let found = matcher(Some("1..3"), None, false).find_in(&data);
    assert_eq!(paths(&found), vec![path(&["3"]), path(&["2"]), path(&["1"])]);

    let found = matcher(Some("1,2"), None, false).find_in(&data);
    assert_eq!(paths(&found), vec![path(&["2"]), path(&["1"])]);

    let found = matcher(Some("*"), Some("2..3"), false).find_in(&json!([5, 3, 2, "2"]));
    assert_eq!(paths(&found), vec![path(&["2"]), path(&["1"])]);
}

#[test]
fn test_find_in_scalar_has_no_matches() {
    assert!(matcher(Some("*"), None, true).find_in(&json!(42)).is_empty());
}
